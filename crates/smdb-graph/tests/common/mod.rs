//! Shared fixtures for Graph API wiremock tests.

#![allow(dead_code)]

use smdb_core::{FacebookCredentials, InstagramCredentials};
use smdb_graph::{GraphClient, GraphSettings};

pub const TOKEN: &str = "test-token";

pub fn settings(base_url: &str) -> GraphSettings {
    GraphSettings {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        ..GraphSettings::default()
    }
}

pub fn test_client(base_url: &str) -> GraphClient {
    GraphClient::new(TOKEN, &settings(base_url)).expect("client construction should not fail")
}

pub fn facebook_credentials() -> FacebookCredentials {
    FacebookCredentials {
        access_token: TOKEN.to_string(),
        page_id: "page-1".to_string(),
    }
}

pub fn instagram_credentials() -> InstagramCredentials {
    InstagramCredentials {
        access_token: TOKEN.to_string(),
        user_id: "user-1".to_string(),
    }
}

/// `paging.next` URL the server would hand back for `path`.
pub fn next_url(server_uri: &str, path: &str, cursor: &str) -> String {
    format!("{server_uri}/v18.0/{path}?after={cursor}&access_token={TOKEN}")
}
