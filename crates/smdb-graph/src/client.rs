//! HTTP client for the Facebook/Instagram Graph API.
//!
//! Wraps `reqwest` with access-token handling and Graph error detection.
//! Every response is checked for a non-2xx status and for an `error` object
//! in the JSON body; both surface as [`GraphError::RemoteApi`] carrying the
//! server's error payload. No request is ever retried.

use std::time::Duration;

use reqwest::{Client, Url};
use smdb_core::AppConfig;

use crate::error::GraphError;

const DEFAULT_BASE_URL: &str = "https://graph.facebook.com";
const DEFAULT_API_VERSION: &str = "v18.0";

/// Connection settings shared by every Graph client in a run.
#[derive(Debug, Clone)]
pub struct GraphSettings {
    /// Scheme and host, e.g. `https://graph.facebook.com`.
    pub base_url: String,
    pub api_version: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_secs: 20,
            user_agent: "smdb/0.1 (social-ingest)".to_string(),
        }
    }
}

impl GraphSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.graph_base_url.clone(),
            api_version: config.graph_api_version.clone(),
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Client for one Graph API access token.
pub struct GraphClient {
    pub(crate) client: Client,
    access_token: String,
    /// `{base_url}/{api_version}/`, always ending in a slash.
    base_url: Url,
}

impl GraphClient {
    /// Creates a client for `access_token` using `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ClientBuild`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GraphError::InvalidBaseUrl`] if the base URL
    /// and version do not form a valid URL.
    pub fn new(access_token: &str, settings: &GraphSettings) -> Result<Self, GraphError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(GraphError::ClientBuild)?;

        let joined = format!(
            "{}/{}/",
            settings.base_url.trim_end_matches('/'),
            settings.api_version.trim_matches('/')
        );
        let base_url = Url::parse(&joined).map_err(|e| GraphError::InvalidBaseUrl {
            base_url: settings.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            base_url,
        })
    }

    /// Issues a single (non-paginated) GET against `path`, e.g. a media node.
    ///
    /// # Errors
    ///
    /// - [`GraphError::RemoteApi`] on transport failure, non-2xx status, or an
    ///   `error` object in the body.
    /// - [`GraphError::Deserialize`] if the body is not valid JSON.
    pub async fn get_json(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value, GraphError> {
        let url = self.build_url(path, params)?;
        self.request_json(url.as_str(), path).await
    }

    /// Builds the request URL for `path` relative to the versioned base,
    /// appending `params` followed by the access token.
    pub(crate) fn build_url(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Url, GraphError> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| GraphError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join path '{path}': {e}"),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("access_token", &self.access_token);
        }
        Ok(url)
    }

    /// Sends a GET to a fully-formed URL and returns the parsed JSON body.
    ///
    /// `context` names the request in errors and logs; it never contains the
    /// access token.
    pub(crate) async fn request_json(
        &self,
        url: &str,
        context: &str,
    ) -> Result<serde_json::Value, GraphError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GraphError::transport(context, &e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GraphError::transport(context, &e))?;

        if !status.is_success() {
            let payload = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .map_or(serde_json::Value::String(text), |body| {
                    body.get("error").cloned().unwrap_or(body)
                });
            return Err(GraphError::RemoteApi {
                context: context.to_owned(),
                status: Some(status.as_u16()),
                payload,
            });
        }

        let body: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| GraphError::Deserialize {
                context: context.to_owned(),
                source: e,
            })?;
        Self::check_api_error(&body, context, status.as_u16())?;
        Ok(body)
    }

    /// Graph occasionally reports failures inside a 2xx body.
    fn check_api_error(
        body: &serde_json::Value,
        context: &str,
        status: u16,
    ) -> Result<(), GraphError> {
        if let Some(error) = body.get("error") {
            return Err(GraphError::RemoteApi {
                context: context.to_owned(),
                status: Some(status),
                payload: error.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> GraphClient {
        let settings = GraphSettings {
            base_url: base_url.to_string(),
            ..GraphSettings::default()
        };
        GraphClient::new("test-token", &settings).expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_params_then_token() {
        let client = test_client("https://graph.facebook.com");
        let url = client
            .build_url("page-1/posts", &[("limit", "25".to_string())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://graph.facebook.com/v18.0/page-1/posts?limit=25&access_token=test-token"
        );
    }

    #[test]
    fn build_url_strips_slashes() {
        let client = test_client("https://graph.facebook.com/");
        let url = client.build_url("/17890/comments", &[]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://graph.facebook.com/v18.0/17890/comments?access_token=test-token"
        );
    }

    #[test]
    fn build_url_encodes_field_expansions() {
        let client = test_client("https://graph.facebook.com");
        let url = client
            .build_url("1/media", &[("fields", "children{media_url}".to_string())])
            .unwrap();
        assert!(
            url.as_str().contains("fields=children%7Bmedia_url%7D"),
            "fields should be percent-encoded: {url}"
        );
    }

    #[test]
    fn new_rejects_invalid_base_url() {
        let settings = GraphSettings {
            base_url: "not a url".to_string(),
            ..GraphSettings::default()
        };
        let result = GraphClient::new("t", &settings);
        assert!(matches!(result, Err(GraphError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn check_api_error_flags_error_object() {
        let body = serde_json::json!({"error": {"message": "bad token", "code": 190}});
        let err = GraphClient::check_api_error(&body, "page-1/posts", 200).unwrap_err();
        match err {
            GraphError::RemoteApi { payload, status, .. } => {
                assert_eq!(status, Some(200));
                assert_eq!(payload["code"], 190);
            }
            other => panic!("expected RemoteApi, got {other:?}"),
        }
    }

    #[test]
    fn check_api_error_passes_clean_body() {
        let body = serde_json::json!({"data": []});
        assert!(GraphClient::check_api_error(&body, "page-1/posts", 200).is_ok());
    }
}
