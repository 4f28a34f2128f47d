use smdb_core::Platform;
use thiserror::Error;

/// Errors returned by the Graph API client, the connectors and the asset
/// resolver.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Non-2xx response, an `error` object in a 2xx body, or a transport
    /// failure (including timeouts). `status` is `None` when no response
    /// was received.
    #[error("Graph API request for {context} failed (status {}): {payload}", status_label(.status))]
    RemoteApi {
        context: String,
        status: Option<u16>,
        payload: serde_json::Value,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A raw item lacks a field the connector cannot work without.
    #[error("malformed {platform} record from {context}: missing `{field}`")]
    MalformedRecord {
        platform: Platform,
        field: &'static str,
        context: String,
    },

    #[error("failed to fetch image {url} (status {}): {reason}", status_label(.status))]
    AssetFetch {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("pagination limit reached for {context}: exceeded {max_pages} pages")]
    PaginationLimit { context: String, max_pages: usize },

    #[error("invalid Graph API base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl GraphError {
    /// Wraps a transport-level failure for `context` as a remote API error.
    pub(crate) fn transport(context: &str, err: &reqwest::Error) -> Self {
        GraphError::RemoteApi {
            context: context.to_owned(),
            status: err.status().map(|s| s.as_u16()),
            payload: serde_json::Value::String(err.to_string()),
        }
    }
}

fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}
