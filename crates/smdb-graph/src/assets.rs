//! Image downloads for post assets.

use std::time::Duration;

use reqwest::Client;

use crate::error::GraphError;

/// Downloads image bytes. Holds no state beyond the HTTP client.
pub struct AssetResolver {
    client: Client,
}

impl AssetResolver {
    /// # Errors
    ///
    /// Returns [`GraphError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, GraphError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(GraphError::ClientBuild)?;
        Ok(Self { client })
    }

    /// Fetches the bytes at `url`. An absent or empty URL is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::AssetFetch`] on a transport failure or a non-2xx
    /// status.
    pub async fn fetch(&self, url: Option<&str>) -> Result<Option<Vec<u8>>, GraphError> {
        let Some(url) = url.filter(|u| !u.is_empty()) else {
            return Ok(None);
        };

        let failed = |status: Option<u16>, reason: String| GraphError::AssetFetch {
            url: url.to_owned(),
            status,
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| failed(e.status().map(|s| s.as_u16()), e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(failed(
                Some(status.as_u16()),
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| failed(Some(status.as_u16()), e.to_string()))?;
        tracing::debug!(url, bytes = bytes.len(), "downloaded image");
        Ok(Some(bytes.to_vec()))
    }
}
