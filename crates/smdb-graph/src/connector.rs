use smdb_core::{Platform, PlatformCredentials, SocialPost};

use crate::client::GraphSettings;
use crate::error::GraphError;
use crate::facebook::FacebookConnector;
use crate::instagram::InstagramConnector;

/// A platform connector, selected by the credentials it was built from.
pub enum Connector {
    Facebook(FacebookConnector),
    Instagram(InstagramConnector),
}

impl Connector {
    /// # Errors
    ///
    /// Returns [`GraphError`] if the underlying HTTP client cannot be built.
    pub fn new(
        credentials: &PlatformCredentials,
        settings: &GraphSettings,
    ) -> Result<Self, GraphError> {
        Ok(match credentials {
            PlatformCredentials::Facebook(c) => {
                Connector::Facebook(FacebookConnector::new(c, settings)?)
            }
            PlatformCredentials::Instagram(c) => {
                Connector::Instagram(InstagramConnector::new(c, settings)?)
            }
        })
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        match self {
            Connector::Facebook(_) => Platform::Facebook,
            Connector::Instagram(_) => Platform::Instagram,
        }
    }

    /// Inspects at most `limit` raw items and returns the posts mentioning
    /// `subject`, in the order the platform served them.
    ///
    /// # Errors
    ///
    /// Propagates the connector's [`GraphError`].
    pub async fn fetch_posts(
        &self,
        subject: &str,
        limit: usize,
    ) -> Result<Vec<SocialPost>, GraphError> {
        match self {
            Connector::Facebook(c) => c.fetch_posts(subject, limit).await,
            Connector::Instagram(c) => c.fetch_posts(subject, limit).await,
        }
    }
}
