//! Graph API ingestion for Facebook pages and Instagram business accounts.
//!
//! [`GraphClient::paginate`] walks cursor-paginated edges as a lazy stream.
//! The platform connectors filter posts by subject as they stream in, enrich
//! the survivors, and normalize them into [`smdb_core::SocialPost`].

pub mod assets;
pub mod client;
pub mod connector;
pub mod error;
pub mod facebook;
pub mod instagram;
pub mod types;

mod pagination;

pub use assets::AssetResolver;
pub use client::{GraphClient, GraphSettings};
pub use connector::Connector;
pub use error::GraphError;
pub use facebook::FacebookConnector;
pub use instagram::InstagramConnector;
