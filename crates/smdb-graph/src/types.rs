//! Graph API response types.
//!
//! Collection edges share one envelope: `{"data": [...], "paging": {...}}`.
//! Items inside `data` stay as raw `serde_json::Value`s until a connector
//! reads the handful of fields it needs into the typed views below; the raw
//! value is kept unchanged as the post's stored payload.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// One page of a cursor-paginated collection edge.
#[derive(Debug, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

/// Cursor block of a [`Page`]. `next` is a complete URL that already embeds
/// the query parameters and access token of the original request.
#[derive(Debug, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub next: Option<String>,
}

/// `{"data": [...]}` wrapper used by nested edges (comments, attachments,
/// carousel children).
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Edge<T> {
    #[serde(default)]
    pub data: Vec<T>,
}

impl<T> Default for Edge<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

// ---------------------------------------------------------------------------
// Facebook `/{page-id}/posts`
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct FacebookPostItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub full_picture: Option<String>,
    #[serde(default)]
    pub attachments: Edge<FacebookAttachment>,
    /// Embedded first page of comments (`comments.limit(25){...}`).
    #[serde(default)]
    pub comments: Edge<FacebookComment>,
}

#[derive(Debug, Deserialize)]
pub struct FacebookAttachment {
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub media: Option<FacebookMedia>,
}

#[derive(Debug, Deserialize)]
pub struct FacebookMedia {
    #[serde(default)]
    pub image: Option<FacebookImage>,
}

#[derive(Debug, Deserialize)]
pub struct FacebookImage {
    #[serde(default)]
    pub src: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FacebookComment {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub from: Option<FacebookAuthor>,
}

#[derive(Debug, Deserialize)]
pub struct FacebookAuthor {
    #[serde(default)]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Instagram `/{user-id}/media`
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct InstagramMediaItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    /// `IMAGE`, `VIDEO` or `CAROUSEL_ALBUM`.
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Point response for `/{media-id}?fields=children{media_url,media_type}`.
#[derive(Debug, Deserialize)]
pub struct CarouselResponse {
    #[serde(default)]
    pub children: Edge<CarouselChild>,
}

#[derive(Debug, Deserialize)]
pub struct CarouselChild {
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
}

/// Item of the `/{media-id}/comments` edge.
#[derive(Debug, Deserialize)]
pub struct InstagramComment {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}
