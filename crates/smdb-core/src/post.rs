use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Origin system of a collected post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Instagram,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Facebook, Platform::Instagram];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl std::str::FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "facebook" => Ok(Platform::Facebook),
            "instagram" => Ok(Platform::Instagram),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}

/// A comment attached to a post.
///
/// The author is stored under the `from` key, matching the shape persisted
/// alongside each post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub message: String,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(rename = "from", default)]
    pub author_name: Option<String>,
}

/// A post collected from one platform, normalized into a single shape.
///
/// Built once per connector run and never mutated afterwards; only the
/// persisted copy is updated on re-ingest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialPost {
    pub platform: Platform,
    /// Platform-native identifier. `(platform, post_id)` is the identity key.
    pub post_id: String,
    /// Message or caption. Empty rather than absent.
    pub text: String,
    /// Platform-native timestamp, kept verbatim.
    pub created_time: Option<String>,
    /// Best-effort primary image location.
    pub image_url: Option<String>,
    pub comments: Vec<Comment>,
    /// Full original payload. Stored for debugging and forward compatibility;
    /// nothing in the pipeline reads from it.
    pub raw: serde_json::Value,
}

impl SocialPost {
    /// Filename used when persisting this post's image asset.
    #[must_use]
    pub fn image_filename(&self) -> String {
        format!("{}_{}.jpg", self.platform, self.post_id)
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Returns `true` when `text` contains `subject`, ignoring case.
///
/// Posts without text never match.
#[must_use]
pub fn matches_subject(text: Option<&str>, subject: &str) -> bool {
    match text {
        Some(text) if !text.is_empty() => text.to_lowercase().contains(&subject.to_lowercase()),
        _ => false,
    }
}
