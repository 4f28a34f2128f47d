//! Instagram business-account media connector.
//!
//! Unlike Facebook, media items do not embed their comments, and carousel
//! albums carry no top-level `media_url`. Both are resolved with follow-up
//! requests, issued only for items that already match the subject.

use std::pin::pin;

use futures::TryStreamExt;
use smdb_core::{matches_subject, Comment, InstagramCredentials, Platform, SocialPost};

use crate::client::{GraphClient, GraphSettings};
use crate::error::GraphError;
use crate::pagination::page_size;
use crate::types::{CarouselResponse, InstagramComment, InstagramMediaItem};

const MEDIA_FIELDS: &str = "id,caption,media_type,media_url,timestamp,children";
const CAROUSEL_FIELDS: &str = "children{media_url,media_type}";
const COMMENT_FIELDS: &str = "text,timestamp,username";
const COMMENT_LIMIT: usize = 25;

const CAROUSEL_ALBUM: &str = "CAROUSEL_ALBUM";
const IMAGE: &str = "IMAGE";

pub struct InstagramConnector {
    client: GraphClient,
    user_id: String,
}

impl InstagramConnector {
    /// # Errors
    ///
    /// Returns [`GraphError`] if the HTTP client cannot be built.
    pub fn new(
        credentials: &InstagramCredentials,
        settings: &GraphSettings,
    ) -> Result<Self, GraphError> {
        Ok(Self {
            client: GraphClient::new(&credentials.access_token, settings)?,
            user_id: credentials.user_id.clone(),
        })
    }

    /// Fetches up to `limit` media items and keeps those whose caption
    /// mentions `subject`, resolving carousel images and comments for each.
    ///
    /// # Errors
    ///
    /// - [`GraphError::RemoteApi`] if the media walk or any enrichment call fails.
    /// - [`GraphError::MalformedRecord`] if a matching item has no `id`.
    pub async fn fetch_posts(
        &self,
        subject: &str,
        limit: usize,
    ) -> Result<Vec<SocialPost>, GraphError> {
        let path = format!("{}/media", self.user_id);
        let params = [
            ("fields", MEDIA_FIELDS.to_string()),
            ("limit", page_size(limit).to_string()),
        ];

        let mut items = pin!(self.client.paginate(&path, &params, limit));
        let mut posts = Vec::new();
        let mut inspected = 0usize;

        while let Some(raw) = items.try_next().await? {
            inspected += 1;
            let item: InstagramMediaItem =
                serde_json::from_value(raw.clone()).map_err(|e| GraphError::Deserialize {
                    context: path.clone(),
                    source: e,
                })?;
            if !matches_subject(item.caption.as_deref(), subject) {
                continue;
            }

            let post_id = item
                .id
                .clone()
                .filter(|id| !id.is_empty())
                .ok_or_else(|| GraphError::MalformedRecord {
                    platform: Platform::Instagram,
                    field: "id",
                    context: path.clone(),
                })?;

            let image_url = match direct_image(&item) {
                Some(url) => Some(url),
                None if item.media_type.as_deref() == Some(CAROUSEL_ALBUM) => {
                    self.carousel_image(&post_id).await?
                }
                None => None,
            };
            let comments = self.fetch_comments(&post_id).await?;

            posts.push(SocialPost {
                platform: Platform::Instagram,
                post_id,
                text: item.caption.unwrap_or_default(),
                created_time: item.timestamp,
                image_url,
                comments,
                raw,
            });
        }

        tracing::info!(
            platform = %Platform::Instagram,
            user_id = %self.user_id,
            inspected,
            matched = posts.len(),
            "instagram media fetched"
        );
        Ok(posts)
    }

    /// First `IMAGE` child of a carousel album.
    async fn carousel_image(&self, media_id: &str) -> Result<Option<String>, GraphError> {
        tracing::debug!(media_id, "resolving carousel children");
        let body = self
            .client
            .get_json(media_id, &[("fields", CAROUSEL_FIELDS.to_string())])
            .await?;
        let carousel: CarouselResponse =
            serde_json::from_value(body).map_err(|e| GraphError::Deserialize {
                context: media_id.to_owned(),
                source: e,
            })?;
        Ok(first_image_child(carousel))
    }

    async fn fetch_comments(&self, media_id: &str) -> Result<Vec<Comment>, GraphError> {
        let path = format!("{media_id}/comments");
        let params = [
            ("fields", COMMENT_FIELDS.to_string()),
            ("limit", COMMENT_LIMIT.to_string()),
        ];

        let comments: Vec<serde_json::Value> = self
            .client
            .paginate(&path, &params, COMMENT_LIMIT)
            .try_collect()
            .await?;
        tracing::debug!(media_id, count = comments.len(), "fetched comments");

        comments
            .into_iter()
            .map(|raw| {
                serde_json::from_value::<InstagramComment>(raw)
                    .map(normalize_comment)
                    .map_err(|e| GraphError::Deserialize {
                        context: path.clone(),
                        source: e,
                    })
            })
            .collect()
    }
}

fn direct_image(item: &InstagramMediaItem) -> Option<String> {
    item.media_url.clone().filter(|url| !url.is_empty())
}

fn first_image_child(carousel: CarouselResponse) -> Option<String> {
    carousel
        .children
        .data
        .into_iter()
        .filter(|child| child.media_type.as_deref() == Some(IMAGE))
        .find_map(|child| child.media_url.filter(|url| !url.is_empty()))
}

fn normalize_comment(comment: InstagramComment) -> Comment {
    Comment {
        message: comment.text.unwrap_or_default(),
        created_time: comment.timestamp,
        author_name: comment.username,
    }
}
