//! Facebook page posts connector.
//!
//! Posts come from `/{page-id}/posts` with attachments and the first page of
//! comments embedded in each item, so a Facebook run makes no enrichment
//! requests beyond the page walk itself.

use std::pin::pin;

use futures::TryStreamExt;
use smdb_core::{matches_subject, Comment, FacebookCredentials, Platform, SocialPost};

use crate::client::{GraphClient, GraphSettings};
use crate::error::GraphError;
use crate::pagination::page_size;
use crate::types::{FacebookComment, FacebookPostItem};

const POST_FIELDS: &str = "message,created_time,full_picture,attachments{media_type,media},comments.limit(25){message,created_time,from}";

pub struct FacebookConnector {
    client: GraphClient,
    page_id: String,
}

impl FacebookConnector {
    /// # Errors
    ///
    /// Returns [`GraphError`] if the HTTP client cannot be built.
    pub fn new(
        credentials: &FacebookCredentials,
        settings: &GraphSettings,
    ) -> Result<Self, GraphError> {
        Ok(Self {
            client: GraphClient::new(&credentials.access_token, settings)?,
            page_id: credentials.page_id.clone(),
        })
    }

    /// Fetches up to `limit` page posts and keeps those mentioning `subject`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::RemoteApi`] if any page request fails.
    /// - [`GraphError::MalformedRecord`] if a matching post has no `id`.
    pub async fn fetch_posts(
        &self,
        subject: &str,
        limit: usize,
    ) -> Result<Vec<SocialPost>, GraphError> {
        let path = format!("{}/posts", self.page_id);
        let params = [
            ("fields", POST_FIELDS.to_string()),
            ("limit", page_size(limit).to_string()),
        ];

        let mut items = pin!(self.client.paginate(&path, &params, limit));
        let mut posts = Vec::new();
        let mut inspected = 0usize;

        while let Some(raw) = items.try_next().await? {
            inspected += 1;
            let item: FacebookPostItem =
                serde_json::from_value(raw.clone()).map_err(|e| GraphError::Deserialize {
                    context: path.clone(),
                    source: e,
                })?;
            if !matches_subject(item.message.as_deref(), subject) {
                continue;
            }
            posts.push(normalize_post(item, raw, &path)?);
        }

        tracing::info!(
            platform = %Platform::Facebook,
            page_id = %self.page_id,
            inspected,
            matched = posts.len(),
            "facebook posts fetched"
        );
        Ok(posts)
    }
}

fn normalize_post(
    item: FacebookPostItem,
    raw: serde_json::Value,
    context: &str,
) -> Result<SocialPost, GraphError> {
    let image_url = primary_image(&item);
    let FacebookPostItem {
        id,
        message,
        created_time,
        comments,
        ..
    } = item;

    let post_id = id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| GraphError::MalformedRecord {
            platform: Platform::Facebook,
            field: "id",
            context: context.to_owned(),
        })?;

    Ok(SocialPost {
        platform: Platform::Facebook,
        post_id,
        text: message.unwrap_or_default(),
        created_time,
        image_url,
        comments: comments.data.into_iter().map(normalize_comment).collect(),
        raw,
    })
}

/// `full_picture` when present, else the first attachment image.
fn primary_image(item: &FacebookPostItem) -> Option<String> {
    let non_empty = |s: &&String| !s.is_empty();

    item.full_picture.as_ref().filter(non_empty).cloned().or_else(|| {
        item.attachments
            .data
            .iter()
            .filter_map(|a| a.media.as_ref()?.image.as_ref()?.src.as_ref())
            .find(non_empty)
            .cloned()
    })
}

fn normalize_comment(comment: FacebookComment) -> Comment {
    Comment {
        message: comment.message.unwrap_or_default(),
        created_time: comment.created_time,
        author_name: comment.from.and_then(|f| f.name),
    }
}
