//! Fetch-then-store pipeline for a single platform.

use anyhow::Context as _;
use smdb_core::{PlatformCredentials, SocialPost};
use smdb_graph::{AssetResolver, Connector, GraphSettings};

use super::CollectPlan;

/// Result of one platform's collection. `stored` counts posts persisted
/// before any failure; those stay stored even when `failure` is set.
pub(super) struct PlatformOutcome {
    pub stored: i32,
    pub failure: Option<anyhow::Error>,
}

pub(super) async fn collect_platform(
    pool: &sqlx::PgPool,
    settings: &GraphSettings,
    resolver: &AssetResolver,
    credentials: &PlatformCredentials,
    plan: &CollectPlan,
) -> PlatformOutcome {
    let mut stored: i32 = 0;
    let failure = store_platform_posts(pool, settings, resolver, credentials, plan, &mut stored)
        .await
        .err();
    PlatformOutcome { stored, failure }
}

async fn store_platform_posts(
    pool: &sqlx::PgPool,
    settings: &GraphSettings,
    resolver: &AssetResolver,
    credentials: &PlatformCredentials,
    plan: &CollectPlan,
    stored: &mut i32,
) -> anyhow::Result<()> {
    let platform = credentials.platform();
    let connector = Connector::new(credentials, settings)
        .with_context(|| format!("building {platform} connector"))?;

    let posts = connector
        .fetch_posts(&plan.subject, plan.limit)
        .await
        .with_context(|| format!("fetching {platform} posts"))?;
    tracing::info!(platform = %platform, matched = posts.len(), "posts fetched");

    for (index, post) in posts.iter().enumerate() {
        if index > 0 && !plan.upsert_delay.is_zero() {
            tokio::time::sleep(plan.upsert_delay).await;
        }

        let image_bytes = resolve_image(pool, resolver, post).await?;
        smdb_db::upsert_social_post(pool, &plan.subject, post, image_bytes.as_deref())
            .await
            .with_context(|| format!("storing {platform} post {}", post.post_id))?;
        *stored += 1;
    }

    Ok(())
}

/// Downloads the post's image only if the store has no asset for it yet.
///
/// A failed download is logged and the post is stored without an image.
async fn resolve_image(
    pool: &sqlx::PgPool,
    resolver: &AssetResolver,
    post: &SocialPost,
) -> anyhow::Result<Option<Vec<u8>>> {
    if !post.has_image() {
        return Ok(None);
    }

    let existing = smdb_db::find_post_image_id(pool, post.platform, &post.post_id)
        .await
        .with_context(|| {
            format!(
                "looking up stored image for {} post {}",
                post.platform, post.post_id
            )
        })?;
    if let Some(image_id) = existing {
        tracing::debug!(
            platform = %post.platform,
            post_id = %post.post_id,
            image_id,
            "image already stored; skipping download"
        );
        return Ok(None);
    }

    match resolver.fetch(post.image_url.as_deref()).await {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            tracing::warn!(
                platform = %post.platform,
                post_id = %post.post_id,
                error = %e,
                "image download failed; storing post without image"
            );
            Ok(None)
        }
    }
}
