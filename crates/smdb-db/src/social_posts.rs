//! Database operations for `social_posts` and their write-once image assets.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use smdb_core::{Comment, Platform, SocialPost};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `social_posts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SocialPostRow {
    pub id: i64,
    pub platform: String,
    pub post_id: String,
    pub subject: String,
    pub text: String,
    /// Platform-native timestamp string, stored verbatim.
    pub created_time: Option<String>,
    pub image_url: Option<String>,
    /// Foreign key to `social_post_images`. Never changes once set.
    pub image_id: Option<i64>,
    pub comments: Json<Vec<Comment>>,
    pub raw: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of [`upsert_social_post`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// Internal `id` of the `social_posts` row.
    pub post_row_id: i64,
    pub image_id: Option<i64>,
    /// `true` only when this call stored new image bytes.
    pub image_written: bool,
    /// `true` when the post row was created rather than updated.
    pub inserted: bool,
}

/// What to do with the image side of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePlan<'a> {
    /// An asset already exists for this identity; keep referencing it.
    Reuse(i64),
    /// No asset yet and bytes were supplied.
    Write(&'a [u8]),
    /// No asset and nothing to write.
    Skip,
}

const POST_COLUMNS: &str = "id, platform, post_id, subject, text, created_time, image_url, \
                            image_id, comments, raw, created_at, updated_at";

// ---------------------------------------------------------------------------
// RecordStore
// ---------------------------------------------------------------------------

/// Decides how an upsert treats image bytes given the identity's existing
/// asset reference. An existing asset always wins, even over new bytes.
#[must_use]
pub fn plan_image_write(existing: Option<i64>, bytes: Option<&[u8]>) -> ImagePlan<'_> {
    match (existing, bytes) {
        (Some(id), _) => ImagePlan::Reuse(id),
        (None, Some(bytes)) if !bytes.is_empty() => ImagePlan::Write(bytes),
        _ => ImagePlan::Skip,
    }
}

/// Returns the asset id already stored for `(platform, post_id)`, if any.
///
/// Lets callers skip downloading an image that would not be written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_post_image_id(
    pool: &PgPool,
    platform: Platform,
    post_id: &str,
) -> Result<Option<i64>, DbError> {
    lookup_image_id(pool, platform, post_id).await
}

/// Stores `post` under `subject`, keyed by `(platform, post_id)`.
///
/// Runs in one transaction: resolve the identity's asset reference, write
/// `image_bytes` only if there is none, then insert or fully replace the
/// post row with that reference. Re-running with the same inputs leaves the
/// same stored state.
///
/// # Errors
///
/// Returns [`DbError::Serialize`] if the comments cannot be encoded, or
/// [`DbError::Sqlx`] if any statement fails.
pub async fn upsert_social_post(
    pool: &PgPool,
    subject: &str,
    post: &SocialPost,
    image_bytes: Option<&[u8]>,
) -> Result<UpsertOutcome, DbError> {
    let comments = serde_json::to_value(&post.comments)?;
    let mut tx = pool.begin().await?;

    let existing = lookup_image_id(&mut *tx, post.platform, &post.post_id).await?;
    let (image_id, image_written) = match plan_image_write(existing, image_bytes) {
        ImagePlan::Reuse(id) => (Some(id), false),
        ImagePlan::Write(bytes) => {
            let (id, written) = insert_image(&mut tx, subject, post, bytes).await?;
            (Some(id), written)
        }
        ImagePlan::Skip => (None, false),
    };

    let (post_row_id, inserted) = sqlx::query_as::<_, (i64, bool)>(
        "INSERT INTO social_posts \
             (platform, post_id, subject, text, created_time, image_url, image_id, \
              comments, raw) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (platform, post_id) DO UPDATE SET \
             subject      = EXCLUDED.subject, \
             text         = EXCLUDED.text, \
             created_time = EXCLUDED.created_time, \
             image_url    = EXCLUDED.image_url, \
             image_id     = EXCLUDED.image_id, \
             comments     = EXCLUDED.comments, \
             raw          = EXCLUDED.raw, \
             updated_at   = NOW() \
         RETURNING id, (xmax = 0) AS inserted",
    )
    .bind(post.platform.as_str())
    .bind(&post.post_id)
    .bind(subject)
    .bind(&post.text)
    .bind(&post.created_time)
    .bind(&post.image_url)
    .bind(image_id)
    .bind(comments)
    .bind(&post.raw)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(UpsertOutcome {
        post_row_id,
        image_id,
        image_written,
        inserted,
    })
}

async fn lookup_image_id<'e, E>(
    executor: E,
    platform: Platform,
    post_id: &str,
) -> Result<Option<i64>, DbError>
where
    E: PgExecutor<'e>,
{
    // The post row's reference wins; an orphaned asset for the identity is
    // picked up as well so it gets linked instead of duplicated.
    let id = sqlx::query_scalar::<_, Option<i64>>(
        "SELECT COALESCE( \
             (SELECT image_id FROM social_posts WHERE platform = $1 AND post_id = $2), \
             (SELECT id FROM social_post_images WHERE platform = $1 AND post_id = $2) \
         )",
    )
    .bind(platform.as_str())
    .bind(post_id)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

/// Inserts the asset row unless one already exists for the identity.
///
/// Returns the asset id and whether this call wrote it.
async fn insert_image(
    tx: &mut Transaction<'_, Postgres>,
    subject: &str,
    post: &SocialPost,
    bytes: &[u8],
) -> Result<(i64, bool), DbError> {
    let sha256 = format!("{:x}", Sha256::digest(bytes));
    let byte_size = i64::try_from(bytes.len()).unwrap_or(i64::MAX);

    let inserted = sqlx::query_scalar::<_, i64>(
        "INSERT INTO social_post_images \
             (platform, post_id, subject, filename, sha256, byte_size, data) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (platform, post_id) DO NOTHING \
         RETURNING id",
    )
    .bind(post.platform.as_str())
    .bind(&post.post_id)
    .bind(subject)
    .bind(post.image_filename())
    .bind(&sha256)
    .bind(byte_size)
    .bind(bytes)
    .fetch_optional(&mut **tx)
    .await?;

    if let Some(id) = inserted {
        return Ok((id, true));
    }

    // Another writer stored the asset first.
    let id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM social_post_images WHERE platform = $1 AND post_id = $2",
    )
    .bind(post.platform.as_str())
    .bind(&post.post_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok((id, false))
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Fetches a stored post by identity.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists, or [`DbError::Sqlx`] if the
/// query fails.
pub async fn get_social_post(
    pool: &PgPool,
    platform: Platform,
    post_id: &str,
) -> Result<SocialPostRow, DbError> {
    let row = sqlx::query_as::<_, SocialPostRow>(&format!(
        "SELECT {POST_COLUMNS} FROM social_posts WHERE platform = $1 AND post_id = $2"
    ))
    .bind(platform.as_str())
    .bind(post_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Returns up to `limit` posts tagged with `subject`, newest `created_time` first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_social_posts_by_subject(
    pool: &PgPool,
    subject: &str,
    limit: i64,
) -> Result<Vec<SocialPostRow>, DbError> {
    let rows = sqlx::query_as::<_, SocialPostRow>(&format!(
        "SELECT {POST_COLUMNS} FROM social_posts \
         WHERE subject = $1 \
         ORDER BY created_time DESC NULLS LAST, id DESC \
         LIMIT $2"
    ))
    .bind(subject)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
