//! Reads for `social_post_images`. Rows are only ever written by
//! [`crate::upsert_social_post`].

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `social_post_images` table.
#[derive(Clone, sqlx::FromRow)]
pub struct PostImageRow {
    pub id: i64,
    pub platform: String,
    pub post_id: String,
    /// Subject of the run that first stored the image.
    pub subject: String,
    /// `<platform>_<post_id>.jpg`
    pub filename: String,
    /// Lowercase hex SHA-256 of `data`.
    pub sha256: String,
    pub byte_size: i64,
    pub data: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for PostImageRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostImageRow")
            .field("id", &self.id)
            .field("platform", &self.platform)
            .field("post_id", &self.post_id)
            .field("subject", &self.subject)
            .field("filename", &self.filename)
            .field("sha256", &self.sha256)
            .field("byte_size", &self.byte_size)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Fetches a stored image asset by its internal `id`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_post_image(pool: &PgPool, id: i64) -> Result<PostImageRow, DbError> {
    let row = sqlx::query_as::<_, PostImageRow>(
        "SELECT id, platform, post_id, subject, filename, sha256, byte_size, data, created_at \
         FROM social_post_images \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}
