//! Read-only queries over stored posts.

use clap::Subcommand;

/// Sub-commands available under `posts`.
#[derive(Debug, Subcommand)]
pub enum PostsCommands {
    /// List stored posts for a subject, newest first
    List {
        /// Subject the posts were collected under
        #[arg(long, value_parser = crate::parse_subject)]
        subject: String,
        /// Maximum number of posts to show
        #[arg(long, default_value = "20", value_parser = parse_row_limit)]
        limit: i64,
    },
}

const TEXT_WIDTH: usize = 50;

fn parse_row_limit(raw: &str) -> Result<i64, String> {
    match raw.parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => Err("limit must be greater than zero".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// Prints a table of posts stored under `subject`, up to `limit` rows.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_posts_list(
    pool: &sqlx::PgPool,
    subject: &str,
    limit: i64,
) -> anyhow::Result<()> {
    let rows = smdb_db::list_social_posts_by_subject(pool, subject, limit).await?;

    if rows.is_empty() {
        println!("no posts stored for subject '{subject}'; run `smdb collect` first");
        return Ok(());
    }

    println!(
        "{:<11}{:<22}{:<26}{:<7}{:<10}TEXT",
        "PLATFORM", "POST ID", "CREATED", "IMAGE", "COMMENTS"
    );
    for row in &rows {
        println!(
            "{:<11}{:<22}{:<26}{:<7}{:<10}{}",
            row.platform,
            row.post_id,
            created_label(row.created_time.as_deref()),
            if row.image_id.is_some() { "yes" } else { "no" },
            row.comments.0.len(),
            truncate(&row.text, TEXT_WIDTH),
        );
    }

    Ok(())
}

fn created_label(created_time: Option<&str>) -> &str {
    created_time.unwrap_or("-")
}

/// Single-line preview of `text`, at most `width` characters plus an ellipsis.
fn truncate(text: &str, width: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > width || line.len() < text.len() {
        format!("{}...", line.chars().take(width).collect::<String>())
    } else {
        line.to_string()
    }
}
