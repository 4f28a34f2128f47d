mod collect;
mod posts;

use clap::{Parser, Subcommand};
use smdb_core::Platform;
use tracing_subscriber::EnvFilter;

use crate::collect::CollectArgs;
use crate::posts::PostsCommands;

#[derive(Debug, Parser)]
#[command(name = "smdb")]
#[command(about = "Social media post ingestion and storage")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch posts mentioning a subject and store them
    Collect {
        /// Case-insensitive text every stored post must contain
        #[arg(long, value_parser = parse_subject)]
        subject: String,

        /// Raw items to inspect per platform (defaults to SMDB_DEFAULT_LIMIT)
        #[arg(long, value_parser = parse_limit)]
        limit: Option<usize>,

        /// Collect from the configured Facebook page
        #[arg(long)]
        facebook: bool,

        /// Collect from the configured Instagram business account
        #[arg(long)]
        instagram: bool,

        /// Resolve platforms and credentials, print the plan, and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Query stored posts
    Posts {
        #[command(subcommand)]
        command: PostsCommands,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

pub(crate) fn parse_subject(raw: &str) -> Result<String, String> {
    let subject = raw.trim();
    if subject.is_empty() {
        return Err("subject must not be blank".to_string());
    }
    Ok(subject.to_string())
}

fn parse_limit(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("limit must be greater than zero".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Platforms named by flags, in a stable order. Empty means "use defaults".
fn selected_platforms(facebook: bool, instagram: bool) -> Vec<Platform> {
    let mut platforms = Vec::new();
    if facebook {
        platforms.push(Platform::Facebook);
    }
    if instagram {
        platforms.push(Platform::Instagram);
    }
    platforms
}

/// Mark a collection run failed, logging (not propagating) any error doing so.
pub(crate) async fn fail_run_best_effort(
    pool: &sqlx::PgPool,
    run_id: i64,
    context: &'static str,
    message: String,
) {
    if let Err(mark_err) = smdb_db::fail_collection_run(pool, run_id, &message).await {
        tracing::error!(
            run_id,
            error = %mark_err,
            "failed to mark {context} run as failed"
        );
    }
}

async fn connect(config: &smdb_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = smdb_db::PoolConfig::from_app_config(config);
    let pool = smdb_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("smdb: no command given; run `smdb --help` for usage");
        return Ok(());
    };

    // Reads `.env` before the process environment.
    let config = smdb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Collect {
            subject,
            limit,
            facebook,
            instagram,
            dry_run,
        } => {
            let args = CollectArgs {
                subject,
                limit,
                platforms: selected_platforms(facebook, instagram),
                dry_run,
            };
            collect::run_collect(&config, &args).await
        }
        Commands::Posts {
            command: PostsCommands::List { subject, limit },
        } => {
            let pool = connect(&config).await?;
            posts::run_posts_list(&pool, &subject, limit).await
        }
        Commands::Db { command } => {
            let pool = connect(&config).await?;
            match command {
                DbCommands::Ping => {
                    smdb_db::health_check(&pool).await?;
                    println!("database reachable");
                }
                DbCommands::Migrate => {
                    let applied = smdb_db::run_migrations(&pool).await?;
                    println!("applied {applied} migrations");
                }
            }
            Ok(())
        }
    }
}
