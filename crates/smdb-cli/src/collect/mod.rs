//! Collection command handler for the CLI.
//!
//! Resolves which platforms to collect and validates their credentials before
//! any network or database access, then runs each platform in turn. A failing
//! platform is logged and skipped so the others still complete; the run only
//! fails when every platform does.

mod platform;

use std::time::Duration;

use anyhow::Context as _;
use smdb_core::{AppConfig, ConfigError, Platform, PlatformCredentials};
use smdb_graph::{AssetResolver, GraphSettings};

use crate::fail_run_best_effort;

use platform::{collect_platform, PlatformOutcome};

const RUN_TYPE: &str = "social_posts";
const TRIGGER_SOURCE: &str = "cli";

/// Arguments of `smdb collect`, after flag parsing.
#[derive(Debug, Clone)]
pub(crate) struct CollectArgs {
    pub subject: String,
    pub limit: Option<usize>,
    /// Explicitly selected platforms; empty means "use configured defaults".
    pub platforms: Vec<Platform>,
    pub dry_run: bool,
}

/// Everything a run needs, validated up front.
#[derive(Debug)]
pub(crate) struct CollectPlan {
    pub subject: String,
    pub limit: usize,
    pub credentials: Vec<PlatformCredentials>,
    pub upsert_delay: Duration,
}

impl CollectPlan {
    pub(crate) fn platforms(&self) -> Vec<Platform> {
        self.credentials
            .iter()
            .map(PlatformCredentials::platform)
            .collect()
    }
}

/// Resolves platforms and their credentials without touching the network.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformsSelected`] when nothing was selected and
/// no defaults are configured, or [`ConfigError::MissingCredentials`] for the
/// first selected platform lacking credentials.
pub(crate) fn plan_collection(
    config: &AppConfig,
    args: &CollectArgs,
) -> Result<CollectPlan, ConfigError> {
    let platforms = config.resolve_platforms(&args.platforms)?;
    let credentials = platforms
        .iter()
        .map(|p| config.credentials_for(*p))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CollectPlan {
        subject: args.subject.clone(),
        limit: args.limit.unwrap_or(config.default_limit),
        credentials,
        upsert_delay: Duration::from_millis(config.upsert_delay_ms),
    })
}

/// Runs `smdb collect`.
///
/// When `args.dry_run` is `true` the plan is printed and nothing is fetched
/// or written.
///
/// # Errors
///
/// Returns an error if the plan is invalid, the database is unreachable, the
/// collection run cannot be recorded, or every platform fails.
pub(crate) async fn run_collect(config: &AppConfig, args: &CollectArgs) -> anyhow::Result<()> {
    let plan = plan_collection(config, args)?;

    if args.dry_run {
        println!("{}", describe_plan(&plan));
        return Ok(());
    }

    let pool = crate::connect(config).await?;
    let settings = GraphSettings::from_app_config(config);
    let stored = execute_plan(&pool, &settings, config, &plan).await?;

    println!(
        "stored {stored} posts for subject '{}' across {} platforms",
        plan.subject,
        plan.credentials.len()
    );
    Ok(())
}

fn describe_plan(plan: &CollectPlan) -> String {
    let names: Vec<&str> = plan.platforms().iter().map(|p| p.as_str()).collect();
    format!(
        "dry-run: would collect up to {} items per platform mentioning '{}' from [{}]",
        plan.limit,
        plan.subject,
        names.join(", ")
    )
}

/// Collects every planned platform inside one `collection_runs` row and
/// returns the number of posts stored.
pub(crate) async fn execute_plan(
    pool: &sqlx::PgPool,
    settings: &GraphSettings,
    config: &AppConfig,
    plan: &CollectPlan,
) -> anyhow::Result<i32> {
    let resolver = AssetResolver::new(config.request_timeout_secs, &config.user_agent)
        .context("building image downloader")?;

    let run = smdb_db::create_collection_run(pool, RUN_TYPE, TRIGGER_SOURCE).await?;
    if let Err(e) = smdb_db::start_collection_run(pool, run.id).await {
        fail_run_best_effort(pool, run.id, RUN_TYPE, format!("{e:#}")).await;
        return Err(e.into());
    }
    tracing::info!(
        run_id = run.id,
        subject = %plan.subject,
        limit = plan.limit,
        platforms = ?plan.platforms(),
        "collection run started"
    );

    let mut total_stored: i32 = 0;
    let mut failed_platforms: usize = 0;
    let platform_count = plan.credentials.len();

    for credentials in &plan.credentials {
        let platform = credentials.platform();
        let PlatformOutcome { stored, failure } =
            collect_platform(pool, settings, &resolver, credentials, plan).await;
        total_stored = total_stored.saturating_add(stored);

        match failure {
            None => tracing::info!(platform = %platform, stored, "platform collected"),
            Some(e) => {
                tracing::error!(
                    platform = %platform,
                    stored,
                    error = %format!("{e:#}"),
                    "platform collection failed"
                );
                failed_platforms += 1;
            }
        }
    }

    if failed_platforms > 0 {
        tracing::warn!(
            failed_platforms,
            total_platforms = platform_count,
            "some platforms failed during collection"
        );
    }

    if failed_platforms == platform_count {
        let message = format!("all {failed_platforms} platforms failed collection");
        fail_run_best_effort(pool, run.id, RUN_TYPE, message.clone()).await;
        anyhow::bail!("{message}");
    }

    if let Err(err) = smdb_db::complete_collection_run(pool, run.id, total_stored).await {
        let message = format!("{err:#}");
        fail_run_best_effort(pool, run.id, RUN_TYPE, message).await;
        return Err(err.into());
    }
    tracing::info!(run_id = run.id, total_stored, "collection run completed");
    Ok(total_stored)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;
