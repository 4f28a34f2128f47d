//! Offline unit tests for smdb-db pool configuration and row types.
//! These tests do not require a live database connection.

use smdb_core::{AppConfig, Comment, Environment, Platform};
use smdb_db::{plan_image_write, CollectionRunRow, ImagePlan, PoolConfig, SocialPostRow};

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        graph_api_version: "v18.0".to_string(),
        graph_base_url: "https://graph.facebook.com".to_string(),
        request_timeout_secs: 20,
        user_agent: "ua".to_string(),
        upsert_delay_ms: 0,
        default_limit: 50,
        default_platforms: Platform::ALL.to_vec(),
        fb_access_token: None,
        fb_page_id: None,
        ig_access_token: None,
        ig_user_id: None,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`CollectionRunRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn collection_run_row_has_expected_fields() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = CollectionRunRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        run_type: "social_posts".to_string(),
        trigger_source: "cli".to_string(),
        status: "queued".to_string(),
        started_at: None,
        completed_at: None,
        records_processed: 0_i32,
        error_message: None,
        created_at: Utc::now(),
    };

    assert_eq!(row.run_type, "social_posts");
    assert_eq!(row.status, "queued");
    assert!(row.started_at.is_none());
    assert_eq!(row.records_processed, 0);
}

#[test]
fn social_post_row_exposes_typed_comments() {
    use chrono::Utc;
    use sqlx::types::Json;

    let row = SocialPostRow {
        id: 3,
        platform: "instagram".to_string(),
        post_id: "17890".to_string(),
        subject: "acme".to_string(),
        text: "Acme launch".to_string(),
        created_time: Some("2024-04-01T12:00:00+0000".to_string()),
        image_url: None,
        image_id: None,
        comments: Json(vec![Comment {
            message: "great".to_string(),
            created_time: None,
            author_name: Some("alice".to_string()),
        }]),
        raw: serde_json::json!({"id": "17890"}),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.comments.0.len(), 1);
    assert_eq!(row.comments.0[0].author_name.as_deref(), Some("alice"));
    assert_eq!(row.platform.parse::<Platform>().unwrap(), Platform::Instagram);
}

#[test]
fn image_plan_prefers_existing_asset() {
    let fresh: &[u8] = b"bytes";
    assert_eq!(plan_image_write(Some(11), Some(fresh)), ImagePlan::Reuse(11));
    assert_eq!(plan_image_write(None, Some(fresh)), ImagePlan::Write(fresh));
}
