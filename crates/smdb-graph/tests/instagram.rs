//! Integration tests for `InstagramConnector` using wiremock HTTP mocks.

mod common;

use smdb_core::{Platform, PlatformCredentials};
use smdb_graph::{Connector, InstagramConnector};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{instagram_credentials, settings};

const MEDIA_PATH: &str = "/v18.0/user-1/media";

fn connector(server: &MockServer) -> InstagramConnector {
    InstagramConnector::new(&instagram_credentials(), &settings(&server.uri()))
        .expect("connector construction should not fail")
}

async fn mount_empty_comments(server: &MockServer, media_id: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/v18.0/{media_id}/comments")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn carousel_resolves_first_image_child() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(MEDIA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{
                "id": "17890",
                "caption": "New Acme carousel",
                "media_type": "CAROUSEL_ALBUM",
                "timestamp": "2024-04-01T12:00:00+0000"
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v18.0/17890"))
        .and(query_param("fields", "children{media_url,media_type}"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "children": {"data": [
                {"media_type": "VIDEO", "media_url": "http://img/v.mp4", "id": "c0"},
                {"media_type": "IMAGE", "media_url": "http://img/b.jpg", "id": "c1"}
            ]},
            "id": "17890"
        })))
        .expect(1)
        .mount(&server)
        .await;

    mount_empty_comments(&server, "17890", 1).await;

    let posts = connector(&server).fetch_posts("acme", 10).await.unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].platform, Platform::Instagram);
    assert_eq!(posts[0].image_url.as_deref(), Some("http://img/b.jpg"));
    assert_eq!(
        posts[0].created_time.as_deref(),
        Some("2024-04-01T12:00:00+0000")
    );
}

#[tokio::test]
async fn non_matching_items_trigger_no_enrichment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(MEDIA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {"id": "1", "caption": "beach day", "media_type": "CAROUSEL_ALBUM"},
                {"id": "2", "media_type": "IMAGE", "media_url": "http://img/2.jpg"},
                {"id": "3", "caption": "Acme", "media_type": "IMAGE", "media_url": "http://img/3.jpg"}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v18.0/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(0)
        .mount(&server)
        .await;
    mount_empty_comments(&server, "1", 0).await;
    mount_empty_comments(&server, "2", 0).await;
    mount_empty_comments(&server, "3", 1).await;

    let posts = connector(&server).fetch_posts("acme", 10).await.unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].post_id, "3");
    assert_eq!(posts[0].image_url.as_deref(), Some("http://img/3.jpg"));
}

#[tokio::test]
async fn direct_media_url_skips_carousel_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(MEDIA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{
                "id": "5",
                "caption": "acme album",
                "media_type": "CAROUSEL_ALBUM",
                "media_url": "http://img/cover.jpg"
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v18.0/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(0)
        .mount(&server)
        .await;
    mount_empty_comments(&server, "5", 1).await;

    let posts = connector(&server).fetch_posts("acme", 10).await.unwrap();
    assert_eq!(posts[0].image_url.as_deref(), Some("http://img/cover.jpg"));
}

#[tokio::test]
async fn comments_are_fetched_per_post_with_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(MEDIA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"id": "9", "caption": "ACME", "media_type": "VIDEO"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v18.0/9/comments"))
        .and(query_param("limit", "25"))
        .and(query_param("fields", "text,timestamp,username"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {"text": "great", "username": "alice", "timestamp": "2024-04-02T00:00:00+0000", "id": "c1"},
                {"text": "meh", "username": "bob", "id": "c2"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let creds = PlatformCredentials::Instagram(instagram_credentials());
    let connector = Connector::new(&creds, &settings(&server.uri())).unwrap();
    assert_eq!(connector.platform(), Platform::Instagram);

    let posts = connector.fetch_posts("acme", 10).await.unwrap();

    assert_eq!(posts.len(), 1);
    assert!(posts[0].image_url.is_none());
    let comments = &posts[0].comments;
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].message, "great");
    assert_eq!(comments[0].author_name.as_deref(), Some("alice"));
    assert_eq!(comments[1].message, "meh");
}

#[tokio::test]
async fn failing_comment_fetch_fails_the_run() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(MEDIA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"id": "9", "caption": "acme", "media_type": "IMAGE", "media_url": "http://img/9.jpg"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v18.0/9/comments"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": {"message": "An unexpected error has occurred.", "code": 2}
        })))
        .mount(&server)
        .await;

    let result = connector(&server).fetch_posts("acme", 10).await;
    assert!(matches!(
        result,
        Err(smdb_graph::GraphError::RemoteApi {
            status: Some(500),
            ..
        })
    ));
}
