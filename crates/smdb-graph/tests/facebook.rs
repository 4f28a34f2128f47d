//! Integration tests for `FacebookConnector` using wiremock HTTP mocks.

mod common;

use smdb_core::Platform;
use smdb_graph::{Connector, FacebookConnector, GraphError};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{facebook_credentials, next_url, settings};

const POSTS_PATH: &str = "/v18.0/page-1/posts";

fn connector(server: &MockServer) -> FacebookConnector {
    FacebookConnector::new(&facebook_credentials(), &settings(&server.uri()))
        .expect("connector construction should not fail")
}

#[tokio::test]
async fn attachment_image_becomes_image_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .and(query_param("access_token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{
                "id": "p1",
                "message": "I love Acme widgets",
                "attachments": {"data": [{"media": {"image": {"src": "http://img/a.jpg"}}}]}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let posts = connector(&server)
        .fetch_posts("acme", 10)
        .await
        .expect("fetch should succeed");

    assert_eq!(posts.len(), 1);
    let post = &posts[0];
    assert_eq!(post.platform, Platform::Facebook);
    assert_eq!(post.post_id, "p1");
    assert_eq!(post.text, "I love Acme widgets");
    assert_eq!(post.image_url.as_deref(), Some("http://img/a.jpg"));
    assert_eq!(post.raw["id"], "p1");
}

#[tokio::test]
async fn filters_by_subject_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .and(query_param_is_missing("after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {"id": "p1", "message": "ACME launch day"},
                {"id": "p2", "message": "unrelated"},
                {"id": "p3"}
            ],
            "paging": {"next": next_url(&server.uri(), "page-1/posts", "c2")}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .and(query_param("after", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{
                "id": "p4",
                "message": "more acme",
                "created_time": "2024-02-01T09:00:00+0000",
                "comments": {"data": [{"message": "great", "from": {"name": "alice"}}]}
            }]
        })))
        .mount(&server)
        .await;

    let posts = connector(&server).fetch_posts("Acme", 10).await.unwrap();

    let ids: Vec<&str> = posts.iter().map(|p| p.post_id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p4"]);
    assert_eq!(posts[1].comments.len(), 1);
    assert_eq!(posts[1].comments[0].author_name.as_deref(), Some("alice"));
    assert_eq!(
        posts[1].created_time.as_deref(),
        Some("2024-02-01T09:00:00+0000")
    );
}

#[tokio::test]
async fn limit_counts_raw_items_not_matches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {"id": "p1", "message": "nothing here"},
                {"id": "p2", "message": "still nothing"},
                {"id": "p3", "message": "acme"}
            ]
        })))
        .mount(&server)
        .await;

    let posts = connector(&server).fetch_posts("acme", 2).await.unwrap();
    assert!(posts.is_empty());
}

#[tokio::test]
async fn matching_item_without_id_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"message": "acme without id"}]
        })))
        .mount(&server)
        .await;

    let err = connector(&server).fetch_posts("acme", 10).await.unwrap_err();
    assert!(matches!(
        err,
        GraphError::MalformedRecord {
            platform: Platform::Facebook,
            field: "id",
            ..
        }
    ));
}

#[tokio::test]
async fn api_error_propagates_through_connector_enum() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {"message": "Permissions error", "code": 10}
        })))
        .mount(&server)
        .await;

    let connector = Connector::Facebook(connector(&server));
    assert_eq!(connector.platform(), Platform::Facebook);

    let err = connector.fetch_posts("acme", 10).await.unwrap_err();
    match err {
        GraphError::RemoteApi { status, payload, .. } => {
            assert_eq!(status, Some(403));
            assert_eq!(payload["message"], "Permissions error");
        }
        other => panic!("expected RemoteApi, got {other:?}"),
    }
}
