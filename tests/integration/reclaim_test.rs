//! Integration tests for the reclamation trigger.

mod helpers;

use http::StatusCode;

use helpers::{RECLAIM_SECRET, TestApp};

#[tokio::test]
async fn test_reclaim_requires_bearer_secret() {
    let app = TestApp::new().await;

    let missing = app.request("POST", "/api/reclaim", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let wrong = app
        .request("POST", "/api/reclaim", None, Some("not-the-secret"))
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.message(), "Unauthorized");
}

#[tokio::test]
async fn test_reclaim_without_configured_secret_fails_closed() {
    let app = TestApp::with_reclaim_secret(None).await;

    let response = app
        .request("POST", "/api/reclaim", None, Some(RECLAIM_SECRET))
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "MISCONFIGURED");
}

#[tokio::test]
async fn test_reclaim_with_nothing_expired() {
    let app = TestApp::new().await;
    app.share_text("fresh", None).await;

    let response = app
        .request("POST", "/api/reclaim", None, Some(RECLAIM_SECRET))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        serde_json::json!({ "ok": true, "deletedRows": 0, "removedBlobs": 0 })
    );
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_reclaim_removes_expired_rows_and_blobs() {
    let app = TestApp::new().await;
    app.share_text("text", Some("900")).await;
    app.share_file("a.bin", "application/octet-stream", b"\x00\x01\x02")
        .await;
    app.share_text("survivor", Some("86400")).await;

    let viewed = app.request("GET", "/api/shares/2", None, None).await;
    let signed_url = viewed.body["signedUrl"].as_str().unwrap().to_string();

    app.advance(900);
    let response = app
        .request("POST", "/api/reclaim", None, Some(RECLAIM_SECRET))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["deletedRows"], 2);
    assert_eq!(response.body["removedBlobs"], 1);
    assert_eq!(app.store.len().await, 1);

    let gone = app.request("GET", "/api/shares/1", None, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);

    let survivor = app.request("GET", "/api/shares/3", None, None).await;
    assert_eq!(survivor.body["content"], "survivor");

    let download = app.follow(&signed_url).await;
    assert_eq!(download.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reclaim_is_idempotent() {
    let app = TestApp::new().await;
    app.share_text("text", Some("900")).await;
    app.advance(1000);

    let first = app
        .request("POST", "/api/reclaim", None, Some(RECLAIM_SECRET))
        .await;
    assert_eq!(first.body["deletedRows"], 1);

    let second = app
        .request("POST", "/api/reclaim", None, Some(RECLAIM_SECRET))
        .await;
    assert_eq!(second.body["deletedRows"], 0);
    assert_eq!(second.body["removedBlobs"], 0);
}
