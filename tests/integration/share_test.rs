//! Integration tests for share create, view and download.

mod helpers;

use http::StatusCode;

use helpers::{Multipart, TestApp};

#[tokio::test]
async fn test_create_and_view_text_share() {
    let app = TestApp::new().await;

    let created = app.share_text("hello receiver", Some("1800")).await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    assert_eq!(created.body["code"], 1);
    assert_eq!(created.body["url"], "http://drop.test/s/1");
    assert!(created.body["expiresAt"].is_string());

    let viewed = app.request("GET", "/api/shares/1", None, None).await;
    assert_eq!(viewed.status, StatusCode::OK);
    assert_eq!(viewed.body["kind"], "text");
    assert_eq!(viewed.body["content"], "hello receiver");
    assert_eq!(viewed.body["expiresAt"], created.body["expiresAt"]);
}

#[tokio::test]
async fn test_codes_are_allocated_lowest_first() {
    let app = TestApp::new().await;

    for expected in 1..=3 {
        let created = app.share_text("x", None).await;
        assert_eq!(created.body["code"], expected);
    }
}

#[tokio::test]
async fn test_viewing_text_does_not_consume_it() {
    let app = TestApp::new().await;
    app.share_text("still here", None).await;

    for _ in 0..3 {
        let viewed = app.request("GET", "/api/shares/1", None, None).await;
        assert_eq!(viewed.status, StatusCode::OK);
        assert_eq!(viewed.body["content"], "still here");
    }
}

#[tokio::test]
async fn test_file_share_downloads_through_signed_url() {
    let app = TestApp::new().await;

    let created = app
        .share_file("report final.pdf", "application/pdf", b"%PDF-1.7 bytes")
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);

    let viewed = app.request("GET", "/api/shares/1", None, None).await;
    assert_eq!(viewed.status, StatusCode::OK);
    assert_eq!(viewed.body["kind"], "file");
    assert_eq!(viewed.body["fileName"], "report final.pdf");
    assert_eq!(viewed.body["contentType"], "application/pdf");
    assert_eq!(viewed.body["expiresInSeconds"], 60);

    let signed_url = viewed.body["signedUrl"].as_str().unwrap();
    assert!(signed_url.starts_with("http://drop.test/api/blobs/"));

    let download = app.follow(signed_url).await;
    assert_eq!(download.status, StatusCode::OK);
    assert_eq!(download.raw, b"%PDF-1.7 bytes");
    assert_eq!(download.header("content-type"), Some("application/pdf"));
    assert_eq!(download.header("cache-control"), Some("no-store"));
    assert!(
        download
            .header("content-disposition")
            .unwrap()
            .contains("report final.pdf")
    );
}

#[tokio::test]
async fn test_file_name_separators_are_sanitized() {
    let app = TestApp::new().await;
    app.share_file("../../etc/passwd", "text/plain", b"root").await;

    let viewed = app.request("GET", "/api/shares/1", None, None).await;
    assert_eq!(viewed.body["fileName"], ".._.._etc_passwd");
}

#[tokio::test]
async fn test_file_wins_when_both_are_sent() {
    let app = TestApp::new().await;
    let form = Multipart::new()
        .text("text", "ignored")
        .file("file", "a.txt", "text/plain", b"file body");
    let created = app.post_form("/api/shares", form).await;
    assert_eq!(created.status, StatusCode::OK);

    let viewed = app.request("GET", "/api/shares/1", None, None).await;
    assert_eq!(viewed.body["kind"], "file");
}

#[tokio::test]
async fn test_tampered_signature_is_rejected() {
    let app = TestApp::new().await;
    app.share_file("a.txt", "text/plain", b"data").await;
    let viewed = app.request("GET", "/api/shares/1", None, None).await;
    let signed_url = viewed.body["signedUrl"].as_str().unwrap();

    let tampered = format!("{}x", signed_url);
    let download = app.follow(&tampered).await;
    assert_eq!(download.status, StatusCode::UNAUTHORIZED);
    assert_eq!(download.message(), "Invalid download link");
}

#[tokio::test]
async fn test_invalid_ttl_is_rejected() {
    let app = TestApp::new().await;

    for ttl in ["60", "1000", "forever"] {
        let created = app.share_text("x", Some(ttl)).await;
        assert_eq!(created.status, StatusCode::BAD_REQUEST, "ttl {ttl}");
        assert_eq!(created.body["error"], "VALIDATION_ERROR");
    }
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_empty_payload_is_rejected() {
    let app = TestApp::new().await;

    let created = app.post_form("/api/shares", Multipart::new().text("text", "   ")).await;
    assert_eq!(created.status, StatusCode::BAD_REQUEST);
    assert_eq!(created.message(), "Provide either text or a file.");
}

#[tokio::test]
async fn test_oversized_text_is_rejected() {
    let app = TestApp::new().await;

    let created = app.share_text(&"a".repeat(100_001), None).await;
    assert_eq!(created.status, StatusCode::BAD_REQUEST);
    assert_eq!(created.message(), "Text too large (max 100000 chars).");
}

#[tokio::test]
async fn test_oversized_file_is_rejected_with_stable_message() {
    let app = TestApp::new().await;
    let expected = "File too large (max 20971520 bytes).";

    // Just over the payload cap, still inside the request body limit.
    let just_over = vec![b'a'; 20 * 1024 * 1024 + 1];
    let created = app
        .share_file("big.bin", "application/octet-stream", &just_over)
        .await;
    assert_eq!(created.status, StatusCode::BAD_REQUEST);
    assert_eq!(created.message(), expected);

    // Past the request body limit, cut off while streaming.
    let far_over = vec![b'a'; 23 * 1024 * 1024];
    let created = app
        .share_file("big.bin", "application/octet-stream", &far_over)
        .await;
    assert_eq!(created.status, StatusCode::BAD_REQUEST);
    assert_eq!(created.message(), expected);

    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_json_body_is_rejected() {
    let app = TestApp::new().await;

    let created = app
        .request(
            "POST",
            "/api/shares",
            Some(serde_json::json!({ "text": "hello" })),
            None,
        )
        .await;
    assert_eq!(created.status, StatusCode::BAD_REQUEST);
    assert_eq!(created.message(), "Expected multipart/form-data");
}

#[tokio::test]
async fn test_unknown_and_malformed_codes_are_not_found() {
    let app = TestApp::new().await;

    for path in ["/api/shares/1", "/api/shares/0", "/api/shares/101", "/api/shares/abc"] {
        let viewed = app.request("GET", path, None, None).await;
        assert_eq!(viewed.status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(viewed.message(), "Share not found");
    }
}

#[tokio::test]
async fn test_expired_share_is_gone() {
    let app = TestApp::new().await;
    app.share_text("short lived", Some("900")).await;

    app.advance(899);
    let viewed = app.request("GET", "/api/shares/1", None, None).await;
    assert_eq!(viewed.status, StatusCode::OK);

    app.advance(1);
    let viewed = app.request("GET", "/api/shares/1", None, None).await;
    assert_eq!(viewed.status, StatusCode::GONE);
    assert_eq!(viewed.message(), "This link has expired");
}

#[tokio::test]
async fn test_expired_code_is_reused_and_latest_share_wins() {
    let app = TestApp::new().await;
    app.share_text("first", Some("900")).await;
    app.share_text("second", Some("86400")).await;

    app.advance(900);
    let created = app.share_text("third", None).await;
    assert_eq!(created.body["code"], 1);

    let viewed = app.request("GET", "/api/shares/1", None, None).await;
    assert_eq!(viewed.status, StatusCode::OK);
    assert_eq!(viewed.body["content"], "third");
}

#[tokio::test]
async fn test_namespace_exhaustion() {
    let app = TestApp::new().await;

    for expected in 1..=100 {
        let created = app.share_text("x", Some("86400")).await;
        assert_eq!(created.body["code"], expected);
    }

    let created = app.share_text("one too many", Some("86400")).await;
    assert_eq!(created.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(created.body["error"], "RESOURCE_EXHAUSTED");
    assert_eq!(app.store.len().await, 100);
}
