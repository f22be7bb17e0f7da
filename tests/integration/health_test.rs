//! Integration tests for liveness and readiness.

mod helpers;

use http::StatusCode;

use helpers::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert!(response.body["version"].is_string());
}

#[tokio::test]
async fn test_readiness_reports_backends() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health/ready", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["database"]["healthy"], true);
    assert_eq!(response.body["storage"]["backend"], "local");
    assert_eq!(response.body["storage"]["healthy"], true);
}
