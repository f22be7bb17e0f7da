//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono::{Duration, Utc};
use http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use dropcode_api::{AppState, build_router};
use dropcode_core::config::AppConfig;
use dropcode_core::traits::{BlobStore, ManualClock};
use dropcode_database::{MemoryShareStore, ShareStore};
use dropcode_storage::{BlobUrlSigner, LocalBlobStore};

/// Bearer secret configured by [`TestApp::new`].
pub const RECLAIM_SECRET: &str = "test-reclaim-secret";

const SIGNING_SECRET: &str = "integration-signing-secret-0123";
const BOUNDARY: &str = "dropcode-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Row store behind the router
    pub store: Arc<MemoryShareStore>,
    /// Clock every expiry decision reads
    pub clock: Arc<ManualClock>,
    /// Application config
    pub config: AppConfig,
    _blobs: TempDir,
}

impl TestApp {
    /// Create a test application with a reclaim secret configured
    pub async fn new() -> Self {
        Self::with_reclaim_secret(Some(RECLAIM_SECRET)).await
    }

    /// Create a test application with the given reclaim secret
    pub async fn with_reclaim_secret(secret: Option<&str>) -> Self {
        let blobs = TempDir::new().expect("Failed to create blob dir");

        let mut config = AppConfig::default();
        config.server.public_base_url = "http://drop.test".to_string();
        config.storage.signing_secret = SIGNING_SECRET.to_string();
        config.storage.local.root_path = blobs.path().to_string_lossy().into_owned();
        config.reclaim.secret = secret.map(str::to_string);
        config.validate().expect("Test config should be valid");

        let signer = BlobUrlSigner::new(&config.storage.signing_secret, config.server.base_url());
        let blob_store: Arc<dyn BlobStore> = Arc::new(
            LocalBlobStore::new(
                &config.storage.local.root_path,
                &config.storage.bucket,
                signer,
            )
            .await
            .expect("Failed to init blob store"),
        );

        let store = Arc::new(MemoryShareStore::new());
        let share_store: Arc<dyn ShareStore> = store.clone();
        let clock = Arc::new(ManualClock::new(Utc::now()));

        let state = AppState::new(config.clone(), share_store, blob_store, clock.clone());
        let router = build_router(state);

        Self {
            router,
            store,
            clock,
            config,
            _blobs: blobs,
        }
    }

    /// Move the server clock forward
    pub fn advance(&self, seconds: i64) {
        self.clock.advance(Duration::seconds(seconds));
    }

    /// Create a text share through the API
    pub async fn share_text(&self, text: &str, ttl: Option<&str>) -> TestResponse {
        let mut form = Multipart::new().text("text", text);
        if let Some(ttl) = ttl {
            form = form.text("expiresInSeconds", ttl);
        }
        self.post_form("/api/shares", form).await
    }

    /// Create a file share through the API
    pub async fn share_file(
        &self,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> TestResponse {
        let form = Multipart::new().file("file", file_name, content_type, data);
        self.post_form("/api/shares", form).await
    }

    /// POST a multipart form
    pub async fn post_form(&self, path: &str, form: Multipart) -> TestResponse {
        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(form.finish()))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Follow an absolute URL minted by the server
    pub async fn follow(&self, url: &str) -> TestResponse {
        let path = url
            .strip_prefix(self.config.server.base_url())
            .expect("URL should point at this server");
        self.request("GET", path, None, None).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            raw: body_bytes.to_vec(),
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when the body is not JSON
    pub body: Value,
    /// Body bytes as received
    pub raw: Vec<u8>,
}

impl TestResponse {
    /// A header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `message` field of an error body
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

/// Hand-built `multipart/form-data` body
#[derive(Debug, Default)]
pub struct Multipart {
    body: Vec<u8>,
}

impl Multipart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plain form field
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    /// Append a file field
    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Close the body
    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}
