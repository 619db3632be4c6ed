//! Test utilities for integration tests.
//!
//! A recording [`ClientFactory`] stands in for AWS so the router can be
//! exercised end to end without network access.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use cloud_demo::clients::{
    ClientFactory, LinkRequest, MessageQueue, ObjectLinker, SignatureVersion,
};
use cloud_demo::error::{QueueError, StorageError};
use cloud_demo::{create_router, resolve, AppState, RouterConfig, Settings, SettingsHandle};

// =============================================================================
// Recorded Calls
// =============================================================================

/// Everything the factory and its handles were asked to do.
#[derive(Debug, Default)]
pub struct CallLog {
    pub storage_clients: Vec<(String, SignatureVersion)>,
    pub presigned: Vec<LinkRequest>,
    pub queue_clients: Vec<(String, String)>,
    pub sent: Vec<(String, String)>,
}

// =============================================================================
// Mock Client Factory
// =============================================================================

/// A [`ClientFactory`] whose handles record their calls and never touch the
/// network.
#[derive(Clone, Default)]
pub struct MockClientFactory {
    calls: Arc<Mutex<CallLog>>,
    storage_failure: Option<StorageError>,
    queue_failure: Option<QueueError>,
}

impl MockClientFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every presign call fail with `error`.
    pub fn with_storage_failure(mut self, error: StorageError) -> Self {
        self.storage_failure = Some(error);
        self
    }

    /// Make every send call fail with `error`.
    pub fn with_queue_failure(mut self, error: QueueError) -> Self {
        self.queue_failure = Some(error);
        self
    }

    /// Shared view of the recorded calls.
    pub fn calls(&self) -> Arc<Mutex<CallLog>> {
        Arc::clone(&self.calls)
    }
}

pub struct MockStorage {
    calls: Arc<Mutex<CallLog>>,
    region: String,
    failure: Option<StorageError>,
}

#[async_trait]
impl ObjectLinker for MockStorage {
    async fn presign_get(&self, request: &LinkRequest) -> Result<String, StorageError> {
        self.calls.lock().unwrap().presigned.push(request.clone());

        if let Some(ref err) = self.failure {
            return Err(err.clone());
        }

        Ok(format!(
            "https://{}.s3.{}.amazonaws.com/{}?X-Amz-Expires={}",
            request.bucket,
            self.region,
            request.key,
            request.expires_in.as_secs()
        ))
    }
}

pub struct MockQueue {
    calls: Arc<Mutex<CallLog>>,
    failure: Option<QueueError>,
}

#[async_trait]
impl MessageQueue for MockQueue {
    async fn send_message(&self, queue_url: &str, body: &str) -> Result<(), QueueError> {
        if let Some(ref err) = self.failure {
            return Err(err.clone());
        }

        self.calls
            .lock()
            .unwrap()
            .sent
            .push((queue_url.to_string(), body.to_string()));
        Ok(())
    }
}

impl ClientFactory for MockClientFactory {
    type Storage = MockStorage;
    type Queue = MockQueue;

    fn storage_client(&self, region: &str, signature: SignatureVersion) -> MockStorage {
        self.calls
            .lock()
            .unwrap()
            .storage_clients
            .push((region.to_string(), signature));

        MockStorage {
            calls: Arc::clone(&self.calls),
            region: region.to_string(),
            failure: self.storage_failure.clone(),
        }
    }

    fn queue_client(&self, region: &str, service_url: &str) -> MockQueue {
        self.calls
            .lock()
            .unwrap()
            .queue_clients
            .push((region.to_string(), service_url.to_string()));

        MockQueue {
            calls: Arc::clone(&self.calls),
            failure: self.queue_failure.clone(),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Bundled resources shipped with the crate.
pub fn assets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
}

/// Resolve a settings view from a single base JSON document.
pub fn settings_from_json(json: &str) -> Settings {
    resolve(Some(json), None, None, Vec::<(String, String)>::new()).unwrap()
}

/// Settings with every key the endpoints use.
pub fn full_settings() -> Settings {
    settings_from_json(
        r#"{
            "AppS3Bucket": "demo-bucket",
            "AppQueueUrl": "https://sqs.eu-west-1.amazonaws.com/123456789012/demo-queue",
            "AWS": { "Region": "eu-west-1" },
            "EnvironmentOverride": "from-base"
        }"#,
    )
}

/// Router over `settings` and `factory`, serving resources from the bundled
/// assets directory.
pub fn test_router(settings: impl Into<SettingsHandle>, factory: MockClientFactory) -> Router {
    let state = AppState::new(settings, factory, assets_dir());
    create_router(state, RouterConfig::default().with_tracing(false))
}

pub async fn get(router: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router.oneshot(request).await.unwrap()
}

pub async fn post_json(router: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    router.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Assert a JSON error body with the given status and error type.
pub async fn assert_error(response: Response<Body>, status: StatusCode, error_type: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["error"], error_type, "unexpected body: {}", json);
    assert_eq!(json["status"], status.as_u16());
}
