//! API integration tests for the file, link, override and logging endpoints.
//!
//! Tests verify:
//! - Response bodies, status codes and download headers
//! - What the client factory was asked to do per request
//! - Error mapping for missing settings and backend failures

use std::time::{Duration, SystemTime};

use axum::http::StatusCode;

use cloud_demo::error::StorageError;
use cloud_demo::{create_router, AppState, RouterConfig, Settings, SignatureVersion};

use super::test_utils::{
    assert_error, assets_dir, body_bytes, body_json, body_text, full_settings, get,
    settings_from_json, test_router, MockClientFactory,
};

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let router = test_router(Settings::default(), MockClientFactory::new());

    let response = get(router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route() {
    let router = test_router(full_settings(), MockClientFactory::new());

    let response = get(router, "/api/does/not/exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Environment Override
// =============================================================================

#[tokio::test]
async fn test_environment_override_value() {
    let router = test_router(full_settings(), MockClientFactory::new());

    let response = get(router, "/api/environment/override").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "from-base");
}

#[tokio::test]
async fn test_environment_override_unset() {
    let router = test_router(Settings::default(), MockClientFactory::new());

    let response = get(router, "/api/environment/override").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_environment_variable_wins_over_files() {
    let settings = cloud_demo::resolve(
        Some(r#"{"EnvironmentOverride": "base"}"#),
        Some(r#"{"EnvironmentOverride": "staging"}"#),
        Some(r#"{"EnvironmentOverride": "private"}"#),
        vec![("EnvironmentOverride", "from-env")],
    )
    .unwrap();
    let router = test_router(settings, MockClientFactory::new());

    let response = get(router, "/api/environment/override").await;
    assert_eq!(body_text(response).await, "from-env");
}

// =============================================================================
// Sample File
// =============================================================================

#[tokio::test]
async fn test_sample_file_download() {
    let router = test_router(Settings::default(), MockClientFactory::new());

    let response = get(router, "/api/file/sample").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/vnd.ms-excel"
    );
    assert_eq!(
        response.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"HelloDevWeek.xlsx\""
    );

    let body = body_bytes(response).await;
    let on_disk = std::fs::read(assets_dir().join("HelloDevWeek.xlsx")).unwrap();
    assert_eq!(&body[..], &on_disk[..]);
    assert!(body.starts_with(b"PK"));
}

#[tokio::test]
async fn test_sample_file_missing() {
    let empty = tempfile::tempdir().unwrap();
    let state = AppState::new(Settings::default(), MockClientFactory::new(), empty.path());
    let router = create_router(state, RouterConfig::default().with_tracing(false));

    let response = get(router, "/api/file/sample").await;
    assert_error(response, StatusCode::INTERNAL_SERVER_ERROR, "resource_error").await;
}

// =============================================================================
// Presigned Link
// =============================================================================

#[tokio::test]
async fn test_file_link() {
    let factory = MockClientFactory::new();
    let calls = factory.calls();
    let router = test_router(full_settings(), factory);

    let before = SystemTime::now();
    let response = get(router, "/api/file/link").await;
    let after = SystemTime::now();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        "https://demo-bucket.s3.eu-west-1.amazonaws.com/HelloDevWeek.txt?X-Amz-Expires=60"
    );

    let calls = calls.lock().unwrap();
    assert_eq!(
        calls.storage_clients,
        vec![("eu-west-1".to_string(), SignatureVersion::V4)]
    );
    assert_eq!(calls.presigned.len(), 1);

    let request = &calls.presigned[0];
    assert_eq!(request.bucket, "demo-bucket");
    assert_eq!(request.key, "HelloDevWeek.txt");
    assert_eq!(request.expires_in, Duration::from_secs(60));
    assert!(request.issued_at >= before && request.issued_at <= after);
}

#[tokio::test]
async fn test_file_link_builds_fresh_handle_per_request() {
    let factory = MockClientFactory::new();
    let calls = factory.calls();
    let router = test_router(full_settings(), factory);

    for _ in 0..3 {
        let response = get(router.clone(), "/api/file/link").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(calls.lock().unwrap().storage_clients.len(), 3);
}

#[tokio::test]
async fn test_file_link_default_region() {
    let factory = MockClientFactory::new();
    let calls = factory.calls();
    let router = test_router(settings_from_json(r#"{"AppS3Bucket": "b"}"#), factory);

    let response = get(router, "/api/file/link").await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(calls.lock().unwrap().storage_clients[0].0, "us-east-1");
}

#[tokio::test]
async fn test_file_link_region_from_environment_variable() {
    let settings = cloud_demo::resolve(
        Some(r#"{"AppS3Bucket": "b"}"#),
        None,
        None,
        vec![("AWS_REGION", "ap-south-1")],
    )
    .unwrap();
    let factory = MockClientFactory::new();
    let calls = factory.calls();
    let router = test_router(settings, factory);

    let response = get(router, "/api/file/link").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(calls.lock().unwrap().storage_clients[0].0, "ap-south-1");
}

#[tokio::test]
async fn test_file_link_missing_bucket() {
    let factory = MockClientFactory::new();
    let calls = factory.calls();
    let router = test_router(Settings::default(), factory);

    let response = get(router, "/api/file/link").await;
    assert_error(response, StatusCode::INTERNAL_SERVER_ERROR, "configuration_error").await;

    assert!(calls.lock().unwrap().presigned.is_empty());
}

#[tokio::test]
async fn test_file_link_storage_failure() {
    let factory =
        MockClientFactory::new().with_storage_failure(StorageError::S3("AccessDenied".into()));
    let router = test_router(full_settings(), factory);

    let response = get(router, "/api/file/link").await;
    assert_error(response, StatusCode::INTERNAL_SERVER_ERROR, "storage_error").await;
}

// =============================================================================
// Logging Endpoints
// =============================================================================

#[tokio::test]
async fn test_gateway_oversized_response() {
    let router = test_router(Settings::default(), MockClientFactory::new());

    let response = get(router.clone(), "/api/logging/gateway").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_bytes(response).await;
    assert_eq!(body.len(), 8_388_608);
    assert!(body.iter().all(|&b| b == b'A'));

    // The msg parameter does not change the response
    let response = get(router, "/api/logging/gateway?msg=hello").await;
    assert_eq!(body_bytes(response).await.len(), 8_388_608);
}

#[tokio::test]
async fn test_gateway_ignores_query_shape() {
    let router = test_router(Settings::default(), MockClientFactory::new());

    for uri in [
        "/api/logging/gateway?msg=a&msg=b",
        "/api/logging/gateway?msg",
        "/api/logging/gateway?msg=%ZZ&other=1",
        "/api/logging/gateway?&&=",
    ] {
        let response = get(router.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::OK, "uri: {}", uri);
        assert_eq!(body_bytes(response).await.len(), 8_388_608, "uri: {}", uri);
    }
}

#[tokio::test]
async fn test_console_echo() {
    let router = test_router(Settings::default(), MockClientFactory::new());

    let response = get(router.clone(), "/api/logging/console/hello").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Message logged to console: hello");

    let response = get(router, "/api/logging/console/two%0Alines").await;
    assert_eq!(
        body_text(response).await,
        "Message logged to console: two\nlines"
    );
}

#[tokio::test]
async fn test_custom_log_echo() {
    let router = test_router(Settings::default(), MockClientFactory::new());

    let response = get(router.clone(), "/api/logging/custom/hello%20world").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        "Message logged to cloudwatch: hello world"
    );
}
