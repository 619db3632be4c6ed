//! HTTP request handlers.
//!
//! Each handler takes a settings snapshot, delegates to the matching
//! operation in [`crate::service`], and turns the result into a response.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/environment/override` - Environment override value
//! - `GET /api/file/sample` - Bundled sample spreadsheet
//! - `GET /api/file/link` - Presigned download link
//! - `GET /api/logging/gateway` - Oversized response
//! - `GET /api/logging/console/{msg}` - Echo to standard output
//! - `GET /api/logging/custom/{msg}` - Echo to the structured log sink
//! - `POST /api/queue` - Enqueue a message

use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::clients::ClientFactory;
use crate::error::{ApiError, StorageError};
use crate::service::{self, QueueMessage};
use crate::settings::{Settings, SettingsHandle};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
///
/// Holds the settings snapshot publisher, the client factory and the
/// directory bundled resources are read from.
pub struct AppState<F: ClientFactory> {
    /// Current settings view (swapped wholesale on reload)
    pub settings: SettingsHandle,

    /// Builds per-request storage and queue handles
    pub factory: Arc<F>,

    /// Directory containing the bundled sample file
    pub content_root: Arc<PathBuf>,
}

impl<F: ClientFactory> AppState<F> {
    /// Create a new application state.
    pub fn new(
        settings: impl Into<SettingsHandle>,
        factory: F,
        content_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            settings: settings.into(),
            factory: Arc::new(factory),
            content_root: Arc::new(content_root.into()),
        }
    }

    /// The settings view current for this request.
    pub fn settings(&self) -> Arc<Settings> {
        self.settings.snapshot()
    }
}

impl<F: ClientFactory> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            factory: Arc::clone(&self.factory),
            content_root: Arc::clone(&self.content_root),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "configuration_error", "queue_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert ApiError to HTTP response.
///
/// Every variant is a server-side failure of the current request: a setting
/// the operation needs is missing, a backend call failed, or a bundled
/// resource is unreadable.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::Settings(_) => (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error"),
            ApiError::Storage(StorageError::Presign(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "presign_error")
            }
            ApiError::Storage(StorageError::S3(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error")
            }
            ApiError::Queue(_) => (StatusCode::INTERNAL_SERVER_ERROR, "queue_error"),
            ApiError::Resource { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "resource_error"),
        };
        let message = self.to_string();

        error!(
            error_type = error_type,
            status = status.as_u16(),
            "Server error: {}",
            message
        );

        let error_response = ErrorResponse::with_status(error_type, message, status);

        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle health check requests.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Return the environment override setting as plain text.
///
/// Responds `204 No Content` when no layer sets it.
pub async fn environment_override_handler<F>(State(state): State<AppState<F>>) -> Response
where
    F: ClientFactory,
{
    match service::environment_override(&state.settings()) {
        Some(value) => value.into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Serve the bundled sample spreadsheet as a download.
pub async fn file_sample_handler<F>(State(state): State<AppState<F>>) -> Result<Response, ApiError>
where
    F: ClientFactory,
{
    let payload = service::read_sample_file(&state.content_root).await?;

    let headers = [
        (header::CONTENT_TYPE, payload.content_type.to_string()),
        (header::CONTENT_DISPOSITION, payload.content_disposition()),
    ];

    Ok((headers, payload.bytes).into_response())
}

/// Return a 60 second presigned download link as plain text.
pub async fn file_link_handler<F>(State(state): State<AppState<F>>) -> Result<String, ApiError>
where
    F: ClientFactory,
{
    service::presigned_link(state.factory.as_ref(), &state.settings(), SystemTime::now()).await
}

/// Return an 8 MiB body to trip the hosting boundary's size limit.
///
/// The query string (`msg` or anything else) is not read.
pub async fn gateway_handler() -> String {
    service::gateway_payload()
}

/// Echo a message to standard output.
pub async fn console_handler(Path(msg): Path<String>) -> String {
    service::console_echo(&msg)
}

/// Echo a message to the structured log sink.
pub async fn custom_log_handler(Path(msg): Path<String>) -> String {
    service::custom_log_echo(&msg)
}

/// Send a user message to the configured queue.
pub async fn queue_handler<F>(
    State(state): State<AppState<F>>,
    Json(message): Json<QueueMessage>,
) -> Result<String, ApiError>
where
    F: ClientFactory,
{
    service::enqueue(state.factory.as_ref(), &state.settings(), &message).await
}

// =============================================================================
// Tests
// =============================================================================
