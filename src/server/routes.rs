//! Router configuration.
//!
//! This module defines the HTTP routes and applies CORS and request tracing.
//!
//! # Route Structure
//!
//! ```text
//! /health                         - Health check
//! /api/environment/override       - Configuration query
//! /api/file/sample                - Bundled spreadsheet download
//! /api/file/link                  - Presigned S3 link
//! /api/logging/gateway            - Oversized response
//! /api/logging/console/{msg}      - Echo to stdout
//! /api/logging/custom/{msg}       - Echo to the log sink
//! /api/queue                      - Enqueue (POST)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cloud_demo::clients::AwsClientFactory;
//! use cloud_demo::server::{create_router, AppState, RouterConfig};
//!
//! let settings = loader.load()?;
//! let factory = AwsClientFactory::from_env(DeploymentMode::Aws).await;
//! let state = AppState::new(settings, factory, "assets");
//!
//! let router = create_router(state, RouterConfig::default());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    console_handler, custom_log_handler, environment_override_handler, file_link_handler,
    file_sample_handler, gateway_handler, health_handler, queue_handler, AppState,
};
use crate::clients::ClientFactory;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    /// Any CORS origin, tracing enabled.
    fn default() -> Self {
        Self {
            cors_origins: None,
            enable_tracing: true,
        }
    }
}

impl RouterConfig {
    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
pub fn create_router<F>(state: AppState<F>, config: RouterConfig) -> Router
where
    F: ClientFactory,
{
    let environment_routes =
        Router::new().route("/override", get(environment_override_handler::<F>));

    let file_routes = Router::new()
        .route("/sample", get(file_sample_handler::<F>))
        .route("/link", get(file_link_handler::<F>));

    let logging_routes = Router::new()
        .route("/gateway", get(gateway_handler))
        .route("/console/{msg}", get(console_handler))
        .route("/custom/{msg}", get(custom_log_handler));

    let api_routes = Router::new()
        .nest("/environment", environment_routes)
        .nest("/file", file_routes)
        .nest("/logging", logging_routes)
        .route("/queue", post(queue_handler::<F>));

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_routes)
        .with_state(state)
        .layer(build_cors_layer(&config));

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
