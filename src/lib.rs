//! # Cloud Demo
//!
//! A small HTTP service demonstrating cloud integrations: presigned S3
//! links, SQS messages, console and structured logging, and configuration
//! lookups.
//!
//! ## Features
//!
//! - **Layered settings**: base, environment-specific and private JSON files
//!   plus environment variables, merged last-writer-wins per key
//! - **Per-request clients**: storage and queue handles built fresh for every
//!   request from the current region and deployment mode
//! - **Hot reload**: optional polling of the settings files with atomic
//!   snapshot replacement
//! - **Local mode**: point both clients at an emulator endpoint
//!
//! ## Architecture
//!
//! - [`settings`] - Layered settings resolution and reload
//! - [`clients`] - Client factory for S3 and SQS handles
//! - [`service`] - Framework-independent endpoint operations
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and process configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use cloud_demo::{create_router, AppState, AwsClientFactory, DeploymentMode, RouterConfig, SettingsLoader};
//!
//! #[tokio::main]
//! async fn main() {
//!     let settings = SettingsLoader::new("assets", "development")
//!         .load()
//!         .expect("settings must resolve before serving");
//!     let factory = AwsClientFactory::from_env(DeploymentMode::Aws).await;
//!
//!     let router = create_router(
//!         AppState::new(settings, factory, "assets"),
//!         RouterConfig::default(),
//!     );
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod clients;
pub mod config;
pub mod error;
pub mod server;
pub mod service;
pub mod settings;

// Re-export commonly used types
pub use clients::{
    queue_service_url, AwsClientFactory, ClientFactory, DeploymentMode, LinkRequest, MessageQueue,
    ObjectLinker, SignatureVersion, LINK_EXPIRY,
};
pub use config::{CheckConfig, Cli, Command, LogFormat, ServeConfig};
pub use error::{ApiError, QueueError, SettingsError, StorageError};
pub use server::{create_router, AppState, ErrorResponse, RouterConfig};
pub use service::{FilePayload, QueueMessage};
pub use settings::{resolve, Settings, SettingsHandle, SettingsLoader};
