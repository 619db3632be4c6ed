use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving the layered settings view.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A settings file exists but could not be read
    #[error("Failed to read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings layer could not be parsed
    #[error("Malformed {layer} settings: {source}")]
    Malformed {
        layer: &'static str,
        #[source]
        source: config::ConfigError,
    },

    /// A setting required by the current operation is not present
    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}

/// Errors from the object storage backend
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The presigning parameters were rejected before signing
    #[error("Presigning rejected: {0}")]
    Presign(String),

    /// Error returned by S3 or the SDK while signing
    #[error("S3 error: {0}")]
    S3(String),
}

/// Errors from the message queue backend
#[derive(Debug, Clone, Error)]
pub enum QueueError {
    /// Error returned by SQS or the SDK
    #[error("SQS error: {0}")]
    Sqs(String),
}

/// Per-request failure of an API operation.
///
/// Every variant is local to the request that produced it.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    /// A bundled resource could not be read
    #[error("Failed to read resource {}: {source}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
