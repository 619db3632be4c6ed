//! Client factory for the external storage and queue services.
//!
//! Handlers never hold long-lived clients. For every request they ask a
//! [`ClientFactory`] for fresh handles built from the current region and the
//! deployment mode:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     ClientFactory                        │
//! │        (SDK config + deployment mode, immutable)         │
//! └──────────────┬────────────────────────────┬──────────────┘
//!                │ storage_client(region, v4) │ queue_client(region, url)
//!                ▼                            ▼
//!       ┌─────────────────┐          ┌─────────────────┐
//!       │  ObjectLinker   │          │  MessageQueue   │
//!       │  (S3 presign)   │          │  (SQS send)     │
//!       └─────────────────┘          └─────────────────┘
//! ```
//!
//! Building a handle performs no network I/O; the first call happens when
//! the handle is used.

mod aws;

use std::fmt;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;

use crate::error::{QueueError, StorageError};

pub use aws::{load_sdk_config, AwsClientFactory, S3Storage, SqsQueue};

/// Lifetime of every presigned link handed out by the service.
pub const LINK_EXPIRY: Duration = Duration::from_secs(60);

// =============================================================================
// Deployment Mode
// =============================================================================

/// Where the external services live.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeploymentMode {
    /// Real AWS endpoints, queue service URL derived from the region.
    #[default]
    Aws,

    /// An emulator (LocalStack, MinIO + ElasticMQ, ...) serving both APIs at
    /// one endpoint. S3 uses path-style addressing.
    Local { endpoint_url: String },
}

impl DeploymentMode {
    /// Custom endpoint, if the mode has one.
    pub fn endpoint_url(&self) -> Option<&str> {
        match self {
            DeploymentMode::Aws => None,
            DeploymentMode::Local { endpoint_url } => Some(endpoint_url),
        }
    }

    /// SQS service URL for `region`: derived from the region on AWS, the
    /// emulator endpoint in local mode.
    pub fn queue_service_url(&self, region: &str) -> String {
        match self {
            DeploymentMode::Aws => queue_service_url(region),
            DeploymentMode::Local { endpoint_url } => endpoint_url.clone(),
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentMode::Aws => write!(f, "aws"),
            DeploymentMode::Local { endpoint_url } => write!(f, "local ({})", endpoint_url),
        }
    }
}

/// Signing scheme for storage handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureVersion {
    /// AWS Signature Version 4
    #[default]
    V4,
}

impl fmt::Display for SignatureVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureVersion::V4 => write!(f, "v4"),
        }
    }
}

/// SQS service URL for a region.
///
/// Spelled out explicitly instead of relying on endpoint discovery.
pub fn queue_service_url(region: &str) -> String {
    format!("http://sqs.{}.amazonaws.com", region)
}

// =============================================================================
// Presigned Link Request
// =============================================================================

/// Parameters of one presigned download link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    pub bucket: String,
    pub key: String,
    pub issued_at: SystemTime,
    pub expires_in: Duration,
}

impl LinkRequest {
    /// A link for `bucket`/`key`, issued at `issued_at`, valid for [`LINK_EXPIRY`].
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, issued_at: SystemTime) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            issued_at,
            expires_in: LINK_EXPIRY,
        }
    }

    /// Instant the link stops working.
    pub fn expires_at(&self) -> SystemTime {
        self.issued_at + self.expires_in
    }
}

// =============================================================================
// Handle Traits
// =============================================================================

/// Storage handle able to mint presigned GET links.
#[async_trait]
pub trait ObjectLinker: Send + Sync {
    /// Produce a URL granting temporary read access to one object.
    ///
    /// The object is not required to exist.
    async fn presign_get(&self, request: &LinkRequest) -> Result<String, StorageError>;
}

/// Queue handle able to send one message.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Send `body` as the whole body of one message to `queue_url`.
    async fn send_message(&self, queue_url: &str, body: &str) -> Result<(), QueueError>;
}

/// Builds per-request handles to the external services.
pub trait ClientFactory: Send + Sync + 'static {
    type Storage: ObjectLinker;
    type Queue: MessageQueue;

    /// A fresh storage handle for `region`.
    fn storage_client(&self, region: &str, signature: SignatureVersion) -> Self::Storage;

    /// A fresh queue handle for `region`, talking to `service_url`.
    fn queue_client(&self, region: &str, service_url: &str) -> Self::Queue;

    /// Queue service URL to pass to [`ClientFactory::queue_client`].
    fn queue_service_url(&self, region: &str) -> String {
        queue_service_url(region)
    }
}
