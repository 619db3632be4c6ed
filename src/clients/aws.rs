use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::presigning::PresigningConfig;
use tracing::debug;

use super::{ClientFactory, DeploymentMode, LinkRequest, MessageQueue, ObjectLinker, SignatureVersion};
use crate::error::{QueueError, StorageError};

/// Load the shared SDK configuration (credential chain, retry defaults).
///
/// In local mode the emulator endpoint is applied to every service.
pub async fn load_sdk_config(mode: &DeploymentMode) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(endpoint) = mode.endpoint_url() {
        loader = loader.endpoint_url(endpoint);
    }

    loader.load().await
}

/// AWS SDK-backed [`ClientFactory`].
///
/// Holds only immutable state, so a single instance is shared by all
/// requests.
#[derive(Debug, Clone)]
pub struct AwsClientFactory {
    sdk_config: SdkConfig,
    mode: DeploymentMode,
}

impl AwsClientFactory {
    /// Create a factory from a loaded SDK configuration.
    pub fn new(sdk_config: SdkConfig, mode: DeploymentMode) -> Self {
        Self { sdk_config, mode }
    }

    /// Load the SDK configuration for `mode` and create a factory from it.
    pub async fn from_env(mode: DeploymentMode) -> Self {
        let sdk_config = load_sdk_config(&mode).await;
        Self::new(sdk_config, mode)
    }

    /// The deployment mode handles are built for.
    pub fn mode(&self) -> &DeploymentMode {
        &self.mode
    }
}

impl ClientFactory for AwsClientFactory {
    type Storage = S3Storage;
    type Queue = SqsQueue;

    fn storage_client(&self, region: &str, signature: SignatureVersion) -> S3Storage {
        let mut builder = aws_sdk_s3::config::Builder::from(&self.sdk_config)
            .region(Region::new(region.to_string()));

        // Emulators rarely support virtual-hosted bucket addressing
        if let Some(endpoint) = self.mode.endpoint_url() {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        S3Storage {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            signature,
        }
    }

    fn queue_client(&self, region: &str, service_url: &str) -> SqsQueue {
        let config = aws_sdk_sqs::config::Builder::from(&self.sdk_config)
            .region(Region::new(region.to_string()))
            .endpoint_url(service_url)
            .build();

        SqsQueue {
            client: aws_sdk_sqs::Client::from_conf(config),
            service_url: service_url.to_string(),
        }
    }

    fn queue_service_url(&self, region: &str) -> String {
        self.mode.queue_service_url(region)
    }
}

// =============================================================================
// S3
// =============================================================================

/// Per-request S3 handle.
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    signature: SignatureVersion,
}

impl S3Storage {
    /// Signing scheme of this handle.
    pub fn signature_version(&self) -> SignatureVersion {
        self.signature
    }
}

#[async_trait]
impl ObjectLinker for S3Storage {
    async fn presign_get(&self, request: &LinkRequest) -> Result<String, StorageError> {
        let presigning = PresigningConfig::builder()
            .start_time(request.issued_at)
            .expires_in(request.expires_in)
            .build()
            .map_err(|e| StorageError::Presign(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::S3(aws_sdk_s3::error::DisplayErrorContext(&e).to_string()))?;

        debug!(
            bucket = %request.bucket,
            key = %request.key,
            signature = %self.signature,
            "Presigned object link"
        );

        Ok(presigned.uri().to_string())
    }
}

// =============================================================================
// SQS
// =============================================================================

/// Per-request SQS handle.
#[derive(Debug, Clone)]
pub struct SqsQueue {
    client: aws_sdk_sqs::Client,
    service_url: String,
}

impl SqsQueue {
    /// Service endpoint this handle talks to.
    pub fn service_url(&self) -> &str {
        &self.service_url
    }
}

#[async_trait]
impl MessageQueue for SqsQueue {
    async fn send_message(&self, queue_url: &str, body: &str) -> Result<(), QueueError> {
        let output = self
            .client
            .send_message()
            .queue_url(queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| QueueError::Sqs(aws_sdk_sqs::error::DisplayErrorContext(&e).to_string()))?;

        debug!(
            queue_url = %queue_url,
            message_id = output.message_id().unwrap_or_default(),
            "Message sent"
        );

        Ok(())
    }
}
