//! Enqueueing user messages.

use serde::{Deserialize, Serialize};

use crate::clients::{ClientFactory, MessageQueue};
use crate::error::ApiError;
use crate::settings::Settings;

/// Message submitted by a user.
///
/// Field names are also accepted capitalized (`User`, `Message`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueMessage {
    #[serde(alias = "User")]
    pub user: String,

    #[serde(alias = "Message")]
    pub message: String,
}

/// Confirmation text returned once a message is queued.
pub fn enqueue_confirmation(message: &QueueMessage) -> String {
    format!(
        "Message '{}' from user {} queued.",
        message.message, message.user
    )
}

/// Send the message text as the body of one message to the configured queue.
///
/// Only `message` is sent; `user` is echoed back in the confirmation.
pub async fn enqueue<F>(
    factory: &F,
    settings: &Settings,
    message: &QueueMessage,
) -> Result<String, ApiError>
where
    F: ClientFactory + ?Sized,
{
    let queue_url = settings.queue_url()?;
    let region = settings.region();

    let service_url = factory.queue_service_url(region);
    let queue = factory.queue_client(region, &service_url);

    queue.send_message(queue_url, &message.message).await?;

    Ok(enqueue_confirmation(message))
}
