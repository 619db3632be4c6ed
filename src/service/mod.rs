//! Framework-independent operations behind the HTTP endpoints.
//!
//! Every function here takes the resolved settings (and, where needed, a
//! [`ClientFactory`](crate::clients::ClientFactory)) plus the request payload,
//! performs at most one external call or local read, and returns the response
//! body. The axum handlers in [`crate::server`] are thin adapters over them.

pub mod diagnostics;
pub mod queue;
pub mod storage;

use crate::settings::Settings;

pub use diagnostics::{
    console_confirmation, console_echo, custom_log_confirmation, custom_log_echo,
    gateway_payload, GATEWAY_PAYLOAD_LEN,
};
pub use queue::{enqueue, enqueue_confirmation, QueueMessage};
pub use storage::{
    presigned_link, read_sample_file, FilePayload, LINKED_OBJECT_KEY, SAMPLE_CONTENT_TYPE,
    SAMPLE_FILE_NAME,
};

/// Current value of the environment override setting.
pub fn environment_override(settings: &Settings) -> Option<String> {
    settings.environment_override().map(str::to_string)
}
