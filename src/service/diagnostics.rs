//! Diagnostic endpoints: oversized response and log echoes.
//!
//! None of these can fail.

use tracing::error;

/// Size of the oversized response: 8 MiB, well above the payload limit of
/// typical API gateways.
pub const GATEWAY_PAYLOAD_LEN: usize = 1024 * 1024 * 8;

/// Build the oversized response body.
pub fn gateway_payload() -> String {
    "A".repeat(GATEWAY_PAYLOAD_LEN)
}

/// Write `msg` to standard output and confirm it.
pub fn console_echo(msg: &str) -> String {
    println!("CONSOLE: {}", msg);
    console_confirmation(msg)
}

/// Response text for a console echo of `msg`.
pub fn console_confirmation(msg: &str) -> String {
    format!("Message logged to console: {}", msg)
}

/// Send `msg` to the structured log sink at the highest severity and
/// confirm it. Delivery is up to the sink.
pub fn custom_log_echo(msg: &str) -> String {
    error!(target: "cloud_demo::custom", "LOGGER: {}", msg);
    custom_log_confirmation(msg)
}

/// Response text for a structured log echo of `msg`.
pub fn custom_log_confirmation(msg: &str) -> String {
    format!("Message logged to cloudwatch: {}", msg)
}
