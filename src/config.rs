//! Process configuration for the Cloud Demo service.
//!
//! Command-line arguments via clap, each with an environment variable
//! fallback using the `CLOUD_DEMO_` prefix. These control how the process
//! runs; the application settings the endpoints read (bucket, queue URL,
//! region, override) come from the layered [`settings`](crate::settings).
//!
//! # Environment Variables
//!
//! - `CLOUD_DEMO_HOST` - Server bind address (default: 0.0.0.0)
//! - `CLOUD_DEMO_PORT` - Server port (default: 5000)
//! - `CLOUD_DEMO_CONTENT_ROOT` - Directory with settings files and bundled resources (default: assets)
//! - `CLOUD_DEMO_ENVIRONMENT` - Environment-specific settings layer (default: production)
//! - `CLOUD_DEMO_MODE` - `aws` or `local` (default: aws)
//! - `CLOUD_DEMO_ENDPOINT_URL` - Emulator endpoint, required in local mode
//! - `CLOUD_DEMO_CORS_ORIGINS` - Allowed CORS origins, comma-separated
//! - `CLOUD_DEMO_RELOAD_INTERVAL` - Settings reload poll interval in seconds
//! - `CLOUD_DEMO_LOG_FORMAT` - `text` or `json` (default: text)

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::clients::DeploymentMode;
use crate::settings::SettingsLoader;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default directory holding settings files and the bundled sample file.
pub const DEFAULT_CONTENT_ROOT: &str = "assets";

/// Default settings environment.
pub const DEFAULT_ENVIRONMENT: &str = "production";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Cloud Demo - S3, SQS and logging behind a small HTTP API.
#[derive(Parser, Debug)]
#[command(name = "cloud-demo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeConfig),

    /// Resolve the settings and print what the server would use
    Check(CheckConfig),
}

/// Where the settings layers are read from.
#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Directory holding the settings files and bundled resources.
    #[arg(long, default_value = DEFAULT_CONTENT_ROOT, env = "CLOUD_DEMO_CONTENT_ROOT")]
    pub content_root: PathBuf,

    /// Name of the environment-specific settings layer
    /// (`settings.<environment>.json`).
    #[arg(long, default_value = DEFAULT_ENVIRONMENT, env = "CLOUD_DEMO_ENVIRONMENT")]
    pub environment: String,
}

impl SettingsArgs {
    /// Loader for the configured content root and environment.
    pub fn loader(&self) -> SettingsLoader {
        SettingsLoader::new(self.content_root.clone(), self.environment.clone())
    }
}

/// Deployment mode selector.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeArg {
    /// Real AWS endpoints
    #[default]
    Aws,
    /// A local emulator at --endpoint-url
    Local,
}

/// Which external services the clients talk to.
#[derive(Args, Debug, Clone)]
pub struct DeploymentArgs {
    /// Deployment mode.
    #[arg(long, value_enum, default_value_t = ModeArg::Aws, env = "CLOUD_DEMO_MODE")]
    pub mode: ModeArg,

    /// Emulator endpoint serving both S3 and SQS (local mode only).
    #[arg(long, env = "CLOUD_DEMO_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,
}

impl DeploymentArgs {
    /// Validate the arguments and build the deployment mode.
    pub fn deployment_mode(&self) -> Result<DeploymentMode, String> {
        match (self.mode, &self.endpoint_url) {
            (ModeArg::Aws, None) => Ok(DeploymentMode::Aws),
            (ModeArg::Aws, Some(_)) => Err(
                "--endpoint-url is only used in local mode. Add --mode=local or remove it"
                    .to_string(),
            ),
            (ModeArg::Local, None) => Err(
                "Local mode requires an emulator endpoint. Set --endpoint-url or CLOUD_DEMO_ENDPOINT_URL"
                    .to_string(),
            ),
            (ModeArg::Local, Some(endpoint)) => {
                url::Url::parse(endpoint)
                    .map_err(|e| format!("Invalid endpoint URL '{}': {}", endpoint, e))?;
                Ok(DeploymentMode::Local {
                    endpoint_url: endpoint.clone(),
                })
            }
        }
    }
}

/// Log output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Arguments of the `serve` command.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "CLOUD_DEMO_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "CLOUD_DEMO_PORT")]
    pub port: u16,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(flatten)]
    pub deployment: DeploymentArgs,

    /// Poll the settings files every N seconds and apply changes.
    ///
    /// Disabled when not set.
    #[arg(long, env = "CLOUD_DEMO_RELOAD_INTERVAL")]
    pub reload_interval: Option<u64>,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "CLOUD_DEMO_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, env = "CLOUD_DEMO_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Host must not be empty. Set --host or CLOUD_DEMO_HOST".to_string());
        }

        if self.reload_interval == Some(0) {
            return Err("reload_interval must be greater than 0".to_string());
        }

        self.deployment.deployment_mode()?;

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings reload interval, if hot reload is enabled.
    pub fn reload_interval(&self) -> Option<Duration> {
        self.reload_interval.map(Duration::from_secs)
    }
}

/// Arguments of the `check` command.
#[derive(Args, Debug, Clone)]
pub struct CheckConfig {
    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(flatten)]
    pub deployment: DeploymentArgs,

    /// Print every resolved setting, not only the named keys.
    #[arg(long, default_value_t = false)]
    pub all: bool,
}

// =============================================================================
// Tests
// =============================================================================
