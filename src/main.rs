//! Cloud Demo - S3, SQS and logging behind a small HTTP API.
//!
//! This binary resolves the settings, wires the clients and starts the
//! HTTP server.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cloud_demo::{
    clients::AwsClientFactory,
    config::{CheckConfig, Cli, Command, LogFormat, ServeConfig},
    server::{create_router, AppState, RouterConfig},
    settings::{
        spawn_reloader, Settings, SettingsHandle, BUCKET_KEY, ENVIRONMENT_OVERRIDE_KEY,
        QUEUE_URL_KEY,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(config) => run_serve(config).await,
        Command::Check(config) => run_check(config),
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose, config.log_format);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let mode = match config.deployment.deployment_mode() {
        Ok(mode) => mode,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // A partially resolved view must never serve traffic
    let loader = config.settings.loader();
    let settings = match loader.load() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Settings error: {}", e);
            error!(
                "  Check the JSON files in {}",
                loader.content_root().display()
            );
            return ExitCode::FAILURE;
        }
    };

    info!("Configuration:");
    info!("  Content root: {}", loader.content_root().display());
    info!("  Environment: {}", loader.environment());
    info!("  Mode: {}", mode);
    log_named_settings(&settings);

    let handle = SettingsHandle::new(settings);

    if let Some(interval) = config.reload_interval() {
        info!("  Settings reload: every {}s", interval.as_secs());
        spawn_reloader(loader, handle.clone(), interval);
    }

    let factory = AwsClientFactory::from_env(mode).await;
    let state = AppState::new(handle, factory, config.settings.content_root.clone());

    let router = create_router(state, build_router_config(&config));

    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!("    curl http://{}/api/environment/override", addr);
    info!("    curl http://{}/api/file/link", addr);
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn log_named_settings(settings: &Settings) {
    info!("  Region: {}", settings.region());

    for key in [BUCKET_KEY, QUEUE_URL_KEY] {
        match settings.get(key) {
            Some(value) => info!("  {}: {}", key, value),
            None => warn!("  {}: not set - endpoints using it will fail", key),
        }
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool, format: LogFormat) {
    let env_filter = if verbose {
        "cloud_demo=debug,tower_http=debug"
    } else {
        "cloud_demo=info,tower_http=info"
    };

    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| env_filter.into()),
    );

    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = RouterConfig::default().with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}

// =============================================================================
// Check Command
// =============================================================================

fn run_check(config: CheckConfig) -> ExitCode {
    println!("Cloud Demo Settings Check");
    println!("═════════════════════════");
    println!();

    let mode = match config.deployment.deployment_mode() {
        Ok(mode) => {
            println!("✓ Mode: {}", mode);
            mode
        }
        Err(e) => {
            println!("✗ Mode: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let loader = config.settings.loader();
    println!("  Content root: {}", loader.content_root().display());
    println!("  Environment: {}", loader.environment());
    println!();

    println!("Layers (lowest precedence first):");
    for path in loader.layer_paths() {
        let marker = if path.exists() { "✓" } else { "-" };
        println!("  {} {}", marker, path.display());
    }
    println!("  ✓ process environment");
    println!();

    let settings = match loader.load() {
        Ok(settings) => settings,
        Err(e) => {
            println!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };

    let region = settings.region();
    let queue_endpoint = mode.queue_service_url(region);

    println!("Resolved:");
    println!("  Region: {}", region);
    println!("  Queue service: {}", queue_endpoint);
    for key in [BUCKET_KEY, QUEUE_URL_KEY, ENVIRONMENT_OVERRIDE_KEY] {
        println!("  {}: {}", key, settings.get(key).unwrap_or("(not set)"));
    }

    if config.all {
        println!();
        println!("All settings:");
        for (key, value) in settings.iter() {
            println!("  {} = {}", key, value);
        }
    }

    println!();
    println!("═════════════════════════");
    println!("✓ Settings resolved");

    ExitCode::SUCCESS
}
