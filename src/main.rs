//! Copilot agent service.
//!
//! Main entry point for the webhook agent. Initializes tracing and
//! configuration, wires the GitHub identity client into the HTTP server,
//! and serves until a shutdown signal arrives.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use copilot_api::{start_server, AppState, Config};
use copilot_core::RealClock;
use copilot_github::GithubClient;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with structured logging
    init_tracing();

    info!("Starting copilot agent service");

    // Load configuration from defaults, config.toml, and environment
    let config = Config::load()?;
    info!(
        host = %config.host,
        port = config.port,
        product = %config.product_name,
        github_api_url = %config.github_api_url,
        webhook_secret_configured = config.webhook_secret.is_some(),
        "Configuration loaded"
    );

    let addr = config.parse_server_addr()?;

    let github = GithubClient::new(config.client_config())
        .context("Failed to build GitHub identity client")?;

    let state =
        AppState::new(config.webhook_config(), Arc::new(github), Arc::new(RealClock::new()));

    info!(addr = %addr, "Copilot agent is ready to receive invocations");

    start_server(state, addr, Duration::from_secs(config.request_timeout)).await?;

    info!("Copilot agent shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            EnvFilter::try_new("info,copilot_api=debug,copilot_github=debug,tower_http=debug")
        })
        .expect("Invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
