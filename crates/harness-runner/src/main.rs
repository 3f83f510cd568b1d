//! Chat harness entry point
//!
//! Run with:
//! ```bash
//! CHAT_API_URL=https://chat.example.com \
//! CHAT_WS_URL='wss://chat.example.com/socket.io/?EIO=4&transport=websocket' \
//! cargo run -p harness-runner
//! ```
//!
//! Configuration is loaded from environment variables. The process exits
//! with status 1 if any case failed.

use harness_client::ChatScenarios;
use harness_common::{try_init_tracing_with_config, HarnessConfig, TracingConfig};
use harness_runner::{RunReport, TestRunner};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = HarnessConfig::from_env();

    // Initialize tracing
    let tracing_config = config
        .as_ref()
        .map_or_else(|_| TracingConfig::default(), |c| TracingConfig::for_environment(c.env));
    if let Err(e) = try_init_tracing_with_config(&tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(2);
        }
    };

    match run(config).await {
        Ok(report) if report.is_success() => {}
        Ok(_) => std::process::exit(1),
        Err(e) => {
            error!(error = %e, "An error occurred during the test suite execution");
            std::process::exit(1);
        }
    }
}

async fn run(config: HarnessConfig) -> anyhow::Result<RunReport> {
    info!(
        env = ?config.env,
        api = %config.endpoints.api_base,
        ws = %config.endpoints.ws_url,
        identities = config.identities.len(),
        "Configuration loaded"
    );

    let scenarios = ChatScenarios::new(&config)?;
    let report = TestRunner::new(&scenarios, &config.identities).run().await;

    Ok(report)
}
