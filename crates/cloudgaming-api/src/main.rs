//! Cloud gaming API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p cloudgaming-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env` if present).

use cloudgaming_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    // Pick log format from the environment even when the rest of the config is bad
    let tracing_config = config
        .as_ref()
        .map_or_else(|_| TracingConfig::default(), |c| TracingConfig::for_environment(c.app.env));
    if let Err(e) = try_init_tracing_with_config(tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    info!(
        name = %config.app.name,
        env = ?config.app.env,
        port = config.api.port,
        "Configuration loaded"
    );

    if let Err(e) = cloudgaming_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
