//! Dimension Tracker - Main Entry Point

use api::{init_logging, run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_logging(config.server.log_format).map_err(|e| anyhow::anyhow!(e))?;

    info!("=== Dimension Tracker v{} ===", env!("CARGO_PKG_VERSION"));
    info!(store = ?config.server.store, "Loaded configuration");

    run_server(config).await
}
