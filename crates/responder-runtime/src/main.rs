//! Stello responder binary.

use anyhow::{Context, Result};
use responder_runtime::{build_gateway, RuntimeConfig};
use responder_telemetry::init_telemetry;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env().context("invalid responder configuration")?;
    let _telemetry =
        init_telemetry(&config.telemetry).context("failed to initialize telemetry")?;

    if config.ingest.is_development() {
        warn!("Development mode: origin checks off, notifications not delivered");
    }
    info!(
        hosted = config.ingest.deployment.is_hosted(),
        storage = %config.storage_dir.display(),
        "Configuration loaded"
    );

    let gateway = build_gateway(&config).context("failed to assemble responder")?;
    gateway
        .serve(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
            info!("Shutdown requested");
        })
        .await
        .context("responder server failed")?;

    Ok(())
}
