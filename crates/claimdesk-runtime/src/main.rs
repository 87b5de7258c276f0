//! # ClaimDesk
//!
//! Case-intake backend for a legal-claims studio.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (`CD_LOG_LEVEL`, `CD_JSON_LOGS`)
//! 2. Load configuration from `CD_*` environment variables
//! 3. Validate it; production refuses development secrets
//! 4. Build adapters and services, provision the admin account
//! 5. Serve HTTP until Ctrl-C, then drain requests and queued notifications

use anyhow::{Context, Result};
use claimdesk_runtime::{ClaimDeskRuntime, RuntimeConfig};
use claimdesk_telemetry::{init_telemetry, TelemetryConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::from_env())
        .context("Failed to initialize telemetry")?;

    let config = RuntimeConfig::from_env().context("Failed to load configuration")?;
    let runtime = match ClaimDeskRuntime::new(config).await {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Startup aborted");
            return Err(e);
        }
    };

    runtime.run(shutdown_signal()).await?;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Failed to listen for shutdown signal; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
