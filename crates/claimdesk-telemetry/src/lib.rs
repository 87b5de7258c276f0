//! # ClaimDesk Telemetry
//!
//! Structured logging for ClaimDesk services via `tracing-subscriber`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use claimdesk_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CD_SERVICE_NAME` | `claimdesk` | Service name on the startup event |
//! | `CD_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `CD_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `CD_JSON_LOGS` | `false` (`true` in containers) | JSON lines output |

mod config;
mod subscriber;

pub use config::{TelemetryConfig, DEFAULT_LOG_LEVEL, DEFAULT_SERVICE_NAME};
pub use subscriber::build_filter;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set. Hold the returned guard for
/// the lifetime of the process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    subscriber::install(&config)?;
    tracing::info!(
        service = %config.service_name,
        version = env!("CARGO_PKG_VERSION"),
        json_logs = config.json_logs,
        "Telemetry initialized"
    );
    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active; logs a final event on drop.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}
