//! # ClaimDesk Runtime
//!
//! Wires the claims, accounts and gateway subsystems to their production
//! adapters and runs the HTTP server.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration loading and service wiring
//! - `adapters/` - Filesystem blob store, signed download route, HTTP mail
//!   notifier, JSON snapshot record stores
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Validate it (production also rejects development secrets)
//! 3. Build adapters and services
//! 4. Provision the admin account (if configured)
//! 5. Serve until the shutdown signal, then drain requests and notifications

pub mod adapters;
pub mod container;

pub use container::{
    ConfigError, ContainerError, Environment, RuntimeConfig, ServiceContainer,
};

use anyhow::{Context, Result};
use std::future::Future;
use tracing::info;

/// A configured ClaimDesk instance.
pub struct ClaimDeskRuntime {
    container: ServiceContainer,
}

impl ClaimDeskRuntime {
    /// Validate `config` and build every service.
    pub async fn new(config: RuntimeConfig) -> Result<Self> {
        config
            .validate_for_environment()
            .context("Configuration rejected")?;
        let container = ServiceContainer::build(config)
            .await
            .context("Failed to initialize services")?;
        Ok(Self { container })
    }

    pub fn container(&self) -> &ServiceContainer {
        &self.container
    }

    /// Bootstrap the admin account, then serve until `shutdown` completes.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!(
            environment = ?self.container.config.environment,
            data_dir = %self.container.config.storage.data_dir.display(),
            "Starting ClaimDesk"
        );

        self.container
            .bootstrap_admin()
            .await
            .context("Admin account bootstrap failed")?;

        let gateway = self
            .container
            .gateway()
            .context("Failed to assemble HTTP gateway")?;
        let listener = gateway.bind().await.context("Failed to bind HTTP listener")?;
        gateway
            .serve(listener, shutdown)
            .await
            .context("HTTP server failed")?;

        self.container.shutdown().await;
        info!("ClaimDesk stopped");
        Ok(())
    }
}
