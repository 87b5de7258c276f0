//! # Service Layer
//!
//! `ClaimService` implements `ClaimIntakeApi` (see `intake.rs`) and
//! `ClaimLifecycleApi` (see `lifecycle.rs`) over the outbound ports.

mod intake;
mod lifecycle;

#[cfg(test)]
mod tests;

use crate::adapters::{RandomTrackingCodeSource, SystemTimeSource};
use crate::dispatch::NotificationDispatcher;
use crate::ports::outbound::{BlobStore, ClaimRepository, TimeSource, TrackingCodeSource};
use std::sync::Arc;
use std::time::Duration;

/// Signed download URLs stay valid for one hour.
pub const DEFAULT_DOWNLOAD_URL_TTL: Duration = Duration::from_secs(3600);

/// Attempts at inserting a claim before a tracking-code collision becomes fatal.
pub const DEFAULT_MAX_CODE_ATTEMPTS: u32 = 5;

/// Intake and lifecycle settings.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Recipient of new-claim alerts.
    pub operations_email: String,
    pub download_url_ttl: Duration,
    pub max_code_attempts: u32,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            operations_email: "operations@claimdesk.local".to_string(),
            download_url_ttl: DEFAULT_DOWNLOAD_URL_TTL,
            max_code_attempts: DEFAULT_MAX_CODE_ATTEMPTS,
        }
    }
}

/// Claims application service.
pub struct ClaimService {
    repository: Arc<dyn ClaimRepository>,
    blobs: Arc<dyn BlobStore>,
    notifications: NotificationDispatcher,
    clock: Arc<dyn TimeSource>,
    codes: Arc<dyn TrackingCodeSource>,
    config: IntakeConfig,
}

impl ClaimService {
    pub fn new(
        repository: Arc<dyn ClaimRepository>,
        blobs: Arc<dyn BlobStore>,
        notifications: NotificationDispatcher,
        config: IntakeConfig,
    ) -> Self {
        Self {
            repository,
            blobs,
            notifications,
            clock: Arc::new(SystemTimeSource),
            codes: Arc::new(RandomTrackingCodeSource),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_code_source(mut self, codes: Arc<dyn TrackingCodeSource>) -> Self {
        self.codes = codes;
        self
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }
}
