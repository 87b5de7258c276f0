//! # Service Container
//!
//! Builds the production adapters and the two application services, and
//! owns the notification worker for the lifetime of the process.
//!
//! ## Initialization Order
//!
//! ```text
//! 1. Blob store      (creates <data_dir>/blobs)
//! 2. Record stores   (loads claims.json, accounts.json)
//! 3. Notifier        (HTTP mail when an API key is set, log-only otherwise)
//! 4. Dispatcher      (bounded queue + background worker)
//! 5. ClaimService, AccountService
//! ```
//!
//! ## Shutdown
//!
//! The worker stops once every dispatcher handle is gone, so `shutdown`
//! drops the services first and then waits for the queue to drain.

use std::sync::Arc;
use std::time::Duration;

use cd_01_claims::{
    BlobStoreError, ClaimService, IntakeConfig, LogNotifier, NotificationDispatcher, Notifier,
    RepositoryError,
};
use cd_02_accounts::{
    ensure_admin_account, AccountRepositoryError, AccountService, AuthError, BootstrapOutcome,
    NewAccount, PasswordHasher, TokenIssuer,
};
use cd_03_api_gateway::{ApiGatewayService, AppState, GatewayError};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::adapters::{
    files_router, FsBlobStore, HttpMailNotifier, MailSetupError, MailTemplates,
    SnapshotAccountRepository, SnapshotClaimRepository, UrlSigner,
};
use crate::container::config::RuntimeConfig;

/// Capacity of the notification queue.
pub const NOTIFICATION_QUEUE_CAPACITY: usize = 256;

/// Longest wait for queued notifications at shutdown.
pub const NOTIFICATION_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Failures while assembling the services.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Blob store setup failed: {0}")]
    Blobs(#[from] BlobStoreError),

    #[error("Claim store setup failed: {0}")]
    Claims(#[from] RepositoryError),

    #[error("Account store setup failed: {0}")]
    AccountStore(#[from] AccountRepositoryError),

    #[error("Account service setup failed: {0}")]
    Accounts(#[from] AuthError),

    #[error("Mail client setup failed: {0}")]
    Mail(#[from] MailSetupError),

    #[error("Invalid URL-signing secret: {0}")]
    Signing(String),
}

/// All long-lived services of a running ClaimDesk instance.
pub struct ServiceContainer {
    pub config: RuntimeConfig,
    pub claims: Arc<ClaimService>,
    pub accounts: Arc<AccountService>,
    pub blobs: Arc<FsBlobStore>,
    notification_worker: JoinHandle<()>,
}

impl ServiceContainer {
    /// Build with the notifier the mail configuration calls for.
    pub async fn build(config: RuntimeConfig) -> Result<Self, ContainerError> {
        let notifier: Arc<dyn Notifier> = match config.mail.api_key.as_deref() {
            Some(api_key) => {
                info!(endpoint = %config.mail.api_url, "Email delivery enabled");
                Arc::new(HttpMailNotifier::new(
                    config.mail.api_url.clone(),
                    api_key,
                    config.mail.from.clone(),
                    MailTemplates::new(config.mail.tracking_page_url.clone()),
                )?)
            }
            None => {
                warn!("No mail API key configured; notifications are only logged");
                Arc::new(LogNotifier)
            }
        };
        Self::build_with_notifier(config, notifier).await
    }

    /// Build with an explicit notifier.
    pub async fn build_with_notifier(
        config: RuntimeConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ContainerError> {
        let data_dir = config.storage.data_dir.clone();
        info!(data_dir = %data_dir.display(), "Initializing storage");

        let signer = UrlSigner::new(config.storage.url_signing_secret.as_bytes())
            .map_err(|e| ContainerError::Signing(e.to_string()))?;
        let blobs = Arc::new(
            FsBlobStore::open(&data_dir, &config.storage.public_base_url, signer).await?,
        );
        let claim_store = Arc::new(SnapshotClaimRepository::open(&data_dir).await?);
        let account_store = Arc::new(SnapshotAccountRepository::open(&data_dir).await?);

        let (dispatcher, notification_worker) =
            NotificationDispatcher::spawn(notifier, NOTIFICATION_QUEUE_CAPACITY);

        let claims = Arc::new(ClaimService::new(
            claim_store,
            blobs.clone(),
            dispatcher,
            IntakeConfig {
                operations_email: config.mail.operations_email.clone(),
                download_url_ttl: config.storage.signed_url_ttl,
                ..IntakeConfig::default()
            },
        ));

        let accounts = Arc::new(AccountService::new(
            account_store,
            PasswordHasher::new(config.security.password_iterations),
            TokenIssuer::new(
                config.security.token_secret.as_bytes().to_vec(),
                chrono::Duration::seconds(config.security.token_ttl_secs),
            ),
        )?);

        info!("Services initialized");
        Ok(Self {
            config,
            claims,
            accounts,
            blobs,
            notification_worker,
        })
    }

    /// Provision the configured admin account. `None` when bootstrap is off.
    pub async fn bootstrap_admin(&self) -> Result<Option<BootstrapOutcome>, AuthError> {
        let bootstrap = &self.config.bootstrap;
        let (Some(email), Some(password)) = (&bootstrap.admin_email, &bootstrap.admin_password)
        else {
            info!("Admin bootstrap not configured");
            return Ok(None);
        };
        let outcome = ensure_admin_account(
            &self.accounts,
            NewAccount {
                email: email.clone(),
                password: password.clone(),
                display_name: bootstrap.admin_name.clone(),
            },
        )
        .await?;
        Ok(Some(outcome))
    }

    /// Assemble the HTTP gateway over these services, `/files` included.
    pub fn gateway(&self) -> Result<ApiGatewayService, GatewayError> {
        let state = AppState::new(self.claims.clone(), self.accounts.clone());
        ApiGatewayService::new(
            self.config.gateway.clone(),
            state,
            files_router(self.blobs.clone()),
        )
    }

    /// Release the services and wait for queued notifications to go out.
    pub async fn shutdown(self) {
        let Self {
            claims,
            accounts,
            blobs,
            notification_worker,
            ..
        } = self;
        drop(claims);
        drop(accounts);
        drop(blobs);

        match tokio::time::timeout(NOTIFICATION_DRAIN_TIMEOUT, notification_worker).await {
            Ok(Ok(())) => info!("Notification worker drained"),
            Ok(Err(e)) => warn!(error = %e, "Notification worker ended abnormally"),
            Err(_) => warn!(
                timeout_secs = NOTIFICATION_DRAIN_TIMEOUT.as_secs(),
                "Notification worker still busy at shutdown; pending messages dropped"
            ),
        }
    }
}
