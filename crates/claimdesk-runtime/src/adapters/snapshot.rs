//! # JSON Snapshot Stores
//!
//! Durable claim and account stores: the in-memory stores hold the working
//! set, and every mutation writes the whole set to `<data_dir>/claims.json`
//! or `<data_dir>/accounts.json` before it becomes visible.
//!
//! ## Guarantees
//!
//! - Snapshots are written atomically (temp file + rename).
//! - A mutation is applied to a staged copy, the copy is written, and only
//!   then does it replace the live set. A failed write leaves the live set
//!   untouched.
//! - Mutations are serialized by a writer lock, so snapshots land on disk in
//!   mutation order.
//! - A missing file is an empty store; a corrupt file fails startup.

use async_trait::async_trait;
use cd_01_claims::{
    Claim, ClaimId, ClaimRepository, ClaimStatus, InMemoryClaimRepository, RepositoryError,
    TrackingCode,
};
use cd_02_accounts::{
    Account, AccountId, AccountRepository, AccountRepositoryError, InMemoryAccountRepository,
};
use serde::{de::DeserializeOwned, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info};

pub const CLAIMS_FILE: &str = "claims.json";
pub const ACCOUNTS_FILE: &str = "accounts.json";

/// Failure reading or writing a snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot I/O error: {0}")]
    Io(String),

    #[error("Snapshot encoding error: {0}")]
    Serialization(String),
}

impl From<SnapshotError> for RepositoryError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::Io(msg) => RepositoryError::Io(msg),
            SnapshotError::Serialization(msg) => RepositoryError::Serialization(msg),
        }
    }
}

impl From<SnapshotError> for AccountRepositoryError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::Io(msg) => AccountRepositoryError::Io(msg),
            SnapshotError::Serialization(msg) => AccountRepositoryError::Serialization(msg),
        }
    }
}

/// One JSON file holding a list of records.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load<T: DeserializeOwned>(&self) -> Result<Vec<T>, SnapshotError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                SnapshotError::Serialization(format!("{}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(SnapshotError::Io(format!("{}: {e}", self.path.display()))),
        }
    }

    pub async fn save<T: Serialize>(&self, records: &[T]) -> Result<(), SnapshotError> {
        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|e| SnapshotError::Serialization(e.to_string()))?;
        let temp = self.path.with_extension("json.tmp");
        let io = |e: std::io::Error| SnapshotError::Io(format!("{}: {e}", self.path.display()));

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io)?;
        }
        tokio::fs::write(&temp, &bytes).await.map_err(io)?;
        tokio::fs::rename(&temp, &self.path).await.map_err(io)
    }
}

/// Claim repository persisted as a JSON snapshot.
pub struct SnapshotClaimRepository {
    inner: InMemoryClaimRepository,
    file: SnapshotFile,
    writer: Mutex<()>,
}

impl SnapshotClaimRepository {
    /// Load `<data_dir>/claims.json`, or start empty.
    pub async fn open(data_dir: &Path) -> Result<Self, RepositoryError> {
        let file = SnapshotFile::new(data_dir.join(CLAIMS_FILE));
        let claims: Vec<Claim> = file.load().await?;
        info!(path = %file.path().display(), count = claims.len(), "Loaded claim records");
        Ok(Self {
            inner: InMemoryClaimRepository::from_claims(claims),
            file,
            writer: Mutex::new(()),
        })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Copy of the live set for a mutation to run against.
    fn stage(&self) -> InMemoryClaimRepository {
        InMemoryClaimRepository::from_claims(self.inner.snapshot())
    }

    /// Write `staged` to disk, then make it the live set.
    async fn commit(&self, staged: InMemoryClaimRepository) -> Result<(), RepositoryError> {
        let claims = staged.snapshot();
        self.file.save(&claims).await.map_err(|e| {
            error!(path = %self.file.path().display(), error = %e, "Failed to persist claim snapshot");
            RepositoryError::from(e)
        })?;
        self.inner.replace_all(claims);
        Ok(())
    }
}

#[async_trait]
impl ClaimRepository for SnapshotClaimRepository {
    async fn insert(&self, claim: Claim) -> Result<(), RepositoryError> {
        let _guard = self.writer.lock().await;
        let staged = self.stage();
        staged.insert(claim).await?;
        self.commit(staged).await
    }

    async fn find_by_id(&self, id: ClaimId) -> Result<Option<Claim>, RepositoryError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_tracking_code(
        &self,
        code: &TrackingCode,
    ) -> Result<Option<Claim>, RepositoryError> {
        self.inner.find_by_tracking_code(code).await
    }

    async fn list(&self, status: Option<ClaimStatus>) -> Result<Vec<Claim>, RepositoryError> {
        self.inner.list(status).await
    }

    async fn update_status(
        &self,
        id: ClaimId,
        status: ClaimStatus,
    ) -> Result<Option<Claim>, RepositoryError> {
        let _guard = self.writer.lock().await;
        let staged = self.stage();
        let updated = staged.update_status(id, status).await?;
        if updated.is_some() {
            self.commit(staged).await?;
        }
        Ok(updated)
    }

    async fn delete(&self, id: ClaimId) -> Result<bool, RepositoryError> {
        let _guard = self.writer.lock().await;
        let staged = self.stage();
        let removed = staged.delete(id).await?;
        if removed {
            self.commit(staged).await?;
        }
        Ok(removed)
    }
}

/// Account repository persisted as a JSON snapshot.
pub struct SnapshotAccountRepository {
    inner: InMemoryAccountRepository,
    file: SnapshotFile,
    writer: Mutex<()>,
}

impl SnapshotAccountRepository {
    /// Load `<data_dir>/accounts.json`, or start empty.
    pub async fn open(data_dir: &Path) -> Result<Self, AccountRepositoryError> {
        let file = SnapshotFile::new(data_dir.join(ACCOUNTS_FILE));
        let accounts: Vec<Account> = file.load().await?;
        info!(path = %file.path().display(), count = accounts.len(), "Loaded staff accounts");
        Ok(Self {
            inner: InMemoryAccountRepository::from_accounts(accounts),
            file,
            writer: Mutex::new(()),
        })
    }
}

#[async_trait]
impl AccountRepository for SnapshotAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountRepositoryError> {
        self.inner.find_by_email(email).await
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, account: Account) -> Result<(), AccountRepositoryError> {
        let _guard = self.writer.lock().await;
        let staged = InMemoryAccountRepository::from_accounts(self.inner.snapshot());
        staged.insert(account).await?;
        let accounts = staged.snapshot();
        self.file.save(&accounts).await.map_err(|e| {
            error!(path = %self.file.path().display(), error = %e, "Failed to persist account snapshot");
            AccountRepositoryError::from(e)
        })?;
        self.inner.replace_all(accounts);
        Ok(())
    }

    async fn count(&self) -> Result<usize, AccountRepositoryError> {
        self.inner.count().await
    }
}
