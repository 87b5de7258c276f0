//! # Outbound Ports (Driven Ports)
//!
//! Collaborators the Claims service requires the host application to provide.
//!
//! Production adapters live in `claimdesk-runtime/src/adapters`; in-memory
//! implementations for tests live in this crate's `adapters` module.

use crate::domain::{Claim, ClaimId, ClaimStatus, Notification, TrackingCode};
use crate::error::{BlobStoreError, NotifyError, RepositoryError};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Durable store of claim records.
///
/// Implementations must enforce tracking-code uniqueness on `insert`.
#[async_trait]
pub trait ClaimRepository: Send + Sync {
    /// Append a new claim.
    ///
    /// Fails with `RepositoryError::DuplicateTrackingCode` if the code is taken;
    /// nothing is written in that case.
    async fn insert(&self, claim: Claim) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: ClaimId) -> Result<Option<Claim>, RepositoryError>;

    async fn find_by_tracking_code(
        &self,
        code: &TrackingCode,
    ) -> Result<Option<Claim>, RepositoryError>;

    /// Claims ordered by creation time, most recent first.
    async fn list(&self, status: Option<ClaimStatus>) -> Result<Vec<Claim>, RepositoryError>;

    /// Overwrite the status field only. `None` if the id is unknown.
    async fn update_status(
        &self,
        id: ClaimId,
        status: ClaimStatus,
    ) -> Result<Option<Claim>, RepositoryError>;

    /// Returns `false` if the id is unknown.
    async fn delete(&self, id: ClaimId) -> Result<bool, RepositoryError>;
}

/// Object storage for claim documents.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), BlobStoreError>;

    /// Authentication-free retrieval URL valid for `ttl`.
    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<String, BlobStoreError>;
}

/// Message transport (email).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Source of fresh tracking codes.
pub trait TrackingCodeSource: Send + Sync {
    fn next_code(&self) -> TrackingCode;
}
