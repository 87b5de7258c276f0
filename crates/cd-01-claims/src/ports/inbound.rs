//! # Inbound Ports (Driving Ports)
//!
//! APIs exposed by the Claims subsystem to the HTTP gateway.

use crate::domain::{Claim, ClaimId, ClaimStatus, ClaimSubmission, SubmissionReceipt, TrackingView};
use crate::error::ClaimError;
use async_trait::async_trait;

/// Public claim intake.
#[async_trait]
pub trait ClaimIntakeApi: Send + Sync {
    /// Validate, store documents, persist and notify.
    ///
    /// Validation failures are reported before any document is uploaded.
    async fn submit(&self, submission: ClaimSubmission) -> Result<SubmissionReceipt, ClaimError>;
}

/// Claim lookup and status management.
///
/// Only `lookup_by_tracking_code` is meant for unauthenticated callers.
#[async_trait]
pub trait ClaimLifecycleApi: Send + Sync {
    /// Narrow public projection of a claim.
    async fn lookup_by_tracking_code(&self, code: &str) -> Result<TrackingView, ClaimError>;

    /// All claims, newest first, optionally filtered by exact status.
    async fn list_all(&self, status: Option<ClaimStatus>) -> Result<Vec<Claim>, ClaimError>;

    async fn get_by_id(&self, id: ClaimId) -> Result<Claim, ClaimError>;

    /// Overwrite the status (any state is settable) and notify the applicant.
    async fn update_status(&self, id: ClaimId, status: ClaimStatus) -> Result<Claim, ClaimError>;

    /// Delete the record. Stored documents are retained.
    async fn remove(&self, id: ClaimId) -> Result<(), ClaimError>;

    /// Time-limited retrieval URL for one attached document.
    async fn get_download_url(&self, id: ClaimId, kind: &str) -> Result<String, ClaimError>;
}
