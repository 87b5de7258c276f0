//! Messages emitted by intake and status changes.

use super::claim::{ClaimStatus, ClaimType};
use super::tracking::TrackingCode;

/// Outgoing messages produced by claim state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Confirmation to the applicant after intake.
    ClaimReceived {
        to: String,
        applicant_name: String,
        tracking_code: TrackingCode,
    },
    /// Alert to the operations inbox after intake.
    NewClaimAlert {
        to: String,
        applicant_name: String,
        national_id: String,
        claim_type: ClaimType,
        tracking_code: TrackingCode,
    },
    /// Status update to the applicant.
    StatusChanged {
        to: String,
        applicant_name: String,
        tracking_code: TrackingCode,
        status: ClaimStatus,
    },
}

impl Notification {
    pub fn recipient(&self) -> &str {
        match self {
            Notification::ClaimReceived { to, .. }
            | Notification::NewClaimAlert { to, .. }
            | Notification::StatusChanged { to, .. } => to,
        }
    }

    pub fn tracking_code(&self) -> &TrackingCode {
        match self {
            Notification::ClaimReceived { tracking_code, .. }
            | Notification::NewClaimAlert { tracking_code, .. }
            | Notification::StatusChanged { tracking_code, .. } => tracking_code,
        }
    }

    /// Stable name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::ClaimReceived { .. } => "claim_received",
            Notification::NewClaimAlert { .. } => "new_claim_alert",
            Notification::StatusChanged { .. } => "status_changed",
        }
    }
}
