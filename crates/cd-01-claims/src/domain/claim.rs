use super::document::DocumentSlots;
use super::tracking::TrackingCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// System-generated claim identifier.
pub type ClaimId = Uuid;

/// Lifecycle status of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    #[serde(rename = "Received")]
    Received,
    #[serde(rename = "In Process")]
    InProcess,
    #[serde(rename = "Finalized")]
    Finalized,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 3] = [
        ClaimStatus::Received,
        ClaimStatus::InProcess,
        ClaimStatus::Finalized,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ClaimStatus::Received => "Received",
            ClaimStatus::InProcess => "In Process",
            ClaimStatus::Finalized => "Finalized",
        }
    }

    /// Parse a status as sent by clients: the display label in any case, or
    /// its compact forms (`in_process`, `inprocess`).
    pub fn parse(input: &str) -> Option<Self> {
        let normalized: String = input
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "received" => Some(ClaimStatus::Received),
            "inprocess" => Some(ClaimStatus::InProcess),
            "finalized" => Some(ClaimStatus::Finalized),
            _ => None,
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Claim classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimType {
    Medical,
    Incapacity,
    Rejection,
    Other,
}

impl ClaimType {
    /// Any unrecognized or absent value is `Other`.
    pub fn parse(input: Option<&str>) -> Self {
        match input.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("medical") => ClaimType::Medical,
            Some("incapacity") => ClaimType::Incapacity,
            Some("rejection") => ClaimType::Rejection,
            _ => ClaimType::Other,
        }
    }

    /// Whether the work-related narrative fields are kept for this type.
    pub fn keeps_work_narrative(self) -> bool {
        matches!(self, ClaimType::Rejection)
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClaimType::Medical => "Medical",
            ClaimType::Incapacity => "Incapacity",
            ClaimType::Rejection => "Rejection",
            ClaimType::Other => "Other",
        };
        f.write_str(name)
    }
}

/// Applicant identity on a persisted claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub name: String,
    pub national_id: String,
    pub email: String,
}

/// The central claim record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: ClaimId,
    pub tracking_code: TrackingCode,
    pub applicant: Applicant,
    pub claim_type: ClaimType,
    pub claim_subtype: Option<String>,
    pub work_schedule: Option<String>,
    pub work_address: Option<String>,
    pub commute_route: Option<String>,
    pub prior_representation: bool,
    pub documents: DocumentSlots,
    pub status: ClaimStatus,
    pub created_at: DateTime<Utc>,
}

impl Claim {
    /// Public projection of this claim.
    pub fn tracking_view(&self) -> TrackingView {
        TrackingView {
            tracking_code: self.tracking_code.clone(),
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// The only fields of a claim visible to unauthenticated callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingView {
    pub tracking_code: TrackingCode,
    pub status: ClaimStatus,
    pub created_at: DateTime<Utc>,
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub claim_id: ClaimId,
    pub tracking_code: TrackingCode,
}
