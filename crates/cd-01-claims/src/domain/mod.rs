//! # Domain Layer
//!
//! Pure claim logic: no I/O, no async.

pub mod claim;
pub mod document;
pub mod notification;
pub mod requirements;
pub mod storage_key;
pub mod submission;
pub mod tracking;

pub use claim::{
    Applicant, Claim, ClaimId, ClaimStatus, ClaimType, SubmissionReceipt, TrackingView,
};
pub use document::{
    DocumentDescriptor, DocumentFormat, DocumentKind, DocumentSlots, MAX_DOCUMENT_BYTES,
};
pub use notification::Notification;
pub use requirements::{first_missing, required_documents};
pub use submission::{
    normalize_optional, parse_prior_representation, ApplicantData, ClaimSubmission,
    SuppliedDocument,
};
pub use tracking::TrackingCode;
