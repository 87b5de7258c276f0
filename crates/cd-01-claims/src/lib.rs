//! # CD-01 Claims
//!
//! Claim intake and claim lifecycle subsystem.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure business logic, no I/O
//!   - `DocumentKind`: Single registry of document roles (API name, form field, blob tag, record field)
//!   - `required_documents`: Which documents a claim type needs
//!   - `TrackingCode`: Public, unambiguous claim handle
//!   - `storage_key`: Blob key derivation
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `ClaimIntakeApi`, `ClaimLifecycleApi`: Driving ports (inbound API)
//!   - `ClaimRepository`, `BlobStore`, `Notifier`, `TimeSource`, `TrackingCodeSource`: Driven ports
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `ClaimService`: Implements both inbound ports
//!
//! - **Dispatch** (`dispatch`): Background notification worker
//!
//! - **Adapters Layer** (`adapters/`): In-memory and default implementations
//!
//! ## Invariants
//!
//! - A claim is persisted only after every supplied document has been stored.
//! - The identity document slot is populated on every persisted claim.
//! - Tracking codes are unique; collisions on insert are retried with a fresh code.
//! - Notification failures never reach the caller.
//!
//! ## Usage Example
//!
//! ```ignore
//! use cd_01_claims::{
//!     ClaimService, InMemoryBlobStore, InMemoryClaimRepository, IntakeConfig,
//!     LogNotifier, NotificationDispatcher,
//! };
//! use std::sync::Arc;
//!
//! let (dispatcher, _worker) = NotificationDispatcher::spawn(Arc::new(LogNotifier), 256);
//! let service = ClaimService::new(
//!     Arc::new(InMemoryClaimRepository::new()),
//!     Arc::new(InMemoryBlobStore::new()),
//!     dispatcher,
//!     IntakeConfig::default(),
//! );
//! let receipt = service.submit(submission).await?;
//! ```

pub mod adapters;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

// Re-export main types
pub use adapters::{
    InMemoryBlobStore, InMemoryClaimRepository, LogNotifier, ManualClock,
    RandomTrackingCodeSource, RecordingNotifier, ScriptedTrackingCodeSource, StoredBlob,
    SystemTimeSource,
};
pub use dispatch::NotificationDispatcher;
pub use domain::{
    required_documents, storage_key, Applicant, ApplicantData, Claim, ClaimId, ClaimStatus,
    ClaimSubmission, ClaimType, DocumentFormat, DocumentKind, DocumentSlots, Notification,
    SubmissionReceipt, SuppliedDocument, TrackingCode, TrackingView, MAX_DOCUMENT_BYTES,
};
pub use error::{BlobStoreError, ClaimError, ErrorCategory, NotifyError, RepositoryError};
pub use ports::inbound::{ClaimIntakeApi, ClaimLifecycleApi};
pub use ports::outbound::{BlobStore, ClaimRepository, Notifier, TimeSource, TrackingCodeSource};
pub use service::{ClaimService, IntakeConfig};
