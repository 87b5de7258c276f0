//! Error types for the Claims subsystem

use crate::domain::{ClaimId, DocumentKind};
use thiserror::Error;

/// Coarse classification used by the HTTP layer to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller supplied something unacceptable (400).
    Validation,
    /// Caller is not authenticated (401).
    Unauthorized,
    /// Referenced entity does not exist (404).
    NotFound,
    /// A collaborator failed (500). Detail stays in the logs.
    Infrastructure,
}

/// Errors that can occur in the Claims subsystem
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Missing required document: {0}")]
    MissingDocument(DocumentKind),

    #[error("Document supplied more than once: {0}")]
    DuplicateDocument(DocumentKind),

    #[error("Unsupported content type for {kind}: '{content_type}' (accepted: PDF, JPEG, PNG)")]
    UnsupportedContentType {
        kind: DocumentKind,
        content_type: String,
    },

    #[error("{kind} is too large: {size} bytes > {max} bytes")]
    DocumentTooLarge {
        kind: DocumentKind,
        size: usize,
        max: usize,
    },

    #[error("Invalid applicant data: {0}")]
    InvalidApplicant(String),

    #[error("Unknown document kind: {0}")]
    UnknownDocumentKind(String),

    #[error("Invalid claim status: {0}")]
    InvalidStatus(String),

    #[error("Claim not found: {0}")]
    ClaimNotFound(ClaimId),

    #[error("No claim with tracking code {0}")]
    TrackingCodeNotFound(String),

    #[error("Claim {claim_id} has no {kind} on file")]
    DocumentNotFound { claim_id: ClaimId, kind: DocumentKind },

    #[error("Blob store error: {0}")]
    Storage(#[from] BlobStoreError),

    #[error("Repository error: {0}")]
    Persistence(#[from] RepositoryError),

    #[error("Could not allocate a unique tracking code after {attempts} attempts")]
    TrackingCodeExhausted { attempts: u32 },
}

impl ClaimError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClaimError::MissingDocument(_)
            | ClaimError::DuplicateDocument(_)
            | ClaimError::UnsupportedContentType { .. }
            | ClaimError::DocumentTooLarge { .. }
            | ClaimError::InvalidApplicant(_)
            | ClaimError::UnknownDocumentKind(_)
            | ClaimError::InvalidStatus(_) => ErrorCategory::Validation,
            ClaimError::ClaimNotFound(_)
            | ClaimError::TrackingCodeNotFound(_)
            | ClaimError::DocumentNotFound { .. } => ErrorCategory::NotFound,
            ClaimError::Storage(_)
            | ClaimError::Persistence(_)
            | ClaimError::TrackingCodeExhausted { .. } => ErrorCategory::Infrastructure,
        }
    }
}

/// Errors from claim record stores
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Tracking code already in use: {0}")]
    DuplicateTrackingCode(String),

    #[error("Record store unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Errors from blob stores
#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Errors from notification transports
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_missing_document_message_names_the_kind() {
        let err = ClaimError::MissingDocument(DocumentKind::FormB);
        assert_eq!(err.to_string(), "Missing required document: form B");
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            ClaimError::ClaimNotFound(Uuid::new_v4()).category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            ClaimError::UnknownDocumentKind("passport".into()).category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            ClaimError::Storage(BlobStoreError::Io("disk full".into())).category(),
            ErrorCategory::Infrastructure
        );
        assert_eq!(
            ClaimError::TrackingCodeExhausted { attempts: 5 }.category(),
            ErrorCategory::Infrastructure
        );
    }
}
