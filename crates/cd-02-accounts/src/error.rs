//! Error types for the Accounts subsystem

use thiserror::Error;

/// Errors surfaced by login, token verification and account management.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    TokenExpired,

    #[error("Account not found or inactive")]
    InactiveAccount,

    #[error("Invalid account data: {0}")]
    InvalidAccount(String),

    #[error("Account store error: {0}")]
    Repository(#[from] AccountRepositoryError),

    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl AuthError {
    /// True for failures of a collaborator rather than of the caller.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, AuthError::Repository(_) | AuthError::Crypto(_))
    }
}

/// Errors from account stores
#[derive(Debug, Error)]
pub enum AccountRepositoryError {
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Account store unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}
