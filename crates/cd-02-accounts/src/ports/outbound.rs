//! # Outbound Ports (Driven Ports)

use crate::domain::{Account, AccountId};
use crate::error::AccountRepositoryError;
use async_trait::async_trait;

/// Durable store of staff accounts.
///
/// Emails are unique; callers pass them already normalized.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountRepositoryError>;

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountRepositoryError>;

    /// Fails with `DuplicateEmail` if the email is taken.
    async fn insert(&self, account: Account) -> Result<(), AccountRepositoryError>;

    async fn count(&self) -> Result<usize, AccountRepositoryError>;
}
