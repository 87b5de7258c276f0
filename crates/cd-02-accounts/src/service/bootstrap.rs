use super::AccountService;
use crate::domain::NewAccount;
use crate::error::AuthError;
use tracing::info;

/// Which branch `ensure_admin_account` took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created,
    AlreadyPresent,
}

/// Create the administrator account unless one with that email exists.
///
/// Idempotent; safe to run on every start.
pub async fn ensure_admin_account(
    accounts: &AccountService,
    admin: NewAccount,
) -> Result<BootstrapOutcome, AuthError> {
    if let Some(existing) = accounts.find_by_email(&admin.email).await? {
        info!(account_id = %existing.id, "Admin account already present");
        return Ok(BootstrapOutcome::AlreadyPresent);
    }
    let created = accounts.create_account(admin).await?;
    info!(account_id = %created.id, "Admin account created");
    Ok(BootstrapOutcome::Created)
}
