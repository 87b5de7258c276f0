//! # Service Layer
//!
//! `AccountService` implements `AuthApi`; `bootstrap` holds the one-shot
//! admin provisioning step run at process start.

mod bootstrap;

pub use bootstrap::{ensure_admin_account, BootstrapOutcome};

use crate::domain::{
    normalize_email, AccessToken, Account, Credentials, NewAccount, PasswordHasher, Principal,
    TokenIssuer,
};
use crate::error::AuthError;
use crate::ports::inbound::AuthApi;
use crate::ports::outbound::AccountRepository;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

/// Account management and credential verification.
pub struct AccountService {
    repository: Arc<dyn AccountRepository>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
    // Verified against when the email is unknown so both paths cost one hash.
    decoy_hash: String,
}

impl AccountService {
    pub fn new(
        repository: Arc<dyn AccountRepository>,
        hasher: PasswordHasher,
        tokens: TokenIssuer,
    ) -> Result<Self, AuthError> {
        let decoy_hash = hasher.hash(&Uuid::new_v4().to_string())?;
        Ok(Self {
            repository,
            hasher,
            tokens,
            decoy_hash,
        })
    }

    /// Validate, hash and store a new active account.
    pub async fn create_account(&self, new: NewAccount) -> Result<Account, AuthError> {
        new.validate()
            .map_err(|e| AuthError::InvalidAccount(e.to_string()))?;
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            email: normalize_email(&new.email),
            password_hash: self.hash_password(new.password).await?,
            display_name: new.display_name.trim().to_string(),
            active: true,
            created_at: now,
            updated_at: now,
        };
        self.repository.insert(account.clone()).await?;
        info!(account_id = %account.id, "Account created");
        Ok(account)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        Ok(self.repository.find_by_email(&normalize_email(email)).await?)
    }

    // Key stretching runs on the blocking pool, off the async workers.
    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Crypto(format!("password hashing task failed: {e}")))?
    }

    async fn verify_password(&self, password: String, encoded: String) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &encoded))
            .await
            .map_err(|e| AuthError::Crypto(format!("password check task failed: {e}")))
    }
}

#[async_trait]
impl AuthApi for AccountService {
    async fn login(&self, credentials: Credentials) -> Result<AccessToken, AuthError> {
        let email = normalize_email(&credentials.email);
        let account = self.repository.find_by_email(&email).await?;

        let Some(account) = account else {
            let _ = self
                .verify_password(credentials.password, self.decoy_hash.clone())
                .await?;
            debug!("Login rejected: unknown email");
            return Err(AuthError::InvalidCredentials);
        };
        if !self
            .verify_password(credentials.password, account.password_hash.clone())
            .await?
        {
            warn!(account_id = %account.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }
        if !account.active {
            warn!(account_id = %account.id, "Login rejected: account inactive");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.tokens.issue(&account, Utc::now())?;
        info!(account_id = %account.id, "Login succeeded");
        Ok(AccessToken { access_token })
    }

    async fn authenticate(&self, bearer_token: &str) -> Result<Principal, AuthError> {
        let claims = self.tokens.verify(bearer_token, Utc::now())?;
        match self.repository.find_by_id(claims.sub).await? {
            Some(account) if account.active => Ok(Principal::from(&account)),
            _ => Err(AuthError::InactiveAccount),
        }
    }
}
