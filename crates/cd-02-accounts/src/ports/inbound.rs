//! # Inbound Ports (Driving Ports)

use crate::domain::{AccessToken, Credentials, Principal};
use crate::error::AuthError;
use async_trait::async_trait;

/// Credential verification as seen by the HTTP gateway.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange email and password for a bearer token.
    ///
    /// Unknown email, wrong password and inactive account are indistinguishable.
    async fn login(&self, credentials: Credentials) -> Result<AccessToken, AuthError>;

    /// Verify a bearer token and resolve it to an active account.
    async fn authenticate(&self, bearer_token: &str) -> Result<Principal, AuthError>;
}
