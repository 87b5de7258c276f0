//! # CD-02 Accounts
//!
//! Staff identities and credential verification.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`)
//!   - `Account`, `Principal`: staff identity and its verified projection
//!   - `PasswordHasher`: salted PBKDF2-HMAC-SHA256
//!   - `TokenIssuer`: HS256 bearer tokens carrying subject id, email, display name
//!
//! - **Ports Layer** (`ports/`)
//!   - `AuthApi`: driving port used by the gateway's authorization layer
//!   - `AccountRepository`: driven port
//!
//! - **Service Layer** (`service/`)
//!   - `AccountService`: implements `AuthApi`
//!   - `ensure_admin_account`: idempotent startup provisioning
//!
//! ## Security
//!
//! - Password hashes are compared in constant time.
//! - Login failures do not reveal whether the email exists.
//! - A token is accepted only while its account exists and is active.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::InMemoryAccountRepository;
pub use domain::{
    AccessToken, Account, AccountId, Credentials, NewAccount, PasswordHasher, Principal,
    TokenClaims, TokenIssuer, DEFAULT_ITERATIONS, DEFAULT_TOKEN_TTL_SECS,
};
pub use error::{AccountRepositoryError, AuthError};
pub use ports::inbound::AuthApi;
pub use ports::outbound::AccountRepository;
pub use service::{ensure_admin_account, AccountService, BootstrapOutcome};
