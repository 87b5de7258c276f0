//! # Domain Layer
//!
//! Account entity, password hashing and token format.

pub mod account;
pub mod password;
pub mod token;

pub use account::{
    normalize_email, AccessToken, Account, AccountId, Credentials, NewAccount, Principal,
};
pub use password::{PasswordHasher, DEFAULT_ITERATIONS};
pub use token::{TokenClaims, TokenIssuer, DEFAULT_TOKEN_TTL_SECS};
