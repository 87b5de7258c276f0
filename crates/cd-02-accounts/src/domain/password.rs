//! Salted password hashing (PBKDF2-HMAC-SHA256).
//!
//! Encoded form: `pbkdf2-sha256$<iterations>$<salt hex>$<hash hex>`.
//! The iteration count travels with the hash, so raising the default does
//! not invalidate existing accounts.

use crate::error::AuthError;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

pub const DEFAULT_ITERATIONS: u32 = 100_000;

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    iterations: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let derived = pbkdf2(password.as_bytes(), &salt, self.iterations)?;
        Ok(format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            hex::encode(salt),
            hex::encode(derived)
        ))
    }

    /// Constant-time check of `password` against an encoded hash.
    ///
    /// Unparseable hashes never verify.
    pub fn verify(&self, password: &str, encoded: &str) -> bool {
        let Some((iterations, salt, expected)) = parse(encoded) else {
            return false;
        };
        match pbkdf2(password.as_bytes(), &salt, iterations) {
            Ok(derived) => derived[..].ct_eq(&expected[..]).into(),
            Err(_) => false,
        }
    }
}

fn parse(encoded: &str) -> Option<(u32, Vec<u8>, Vec<u8>)> {
    let mut parts = encoded.split('$');
    if parts.next()? != SCHEME {
        return None;
    }
    let iterations: u32 = parts.next()?.parse().ok().filter(|i| *i > 0)?;
    let salt = hex::decode(parts.next()?).ok()?;
    let hash = hex::decode(parts.next()?).ok()?;
    if parts.next().is_some() || hash.len() != HASH_LEN {
        return None;
    }
    Some((iterations, salt, hash))
}

/// Single-block PBKDF2 (derived length equals the HMAC output length).
fn pbkdf2(password: &[u8], salt: &[u8], iterations: u32) -> Result<[u8; HASH_LEN], AuthError> {
    let prf = HmacSha256::new_from_slice(password).map_err(|e| AuthError::Crypto(e.to_string()))?;

    let mut first = prf.clone();
    first.update(salt);
    first.update(&1u32.to_be_bytes());
    let mut u = [0u8; HASH_LEN];
    u.copy_from_slice(&first.finalize().into_bytes());
    let mut block = u;

    for _ in 1..iterations {
        let mut mac = prf.clone();
        mac.update(&u);
        u.copy_from_slice(&mac.finalize().into_bytes());
        for (b, x) in block.iter_mut().zip(u.iter()) {
            *b ^= x;
        }
    }
    Ok(block)
}
