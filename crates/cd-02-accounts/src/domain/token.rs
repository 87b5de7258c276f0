//! Signed bearer tokens.
//!
//! Compact JWS with HS256: `b64(header).b64(claims).b64(hmac)`, URL-safe
//! base64 without padding, so standard JWT tooling can decode them.

use super::account::{Account, AccountId};
use crate::error::AuthError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: AccountId,
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies access tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Vec<u8>,
    ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenIssuer {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    pub fn issue(&self, account: &Account, now: DateTime<Utc>) -> Result<String, AuthError> {
        let header = Header {
            alg: "HS256".into(),
            typ: "JWT".into(),
        };
        let claims = TokenClaims {
            sub: account.id,
            email: account.email.clone(),
            name: account.display_name.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let signing_input = format!("{}.{}", encode_json(&header)?, encode_json(&claims)?);
        let signature = URL_SAFE_NO_PAD.encode(self.mac(signing_input.as_bytes())?.finalize().into_bytes());
        Ok(format!("{signing_input}.{signature}"))
    }

    /// Check structure, signature and expiry, in that order.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
        let mut parts = token.split('.');
        let (Some(header_segment), Some(payload_segment), Some(signature_segment), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::MalformedToken);
        };

        let header: Header = decode_json(header_segment)?;
        if header.alg != "HS256" {
            return Err(AuthError::MalformedToken);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_segment)
            .map_err(|_| AuthError::MalformedToken)?;
        let signing_input = &token[..header_segment.len() + 1 + payload_segment.len()];
        self.mac(signing_input.as_bytes())?
            .verify_slice(&signature)
            .map_err(|_| AuthError::InvalidSignature)?;

        let claims: TokenClaims = decode_json(payload_segment)?;
        if claims.exp <= now.timestamp() {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }

    fn mac(&self, data: &[u8]) -> Result<HmacSha256, AuthError> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).map_err(|e| AuthError::Crypto(e.to_string()))?;
        mac.update(data);
        Ok(mac)
    }
}

fn encode_json<T: Serialize>(value: &T) -> Result<String, AuthError> {
    let json = serde_json::to_vec(value).map_err(|e| AuthError::Crypto(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_json<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| AuthError::MalformedToken)?;
    serde_json::from_slice(&bytes).map_err(|_| AuthError::MalformedToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn account() -> Account {
        let now = Utc::now();
        Account {
            id: Uuid::new_v4(),
            email: "admin@studio.test".into(),
            password_hash: String::new(),
            display_name: "Studio Admin".into(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(b"test-signing-secret".to_vec(), Duration::hours(1))
    }

    #[test]
    fn test_issue_and_verify() {
        let account = account();
        let now = Utc::now();
        let token = issuer().issue(&account, now).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = issuer().verify(&token, now).unwrap();
        assert_eq!(claims.sub, account.id);
        assert_eq!(claims.email, "admin@studio.test");
        assert_eq!(claims.name, "Studio Admin");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now();
        let token = issuer().issue(&account(), now).unwrap();
        let later = now + Duration::hours(1);
        assert!(matches!(
            issuer().verify(&token, later),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_other_secret_rejected() {
        let now = Utc::now();
        let token = issuer().issue(&account(), now).unwrap();
        let other = TokenIssuer::new(b"another-secret".to_vec(), Duration::hours(1));
        assert!(matches!(
            other.verify(&token, now),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let now = Utc::now();
        let token = issuer().issue(&account(), now).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_claims = TokenClaims {
            sub: Uuid::new_v4(),
            email: "intruder@example.com".into(),
            name: "Intruder".into(),
            iat: now.timestamp(),
            exp: now.timestamp() + 10_000,
        };
        let forged = format!("{}.{}.{}", parts[0], encode_json(&forged_claims).unwrap(), parts[2]);
        assert!(matches!(
            issuer().verify(&forged, now),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_malformed_tokens() {
        let now = Utc::now();
        for bad in ["", "abc", "a.b", "a.b.c.d", "!!!.???.***"] {
            assert!(
                matches!(issuer().verify(bad, now), Err(AuthError::MalformedToken)),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", issuer());
        assert!(!rendered.contains("test-signing-secret"));
    }
}
