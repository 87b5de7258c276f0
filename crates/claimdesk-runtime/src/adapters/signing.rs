//! HMAC-SHA256 download-link signatures.
//!
//! A link is valid for one key until its `expires` unix timestamp. The
//! signed message is `"<key>\n<expires>"`; the signature travels hex-encoded.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Why a presented signature was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureRejection {
    Malformed,
    Mismatch,
    Expired,
}

#[derive(Clone)]
pub struct UrlSigner {
    base: HmacSha256,
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner").finish_non_exhaustive()
    }
}

impl UrlSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, hmac::digest::InvalidLength> {
        Ok(Self {
            base: HmacSha256::new_from_slice(secret.as_ref())?,
        })
    }

    fn mac(&self, key: &str, expires: i64) -> HmacSha256 {
        let mut mac = self.base.clone();
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        mac
    }

    /// Hex signature for `key` valid until `expires`.
    pub fn sign(&self, key: &str, expires: i64) -> String {
        hex::encode(self.mac(key, expires).finalize().into_bytes())
    }

    /// Check a presented signature in constant time, then the expiry.
    pub fn verify(
        &self,
        key: &str,
        expires: i64,
        signature_hex: &str,
        now_unix: i64,
    ) -> Result<(), SignatureRejection> {
        let presented = hex::decode(signature_hex).map_err(|_| SignatureRejection::Malformed)?;
        let expected = self.mac(key, expires).finalize().into_bytes();
        if !bool::from(expected.as_slice().ct_eq(presented.as_slice())) {
            return Err(SignatureRejection::Mismatch);
        }
        if now_unix > expires {
            return Err(SignatureRejection::Expired);
        }
        Ok(())
    }
}
