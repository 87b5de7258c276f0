//! Blob key derivation.
//!
//! Layout: `{tag}/{national_id}-{tag}-{unix_millis}-{nonce}.{ext}`. The nonce
//! keeps two submissions from the same applicant in the same millisecond
//! apart.

use super::document::{DocumentFormat, DocumentKind};
use chrono::{DateTime, Utc};
use rand::Rng;

const MAX_EXTENSION_LEN: usize = 5;

/// Number of random bytes in the key nonce (rendered as hex).
pub const NONCE_BYTES: usize = 3;

pub fn random_nonce<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    rng.fill(&mut bytes);
    hex::encode(bytes)
}

/// Extension preserved from the client filename, falling back to the
/// canonical one for the declared format.
pub fn extension_for(file_name: Option<&str>, format: DocumentFormat) -> String {
    file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.bytes().all(|b| b.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| format.extension().to_string())
}

pub fn derive(
    kind: DocumentKind,
    national_id: &str,
    submitted_at: DateTime<Utc>,
    nonce: &str,
    extension: &str,
) -> String {
    let tag = kind.blob_tag();
    format!(
        "{tag}/{national_id}-{tag}-{}-{nonce}.{extension}",
        submitted_at.timestamp_millis()
    )
}
