//! Tracking codes: the public, case-insensitive handle an applicant uses to
//! look up a claim without logging in.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbols used in generated codes. Excludes `0`, `O`, `1`, `I` and `L`.
pub const TRACKING_ALPHABET: &[u8] = b"23456789ABCDEFGHJKMNPQRSTUVWXYZ";

/// Length of generated codes. 31^8 is roughly 8.5e11 combinations.
pub const TRACKING_CODE_LEN: usize = 8;

/// Short public handle of a claim.
///
/// Stored upper-case. Anything a caller types is normalized with
/// [`TrackingCode::from_input`] before lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingCode(String);

impl TrackingCode {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..TRACKING_CODE_LEN)
            .map(|_| TRACKING_ALPHABET[rng.gen_range(0..TRACKING_ALPHABET.len())] as char)
            .collect();
        TrackingCode(code)
    }

    /// Normalize caller input: trim and upper-case.
    pub fn from_input(input: &str) -> Self {
        TrackingCode(input.trim().to_ascii_uppercase())
    }

    /// True when the code has the shape of a generated one.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == TRACKING_CODE_LEN && self.0.bytes().all(|b| TRACKING_ALPHABET.contains(&b))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
