//! Route tier classification.
//!
//! Public: claim submission, tracking lookup, login, health, signed file
//! downloads. Everything else is Protected and needs a verified bearer token.
//! Paths are expected after normalization (lower-case static segments).

use axum::http::Method;

/// Route access tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteTier {
    /// No authentication required
    Public,
    /// Requires a bearer token resolving to an active account
    Protected,
}

impl RouteTier {
    pub fn requires_auth(&self) -> bool {
        matches!(self, RouteTier::Protected)
    }
}

pub fn route_tier(method: &Method, path: &str) -> RouteTier {
    // CORS preflight never carries credentials.
    if method == Method::OPTIONS {
        return RouteTier::Public;
    }

    let segments: Vec<&str> = path
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let is_read = method == Method::GET || method == Method::HEAD;

    let public = match segments.as_slice() {
        ["claims"] => method == Method::POST,
        ["claims", "track", _] => is_read,
        ["auth", "login"] => method == Method::POST,
        ["health"] => is_read,
        ["files", _, ..] => is_read,
        _ => false,
    };

    if public {
        RouteTier::Public
    } else {
        RouteTier::Protected
    }
}
