//! Case-insensitive routing for static path segments.
//!
//! Runs before the router: `/Claims/TRACK/abc` is routed as
//! `/claims/track/abc`. Dynamic segments (ids, tracking codes, document
//! kinds, blob keys) are left untouched.

use axum::http::{uri::PathAndQuery, Request, Uri};
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Layer wrapping a router with [`NormalizePath`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizePathLayer;

impl<S> Layer<S> for NormalizePathLayer {
    type Service = NormalizePath<S>;

    fn layer(&self, inner: S) -> Self::Service {
        NormalizePath { inner }
    }
}

#[derive(Debug, Clone)]
pub struct NormalizePath<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for NormalizePath<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        if let Some(uri) = normalized_uri(req.uri()) {
            *req.uri_mut() = uri;
        }
        self.inner.call(req)
    }
}

/// Rewritten URI, or `None` when the path is already canonical.
fn normalized_uri(uri: &Uri) -> Option<Uri> {
    let path = normalize_path(uri.path())?;
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(parts).ok()
}

pub fn normalize_path(path: &str) -> Option<String> {
    let mut segments: Vec<String> = path.split('/').map(str::to_string).collect();
    // segments[0] is the empty string before the leading slash.
    let mut changed = false;
    let mut lower = |index: usize, expected: &str, segments: &mut Vec<String>| -> bool {
        match segments.get_mut(index) {
            Some(segment) if segment.eq_ignore_ascii_case(expected) => {
                if segment != expected {
                    *segment = expected.to_string();
                    changed = true;
                }
                true
            }
            _ => false,
        }
    };

    if lower(1, "claims", &mut segments) {
        if !lower(2, "track", &mut segments) {
            lower(3, "download", &mut segments);
        }
    } else if lower(1, "auth", &mut segments) {
        lower(2, "login", &mut segments);
    } else if !lower(1, "health", &mut segments) {
        lower(1, "files", &mut segments);
    }

    changed.then(|| segments.join("/"))
}
