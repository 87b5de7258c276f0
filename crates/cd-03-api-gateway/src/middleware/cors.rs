//! CORS middleware.
//!
//! Wrapper around tower-http CORS with gateway configuration. An allowed
//! origin is either exact (`https://claims.example.com`) or a subdomain
//! pattern (`https://*.vercel.app`) matching any host under that domain.

use crate::domain::config::CorsConfig;
use axum::http::{HeaderName, HeaderValue, Method};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// One entry of the origin allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
enum OriginRule {
    Exact(HeaderValue),
    Subdomain { prefix: String, suffix: String },
}

impl OriginRule {
    fn parse(origin: &str) -> Option<Self> {
        match origin.split_once("://*.") {
            Some((scheme, domain)) if !scheme.is_empty() && !domain.is_empty() => {
                Some(OriginRule::Subdomain {
                    prefix: format!("{}://", scheme.to_ascii_lowercase()),
                    suffix: format!(".{}", domain.to_ascii_lowercase()),
                })
            }
            Some(_) => None,
            None => origin.parse().ok().map(OriginRule::Exact),
        }
    }

    fn matches(&self, origin: &HeaderValue) -> bool {
        match self {
            OriginRule::Exact(allowed) => allowed == origin,
            OriginRule::Subdomain { prefix, suffix } => {
                let Ok(origin) = origin.to_str() else {
                    return false;
                };
                let origin = origin.to_ascii_lowercase();
                origin
                    .strip_prefix(prefix.as_str())
                    .and_then(|rest| rest.strip_suffix(suffix.as_str()))
                    .is_some_and(|host| !host.is_empty() && !host.contains(['/', ':', '@']))
            }
        }
    }
}

/// Create CORS layer from gateway config
pub fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    if !config.enabled {
        // No CORS headers at all: browsers block cross-origin calls.
        return CorsLayer::new();
    }

    let mut cors = CorsLayer::new();
    let wildcard_origin = config.allowed_origins.iter().any(|o| o == "*");
    let wildcard_headers = config.allowed_headers.iter().any(|h| h == "*");

    if wildcard_origin {
        cors = cors.allow_origin(Any);
    } else {
        let rules: Arc<Vec<OriginRule>> = Arc::new(
            config
                .allowed_origins
                .iter()
                .filter_map(|o| OriginRule::parse(o))
                .collect(),
        );
        cors = cors.allow_origin(AllowOrigin::predicate(move |origin, _| {
            rules.iter().any(|rule| rule.matches(origin))
        }));
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    if wildcard_headers {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<HeaderName> = config
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    if !config.expose_headers.is_empty() {
        let expose: Vec<HeaderName> = config
            .expose_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        cors = cors.expose_headers(expose);
    }

    cors = cors.max_age(Duration::from_secs(config.max_age));

    // tower-http refuses credentials combined with wildcards.
    if config.allow_credentials && !wildcard_origin && !wildcard_headers {
        cors = cors.allow_credentials(true);
    }

    cors
}
