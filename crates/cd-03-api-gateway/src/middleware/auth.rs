//! Authorization boundary.
//!
//! Public routes pass straight through. Protected routes need
//! `Authorization: Bearer <token>`; the token is verified by the accounts
//! subsystem and the resulting [`Principal`] is attached to the request
//! extensions for handlers.

use crate::domain::error::ApiError;
use crate::domain::tiers::route_tier;
use axum::{
    body::Body,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use cd_02_accounts::{AuthApi, AuthError, Principal};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::{debug, warn};

/// Auth layer
#[derive(Clone)]
pub struct AuthLayer {
    auth: Arc<dyn AuthApi>,
}

impl AuthLayer {
    pub fn new(auth: Arc<dyn AuthApi>) -> Self {
        Self { auth }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            auth: Arc::clone(&self.auth),
        }
    }
}

/// Auth service
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    auth: Arc<dyn AuthApi>,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();
        let auth = Arc::clone(&self.auth);

        Box::pin(async move {
            let tier = route_tier(req.method(), req.uri().path());
            if !tier.requires_auth() {
                return inner.call(req).await;
            }

            let Some(token) = bearer_token(&req) else {
                debug!(path = %req.uri().path(), "Protected route called without bearer token");
                return Ok(ApiError::from(AuthError::MissingToken).into_response());
            };

            match auth.authenticate(&token).await {
                Ok(principal) => {
                    debug!(account_id = %principal.account_id, "Request authenticated");
                    req.extensions_mut().insert::<Principal>(principal);
                    inner.call(req).await
                }
                Err(err) => {
                    warn!(path = %req.uri().path(), reason = %err, "Bearer token rejected");
                    Ok(ApiError::from(err).into_response())
                }
            }
        })
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively; an empty token counts as absent.
fn bearer_token<B>(req: &Request<B>) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}
