//! HTTP router assembly.

use crate::domain::config::GatewayConfig;
use crate::handlers::{
    auth::login,
    claims::{
        delete_claim, download_url, get_claim, list_claims, submit_claim, track_claim,
        update_claim_status,
    },
    health::health_check,
};
use crate::middleware::{create_cors_layer, AuthLayer, NormalizePath, NormalizePathLayer, TracingLayer};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use cd_01_claims::{ClaimIntakeApi, ClaimLifecycleApi};
use cd_02_accounts::AuthApi;
use std::sync::Arc;
use tower::Layer;
use tower_http::timeout::TimeoutLayer;

/// Shared handler state: the inbound ports the gateway drives.
#[derive(Clone)]
pub struct AppState {
    pub intake: Arc<dyn ClaimIntakeApi>,
    pub lifecycle: Arc<dyn ClaimLifecycleApi>,
    pub auth: Arc<dyn AuthApi>,
}

impl AppState {
    /// State backed by one service implementing both claim ports.
    pub fn new<C>(claims: Arc<C>, auth: Arc<dyn AuthApi>) -> Self
    where
        C: ClaimIntakeApi + ClaimLifecycleApi + 'static,
    {
        Self {
            intake: claims.clone(),
            lifecycle: claims,
            auth,
        }
    }
}

/// The complete application: router behind path normalization.
pub type GatewayApp = NormalizePath<Router>;

/// Build the application.
///
/// `extra_routes` (already stateful) are merged in before the middleware
/// stack, so they get the same tracing, CORS and authorization treatment.
pub fn build_router(config: &GatewayConfig, state: AppState, extra_routes: Router) -> GatewayApp {
    let auth = AuthLayer::new(Arc::clone(&state.auth));

    let router = Router::new()
        .route("/claims", post(submit_claim).get(list_claims))
        .route("/claims/track/:code", get(track_claim))
        .route(
            "/claims/:id",
            get(get_claim)
                .patch(update_claim_status)
                .delete(delete_claim),
        )
        .route("/claims/:id/download/:kind", get(download_url))
        .route("/auth/login", post(login))
        .route("/health", get(health_check))
        .with_state(state)
        .merge(extra_routes)
        .route_layer(auth)
        .layer(DefaultBodyLimit::max(config.limits.max_request_size))
        .layer(TimeoutLayer::new(config.timeouts.request()))
        .layer(create_cors_layer(&config.cors))
        .layer(TracingLayer::new());

    NormalizePathLayer.layer(router)
}
