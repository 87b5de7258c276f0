//! Staff login.

use crate::domain::error::ApiError;
use crate::router::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use cd_02_accounts::{AccessToken, Credentials};

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<AccessToken>, ApiError> {
    let Json(credentials) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    Ok(Json(state.auth.login(credentials).await?))
}
