//! Claim endpoints.

use super::intake_form::read_intake_form;
use crate::domain::error::ApiError;
use crate::router::AppState;
use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, Multipart, Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use cd_01_claims::{Claim, ClaimError, ClaimId, ClaimStatus, DocumentKind, TrackingView};
use cd_02_accounts::Principal;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const SUBMISSION_ACCEPTED_MESSAGE: &str = "Claim received";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub message: &'static str,
    pub tracking_code: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: ClaimId,
}

/// `POST /claims`
pub async fn submit_claim(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let submission = read_intake_form(multipart).await?.into_submission()?;
    let receipt = state.intake.submit(submission).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: SUBMISSION_ACCEPTED_MESSAGE,
            tracking_code: receipt.tracking_code.to_string(),
        }),
    ))
}

/// `GET /claims/track/:code`
pub async fn track_claim(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<TrackingView>, ApiError> {
    Ok(Json(state.lifecycle.lookup_by_tracking_code(&code).await?))
}

/// `GET /claims?status=`
pub async fn list_claims(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Claim>>, ApiError> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_status(raw)?),
    };
    Ok(Json(state.lifecycle.list_all(status).await?))
}

/// `GET /claims/:id`
pub async fn get_claim(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Claim>, ApiError> {
    let id = parse_claim_id(&id)?;
    Ok(Json(state.lifecycle.get_by_id(id).await?))
}

/// `PATCH /claims/:id`
pub async fn update_claim_status(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<Claim>, ApiError> {
    let id = parse_claim_id(&id)?;
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let status = parse_status(&request.status)?;

    let claim = state.lifecycle.update_status(id, status).await?;
    info!(
        claim_id = %id,
        status = %status,
        actor = %principal.account_id,
        "Claim status changed via API"
    );
    Ok(Json(claim))
}

/// `GET /claims/:id/download/:kind`
pub async fn download_url(
    State(state): State<AppState>,
    Path((id, kind)): Path<(String, String)>,
) -> Result<Json<DownloadResponse>, ApiError> {
    // An unknown kind is reported before the claim is looked up.
    if DocumentKind::from_api_name(&kind).is_none() {
        return Err(ClaimError::UnknownDocumentKind(kind).into());
    }
    let id = parse_claim_id(&id)?;
    let url = state.lifecycle.get_download_url(id, &kind).await?;
    Ok(Json(DownloadResponse { url }))
}

/// `DELETE /claims/:id`
pub async fn delete_claim(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_claim_id(&id)?;
    state.lifecycle.remove(id).await?;
    info!(claim_id = %id, actor = %principal.account_id, "Claim deleted via API");
    Ok(Json(DeleteResponse { deleted: true, id }))
}

/// A malformed id cannot name an existing claim.
fn parse_claim_id(raw: &str) -> Result<ClaimId, ApiError> {
    ClaimId::parse_str(raw.trim())
        .map_err(|_| ApiError::not_found(format!("Claim not found: {raw}")))
}

fn parse_status(raw: &str) -> Result<ClaimStatus, ApiError> {
    ClaimStatus::parse(raw).ok_or_else(|| ClaimError::InvalidStatus(raw.to_string()).into())
}
