//! Claim lookup, status transitions, removal and document retrieval.

use super::ClaimService;
use crate::domain::{Claim, ClaimId, ClaimStatus, DocumentKind, Notification, TrackingCode, TrackingView};
use crate::error::{ClaimError, RepositoryError};
use crate::ports::inbound::ClaimLifecycleApi;
use async_trait::async_trait;
use tracing::{debug, error, info, warn};

#[async_trait]
impl ClaimLifecycleApi for ClaimService {
    async fn lookup_by_tracking_code(&self, code: &str) -> Result<TrackingView, ClaimError> {
        let code = TrackingCode::from_input(code);
        self.repository
            .find_by_tracking_code(&code)
            .await
            .map_err(|e| self.persistence_failure("lookup_by_tracking_code", e))?
            .map(|claim| claim.tracking_view())
            .ok_or_else(|| ClaimError::TrackingCodeNotFound(code.to_string()))
    }

    async fn list_all(&self, status: Option<ClaimStatus>) -> Result<Vec<Claim>, ClaimError> {
        let claims = self
            .repository
            .list(status)
            .await
            .map_err(|e| self.persistence_failure("list_all", e))?;
        debug!(count = claims.len(), status = ?status, "Listed claims");
        Ok(claims)
    }

    async fn get_by_id(&self, id: ClaimId) -> Result<Claim, ClaimError> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(|e| self.persistence_failure("get_by_id", e))?
            .ok_or(ClaimError::ClaimNotFound(id))
    }

    async fn update_status(&self, id: ClaimId, status: ClaimStatus) -> Result<Claim, ClaimError> {
        let claim = self
            .repository
            .update_status(id, status)
            .await
            .map_err(|e| self.persistence_failure("update_status", e))?
            .ok_or(ClaimError::ClaimNotFound(id))?;

        info!(
            claim_id = %claim.id,
            tracking_code = %claim.tracking_code,
            status = %status,
            "Claim status updated"
        );
        self.notifications.dispatch(Notification::StatusChanged {
            to: claim.applicant.email.clone(),
            applicant_name: claim.applicant.name.clone(),
            tracking_code: claim.tracking_code.clone(),
            status,
        });
        Ok(claim)
    }

    async fn remove(&self, id: ClaimId) -> Result<(), ClaimError> {
        let claim = self.get_by_id(id).await?;
        let deleted = self
            .repository
            .delete(id)
            .await
            .map_err(|e| self.persistence_failure("remove", e))?;
        if !deleted {
            return Err(ClaimError::ClaimNotFound(id));
        }

        let retained: Vec<&str> = claim.documents.present().into_iter().map(|(_, key)| key).collect();
        warn!(
            claim_id = %id,
            tracking_code = %claim.tracking_code,
            retained_documents = ?retained,
            "Claim deleted; its stored documents are retained"
        );
        Ok(())
    }

    async fn get_download_url(&self, id: ClaimId, kind: &str) -> Result<String, ClaimError> {
        let kind = DocumentKind::from_api_name(kind)
            .ok_or_else(|| ClaimError::UnknownDocumentKind(kind.to_string()))?;
        let claim = self.get_by_id(id).await?;
        let key = claim
            .documents
            .get(kind)
            .ok_or(ClaimError::DocumentNotFound { claim_id: id, kind })?;

        let url = self
            .blobs
            .signed_url(key, self.config.download_url_ttl)
            .await
            .map_err(|e| {
                error!(claim_id = %id, kind = kind.api_name(), error = %e, "Failed to sign download URL");
                ClaimError::Storage(e)
            })?;
        info!(claim_id = %id, kind = kind.api_name(), "Issued document download URL");
        Ok(url)
    }
}

impl ClaimService {
    fn persistence_failure(&self, operation: &'static str, e: RepositoryError) -> ClaimError {
        error!(operation, error = %e, "Claim repository failure");
        ClaimError::Persistence(e)
    }
}
