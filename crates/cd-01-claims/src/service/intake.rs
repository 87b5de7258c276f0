//! Claim intake pipeline.
//!
//! validate requirements -> validate files -> upload -> persist -> notify.
//! Nothing is uploaded unless every check passes, and nothing is persisted
//! unless every upload succeeded. Blobs already stored when a later step fails
//! are left in place and reported in the log.

use super::ClaimService;
use crate::domain::{
    first_missing, normalize_optional, required_documents, storage_key, Applicant, ApplicantData,
    Claim, ClaimStatus, ClaimSubmission, DocumentFormat, DocumentKind, DocumentSlots,
    Notification, SubmissionReceipt, SuppliedDocument, MAX_DOCUMENT_BYTES,
};
use crate::error::{ClaimError, RepositoryError};
use crate::ports::inbound::ClaimIntakeApi;
use async_trait::async_trait;
use bytes::Bytes;
use futures::future::try_join_all;
use tracing::{error, info, warn};
use uuid::Uuid;

/// One document ready to be written to the blob store.
#[derive(Debug)]
struct PlannedUpload {
    kind: DocumentKind,
    key: String,
    content_type: &'static str,
    bytes: Bytes,
}

#[async_trait]
impl ClaimIntakeApi for ClaimService {
    async fn submit(&self, submission: ClaimSubmission) -> Result<SubmissionReceipt, ClaimError> {
        let ClaimSubmission {
            applicant,
            documents,
        } = submission;

        applicant.check().map_err(ClaimError::InvalidApplicant)?;
        let required = required_documents(applicant.claim_type, applicant.prior_representation);
        let formats = check_documents(&required, &documents)?;

        let uploads = self.plan_uploads(&applicant.national_id, documents, formats);
        self.upload_all(&uploads).await?;

        let slots = DocumentSlots::from_keys(uploads.into_iter().map(|u| (u.kind, u.key)))
            .ok_or(ClaimError::MissingDocument(DocumentKind::Identity))?;
        let claim = self.insert_with_unique_code(self.build_claim(applicant, slots)).await?;

        info!(
            claim_id = %claim.id,
            tracking_code = %claim.tracking_code,
            claim_type = %claim.claim_type,
            documents = claim.documents.present().len(),
            "Claim received"
        );
        self.notify_intake(&claim);

        Ok(SubmissionReceipt {
            claim_id: claim.id,
            tracking_code: claim.tracking_code,
        })
    }
}

impl ClaimService {
    fn plan_uploads(
        &self,
        national_id: &str,
        documents: Vec<SuppliedDocument>,
        formats: Vec<DocumentFormat>,
    ) -> Vec<PlannedUpload> {
        let submitted_at = self.clock.now();
        let mut rng = rand::thread_rng();
        documents
            .into_iter()
            .zip(formats)
            .map(|(doc, format)| {
                let extension = storage_key::extension_for(doc.file_name.as_deref(), format);
                let nonce = storage_key::random_nonce(&mut rng);
                PlannedUpload {
                    kind: doc.kind,
                    key: storage_key::derive(doc.kind, national_id, submitted_at, &nonce, &extension),
                    content_type: format.mime_type(),
                    bytes: doc.bytes,
                }
            })
            .collect()
    }

    /// Upload concurrently; the first failure aborts the rest.
    async fn upload_all(&self, uploads: &[PlannedUpload]) -> Result<(), ClaimError> {
        let puts = uploads
            .iter()
            .map(|u| self.blobs.put(&u.key, u.bytes.clone(), u.content_type));
        if let Err(e) = try_join_all(puts).await {
            error!(
                error = %e,
                planned = uploads.len(),
                "Document upload failed, submission aborted; blobs stored so far are orphaned"
            );
            return Err(ClaimError::Storage(e));
        }
        Ok(())
    }

    async fn insert_with_unique_code(&self, mut claim: Claim) -> Result<Claim, ClaimError> {
        let attempts = self.config.max_code_attempts.max(1);
        for attempt in 1..=attempts {
            if attempt > 1 {
                claim.tracking_code = self.codes.next_code();
            }
            match self.repository.insert(claim.clone()).await {
                Ok(()) => return Ok(claim),
                Err(RepositoryError::DuplicateTrackingCode(code)) => {
                    warn!(attempt, tracking_code = %code, "Tracking code collision, regenerating");
                }
                Err(e) => {
                    error!(
                        claim_id = %claim.id,
                        error = %e,
                        "Failed to persist claim; uploaded documents are orphaned"
                    );
                    return Err(ClaimError::Persistence(e));
                }
            }
        }
        error!(
            claim_id = %claim.id,
            attempts,
            "Tracking code space exhausted; uploaded documents are orphaned"
        );
        Err(ClaimError::TrackingCodeExhausted { attempts })
    }

    fn build_claim(&self, applicant: ApplicantData, documents: DocumentSlots) -> Claim {
        let keep_narrative = applicant.claim_type.keeps_work_narrative();
        let narrative = |value: Option<String>| {
            if keep_narrative {
                normalize_optional(value)
            } else {
                None
            }
        };
        Claim {
            id: Uuid::new_v4(),
            tracking_code: self.codes.next_code(),
            applicant: Applicant {
                name: applicant.name.trim().to_string(),
                national_id: applicant.national_id,
                email: applicant.email.trim().to_string(),
            },
            claim_type: applicant.claim_type,
            claim_subtype: normalize_optional(applicant.claim_subtype),
            work_schedule: narrative(applicant.work_schedule),
            work_address: narrative(applicant.work_address),
            commute_route: narrative(applicant.commute_route),
            prior_representation: applicant.prior_representation,
            documents,
            status: ClaimStatus::Received,
            created_at: self.clock.now(),
        }
    }

    fn notify_intake(&self, claim: &Claim) {
        self.notifications.dispatch(Notification::ClaimReceived {
            to: claim.applicant.email.clone(),
            applicant_name: claim.applicant.name.clone(),
            tracking_code: claim.tracking_code.clone(),
        });
        self.notifications.dispatch(Notification::NewClaimAlert {
            to: self.config.operations_email.clone(),
            applicant_name: claim.applicant.name.clone(),
            national_id: claim.applicant.national_id.clone(),
            claim_type: claim.claim_type,
            tracking_code: claim.tracking_code.clone(),
        });
    }
}

/// Requirement and per-file gate. Returns the parsed format of each document,
/// in input order.
fn check_documents(
    required: &[DocumentKind],
    documents: &[SuppliedDocument],
) -> Result<Vec<DocumentFormat>, ClaimError> {
    let supplied: Vec<DocumentKind> = documents.iter().map(|d| d.kind).collect();
    if let Some(missing) = first_missing(required, &supplied) {
        return Err(ClaimError::MissingDocument(missing));
    }

    let mut formats = Vec::with_capacity(documents.len());
    for (index, doc) in documents.iter().enumerate() {
        if supplied[..index].contains(&doc.kind) {
            return Err(ClaimError::DuplicateDocument(doc.kind));
        }
        let format = DocumentFormat::from_content_type(&doc.content_type).ok_or_else(|| {
            ClaimError::UnsupportedContentType {
                kind: doc.kind,
                content_type: doc.content_type.clone(),
            }
        })?;
        if doc.bytes.len() > MAX_DOCUMENT_BYTES {
            return Err(ClaimError::DocumentTooLarge {
                kind: doc.kind,
                size: doc.bytes.len(),
                max: MAX_DOCUMENT_BYTES,
            });
        }
        formats.push(format);
    }
    Ok(formats)
}
