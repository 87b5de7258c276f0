use super::*;
use crate::adapters::{
    InMemoryBlobStore, InMemoryClaimRepository, ManualClock, RecordingNotifier,
    ScriptedTrackingCodeSource,
};
use crate::domain::{
    Applicant, ApplicantData, Claim, ClaimStatus, ClaimSubmission, ClaimType, DocumentKind,
    DocumentSlots, Notification, SuppliedDocument, TrackingCode, MAX_DOCUMENT_BYTES,
};
use crate::error::ClaimError;
use crate::ports::inbound::{ClaimIntakeApi, ClaimLifecycleApi};
use crate::ports::outbound::ClaimRepository;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use std::time::Duration as StdDuration;
use uuid::Uuid;

const OPS: &str = "ops@studio.test";
const WAIT: StdDuration = StdDuration::from_secs(2);

struct Harness {
    service: ClaimService,
    repo: Arc<InMemoryClaimRepository>,
    blobs: Arc<InMemoryBlobStore>,
    notifier: Arc<RecordingNotifier>,
    clock: Arc<ManualClock>,
}

fn harness() -> Harness {
    harness_with(RecordingNotifier::new(), InMemoryClaimRepository::new(), Vec::<&str>::new())
}

fn harness_with(
    notifier: RecordingNotifier,
    repo: InMemoryClaimRepository,
    codes: Vec<&str>,
) -> Harness {
    let repo = Arc::new(repo);
    let blobs = Arc::new(InMemoryBlobStore::new());
    let notifier = Arc::new(notifier);
    let clock = Arc::new(ManualClock::new(
        Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
    ));
    let (dispatcher, _worker) = NotificationDispatcher::spawn(notifier.clone(), 64);
    let config = IntakeConfig {
        operations_email: OPS.to_string(),
        ..IntakeConfig::default()
    };
    let service = ClaimService::new(repo.clone(), blobs.clone(), dispatcher, config)
        .with_clock(clock.clone())
        .with_code_source(Arc::new(ScriptedTrackingCodeSource::new(codes)));
    Harness {
        service,
        repo,
        blobs,
        notifier,
        clock,
    }
}

fn applicant(claim_type: ClaimType, prior_representation: bool) -> ApplicantData {
    ApplicantData {
        name: "Lucía Fernández".into(),
        national_id: "30111222".into(),
        email: "lucia@example.com".into(),
        claim_type,
        claim_subtype: None,
        work_schedule: Some("08:00-17:00".into()),
        work_address: Some("Av. Siempre Viva 742".into()),
        commute_route: Some("Line B subway".into()),
        prior_representation,
    }
}

fn pdf(kind: DocumentKind) -> SuppliedDocument {
    SuppliedDocument {
        kind,
        file_name: Some(format!("{}.pdf", kind.api_name())),
        content_type: "application/pdf".into(),
        bytes: Bytes::from_static(b"%PDF-1.7 test"),
    }
}

fn submission(applicant: ApplicantData, kinds: &[DocumentKind]) -> ClaimSubmission {
    ClaimSubmission {
        applicant,
        documents: kinds.iter().map(|k| pdf(*k)).collect(),
    }
}

fn seeded_claim(code: &str) -> Claim {
    Claim {
        id: Uuid::new_v4(),
        tracking_code: TrackingCode::from_input(code),
        applicant: Applicant {
            name: "Existing Person".into(),
            national_id: "20111222".into(),
            email: "existing@example.com".into(),
        },
        claim_type: ClaimType::Other,
        claim_subtype: None,
        work_schedule: None,
        work_address: None,
        commute_route: None,
        prior_representation: false,
        documents: DocumentSlots::from_keys(vec![(DocumentKind::Identity, "identity/x.pdf".into())])
            .unwrap(),
        status: ClaimStatus::Received,
        created_at: Utc::now(),
    }
}

const MEDICAL: &[DocumentKind] = &[DocumentKind::Identity, DocumentKind::MedicalClearance];

// -----------------------------------------------------------------------------
// Intake
// -----------------------------------------------------------------------------

#[tokio::test]
async fn test_medical_submission_succeeds() {
    let h = harness();
    let receipt = h
        .service
        .submit(submission(applicant(ClaimType::Medical, false), MEDICAL))
        .await
        .unwrap();

    assert!(receipt.tracking_code.is_well_formed());
    assert_eq!(h.blobs.put_calls(), 2);

    let view = h
        .service
        .lookup_by_tracking_code(receipt.tracking_code.as_str())
        .await
        .unwrap();
    assert_eq!(view.status, ClaimStatus::Received);

    let claim = h.service.get_by_id(receipt.claim_id).await.unwrap();
    assert!(claim.documents.get(DocumentKind::MedicalClearance).is_some());
    assert!(claim.documents.get(DocumentKind::FormA).is_none());
    for (_, key) in claim.documents.present() {
        assert!(h.blobs.get(key).is_some(), "slot {key} has no blob");
    }
}

#[tokio::test]
async fn test_intake_sends_confirmation_and_alert() {
    let h = harness();
    let receipt = h
        .service
        .submit(submission(applicant(ClaimType::Medical, false), MEDICAL))
        .await
        .unwrap();

    let sent = h.notifier.wait_for(2, WAIT).await;
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().any(|n| matches!(n,
        Notification::ClaimReceived { to, tracking_code, .. }
            if to == "lucia@example.com" && *tracking_code == receipt.tracking_code)));
    assert!(sent.iter().any(|n| matches!(n,
        Notification::NewClaimAlert { to, national_id, claim_type, .. }
            if to == OPS && national_id == "30111222" && *claim_type == ClaimType::Medical)));
}

#[tokio::test]
async fn test_incapacity_missing_form_b_uploads_nothing() {
    let h = harness();
    let err = h
        .service
        .submit(submission(
            applicant(ClaimType::Incapacity, false),
            &[
                DocumentKind::Identity,
                DocumentKind::MedicalClearance,
                DocumentKind::IncomeProof,
                DocumentKind::FormA,
            ],
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, ClaimError::MissingDocument(DocumentKind::FormB)));
    assert!(err.to_string().contains("form B"));
    assert_eq!(h.blobs.put_calls(), 0);
    assert!(h.repo.is_empty());
}

#[tokio::test]
async fn test_prior_representation_requires_revocation_letter() {
    let h = harness();
    let err = h
        .service
        .submit(submission(
            applicant(ClaimType::Rejection, true),
            &[
                DocumentKind::Identity,
                DocumentKind::FormalNotice,
                DocumentKind::IncomeProof,
                DocumentKind::FormA,
                DocumentKind::FormB,
            ],
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, ClaimError::MissingDocument(DocumentKind::RevocationLetter)));
    assert_eq!(h.blobs.put_calls(), 0);
}

#[tokio::test]
async fn test_bad_content_type_on_optional_document_blocks_all_uploads() {
    let h = harness();
    let mut sub = submission(applicant(ClaimType::Medical, false), MEDICAL);
    sub.documents.push(SuppliedDocument {
        kind: DocumentKind::FormA,
        file_name: Some("form.gif".into()),
        content_type: "image/gif".into(),
        bytes: Bytes::from_static(b"GIF89a"),
    });

    let err = h.service.submit(sub).await.unwrap_err();
    assert!(matches!(
        err,
        ClaimError::UnsupportedContentType { kind: DocumentKind::FormA, .. }
    ));
    assert_eq!(h.blobs.put_calls(), 0);
    assert!(h.repo.is_empty());
}

#[tokio::test]
async fn test_size_limit_is_inclusive() {
    let h = harness();
    let mut sub = submission(applicant(ClaimType::Other, false), &[DocumentKind::Identity]);
    sub.documents[0].bytes = Bytes::from(vec![0u8; MAX_DOCUMENT_BYTES]);
    assert!(h.service.submit(sub.clone()).await.is_ok());

    sub.documents[0].bytes = Bytes::from(vec![0u8; MAX_DOCUMENT_BYTES + 1]);
    let uploads_before = h.blobs.put_calls();
    let err = h.service.submit(sub).await.unwrap_err();
    assert!(matches!(
        err,
        ClaimError::DocumentTooLarge { kind: DocumentKind::Identity, size, .. } if size == MAX_DOCUMENT_BYTES + 1
    ));
    assert_eq!(h.blobs.put_calls(), uploads_before);
}

#[tokio::test]
async fn test_duplicate_document_rejected() {
    let h = harness();
    let sub = submission(
        applicant(ClaimType::Other, false),
        &[DocumentKind::Identity, DocumentKind::Identity],
    );
    let err = h.service.submit(sub).await.unwrap_err();
    assert!(matches!(err, ClaimError::DuplicateDocument(DocumentKind::Identity)));
    assert_eq!(h.blobs.put_calls(), 0);
}

#[tokio::test]
async fn test_invalid_applicant_rejected_before_uploads() {
    let h = harness();
    let mut data = applicant(ClaimType::Medical, false);
    data.national_id = "12AB".into();
    let err = h.service.submit(submission(data, MEDICAL)).await.unwrap_err();
    assert!(matches!(err, ClaimError::InvalidApplicant(ref msg) if msg.contains("nationalId")));
    assert_eq!(h.blobs.put_calls(), 0);
}

#[tokio::test]
async fn test_upload_failure_persists_nothing() {
    let h = harness();
    h.blobs.fail_uploads_with_prefix("medical/");
    let err = h
        .service
        .submit(submission(applicant(ClaimType::Medical, false), MEDICAL))
        .await
        .unwrap_err();

    assert!(matches!(err, ClaimError::Storage(_)));
    assert_eq!(err.category(), crate::error::ErrorCategory::Infrastructure);
    assert!(h.repo.is_empty());
    tokio::time::sleep(StdDuration::from_millis(20)).await;
    assert!(h.notifier.sent().is_empty());
}

#[tokio::test]
async fn test_persistence_failure_leaves_orphaned_blobs() {
    let h = harness();
    h.repo.set_unavailable(true);
    let err = h
        .service
        .submit(submission(applicant(ClaimType::Medical, false), MEDICAL))
        .await
        .unwrap_err();

    assert!(matches!(err, ClaimError::Persistence(_)));
    assert_eq!(h.blobs.keys().len(), 2);
}

#[tokio::test]
async fn test_tracking_code_collision_is_retried() {
    let h = harness_with(
        RecordingNotifier::new(),
        InMemoryClaimRepository::from_claims(vec![seeded_claim("TAKEN222")]),
        vec!["TAKEN222", "FRESH333"],
    );
    let receipt = h
        .service
        .submit(submission(applicant(ClaimType::Medical, false), MEDICAL))
        .await
        .unwrap();

    assert_eq!(receipt.tracking_code.as_str(), "FRESH333");
    assert_eq!(h.repo.len(), 2);
}

#[tokio::test]
async fn test_tracking_code_retries_are_bounded() {
    let h = harness_with(
        RecordingNotifier::new(),
        InMemoryClaimRepository::from_claims(vec![seeded_claim("TAKEN222")]),
        vec!["TAKEN222"; 10],
    );
    let err = h
        .service
        .submit(submission(applicant(ClaimType::Medical, false), MEDICAL))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClaimError::TrackingCodeExhausted { attempts } if attempts == DEFAULT_MAX_CODE_ATTEMPTS
    ));
    assert_eq!(h.repo.len(), 1);
}

#[tokio::test]
async fn test_notifier_failure_does_not_fail_submission() {
    let h = harness_with(
        RecordingNotifier::failing(),
        InMemoryClaimRepository::new(),
        Vec::<&str>::new(),
    );
    let receipt = h
        .service
        .submit(submission(applicant(ClaimType::Medical, false), MEDICAL))
        .await
        .unwrap();

    assert_eq!(h.notifier.wait_for(2, WAIT).await.len(), 2);
    let view = h
        .service
        .lookup_by_tracking_code(receipt.tracking_code.as_str())
        .await
        .unwrap();
    assert_eq!(view.status, ClaimStatus::Received);
}

#[tokio::test]
async fn test_narrative_fields_kept_only_for_rejection() {
    let h = harness();
    let medical = h
        .service
        .submit(submission(applicant(ClaimType::Medical, false), MEDICAL))
        .await
        .unwrap();
    let rejection = h
        .service
        .submit(submission(
            applicant(ClaimType::Rejection, false),
            &[
                DocumentKind::Identity,
                DocumentKind::FormalNotice,
                DocumentKind::IncomeProof,
                DocumentKind::FormA,
                DocumentKind::FormB,
            ],
        ))
        .await
        .unwrap();

    let medical = h.service.get_by_id(medical.claim_id).await.unwrap();
    assert_eq!(medical.work_schedule, None);
    assert_eq!(medical.commute_route, None);

    let rejection = h.service.get_by_id(rejection.claim_id).await.unwrap();
    assert_eq!(rejection.work_schedule.as_deref(), Some("08:00-17:00"));
    assert_eq!(rejection.work_address.as_deref(), Some("Av. Siempre Viva 742"));
}

#[tokio::test]
async fn test_storage_keys_follow_layout() {
    let h = harness();
    let receipt = h
        .service
        .submit(submission(applicant(ClaimType::Medical, false), MEDICAL))
        .await
        .unwrap();
    let claim = h.service.get_by_id(receipt.claim_id).await.unwrap();

    let key = claim.documents.get(DocumentKind::MedicalClearance).unwrap();
    assert!(
        key.starts_with("medical/30111222-medical-1700000000000-"),
        "unexpected key {key}"
    );
    assert!(key.ends_with(".pdf"));
    assert_eq!(
        h.blobs.get(key).unwrap().content_type,
        "application/pdf"
    );
}

#[tokio::test]
async fn test_same_instant_submissions_do_not_collide() {
    let h = harness();
    for _ in 0..2 {
        h.service
            .submit(submission(applicant(ClaimType::Other, false), &[DocumentKind::Identity]))
            .await
            .unwrap();
    }
    assert_eq!(h.blobs.keys().len(), 2);
}

// -----------------------------------------------------------------------------
// Lifecycle
// -----------------------------------------------------------------------------

#[tokio::test]
async fn test_lookup_normalizes_code() {
    let h = harness_with(RecordingNotifier::new(), InMemoryClaimRepository::new(), vec!["QWER2345"]);
    h.service
        .submit(submission(applicant(ClaimType::Medical, false), MEDICAL))
        .await
        .unwrap();

    let view = h.service.lookup_by_tracking_code(" qwer2345 ").await.unwrap();
    assert_eq!(view.tracking_code.as_str(), "QWER2345");

    let err = h.service.lookup_by_tracking_code("ZZZZ9999").await.unwrap_err();
    assert!(matches!(err, ClaimError::TrackingCodeNotFound(_)));
}

#[tokio::test]
async fn test_list_all_newest_first_and_filtered() {
    let h = harness();
    let first = h
        .service
        .submit(submission(applicant(ClaimType::Other, false), &[DocumentKind::Identity]))
        .await
        .unwrap();
    h.clock.advance(chrono::Duration::minutes(5));
    let second = h
        .service
        .submit(submission(applicant(ClaimType::Other, false), &[DocumentKind::Identity]))
        .await
        .unwrap();

    let all = h.service.list_all(None).await.unwrap();
    let ids: Vec<_> = all.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![second.claim_id, first.claim_id]);

    h.service
        .update_status(first.claim_id, ClaimStatus::Finalized)
        .await
        .unwrap();
    let finalized = h.service.list_all(Some(ClaimStatus::Finalized)).await.unwrap();
    assert_eq!(finalized.len(), 1);
    assert_eq!(finalized[0].id, first.claim_id);
}

#[tokio::test]
async fn test_update_status_notifies_every_time() {
    let h = harness();
    let receipt = h
        .service
        .submit(submission(applicant(ClaimType::Medical, false), MEDICAL))
        .await
        .unwrap();

    for _ in 0..2 {
        let claim = h
            .service
            .update_status(receipt.claim_id, ClaimStatus::Finalized)
            .await
            .unwrap();
        assert_eq!(claim.status, ClaimStatus::Finalized);
    }

    let view = h
        .service
        .lookup_by_tracking_code(receipt.tracking_code.as_str())
        .await
        .unwrap();
    assert_eq!(view.status, ClaimStatus::Finalized);

    let sent = h.notifier.wait_for(4, WAIT).await;
    let status_changes: Vec<_> = sent
        .iter()
        .filter(|n| matches!(n, Notification::StatusChanged { .. }))
        .collect();
    assert_eq!(status_changes.len(), 2);
    assert!(status_changes
        .iter()
        .all(|n| n.recipient() == "lucia@example.com"));
}

#[tokio::test]
async fn test_backward_transition_allowed() {
    let h = harness();
    let receipt = h
        .service
        .submit(submission(applicant(ClaimType::Medical, false), MEDICAL))
        .await
        .unwrap();
    h.service
        .update_status(receipt.claim_id, ClaimStatus::Finalized)
        .await
        .unwrap();
    let claim = h
        .service
        .update_status(receipt.claim_id, ClaimStatus::Received)
        .await
        .unwrap();
    assert_eq!(claim.status, ClaimStatus::Received);
}

#[tokio::test]
async fn test_update_status_unknown_claim() {
    let h = harness();
    let id = Uuid::new_v4();
    let err = h
        .service
        .update_status(id, ClaimStatus::InProcess)
        .await
        .unwrap_err();
    assert!(matches!(err, ClaimError::ClaimNotFound(missing) if missing == id));
}

#[tokio::test]
async fn test_remove_keeps_blobs() {
    let h = harness();
    let receipt = h
        .service
        .submit(submission(applicant(ClaimType::Medical, false), MEDICAL))
        .await
        .unwrap();

    h.service.remove(receipt.claim_id).await.unwrap();
    assert!(h.repo.find_by_id(receipt.claim_id).await.unwrap().is_none());
    assert_eq!(h.blobs.keys().len(), 2);

    let err = h.service.remove(receipt.claim_id).await.unwrap_err();
    assert!(matches!(err, ClaimError::ClaimNotFound(_)));
}

#[tokio::test]
async fn test_download_url() {
    let h = harness();
    let receipt = h
        .service
        .submit(submission(applicant(ClaimType::Medical, false), MEDICAL))
        .await
        .unwrap();
    let claim = h.service.get_by_id(receipt.claim_id).await.unwrap();

    let url = h
        .service
        .get_download_url(receipt.claim_id, "Medical_Clearance")
        .await
        .unwrap();
    let key = claim.documents.get(DocumentKind::MedicalClearance).unwrap();
    assert_eq!(url, format!("memory://blobs/{key}?ttl=3600"));
}

#[tokio::test]
async fn test_download_url_failures() {
    let h = harness();
    let receipt = h
        .service
        .submit(submission(applicant(ClaimType::Medical, false), MEDICAL))
        .await
        .unwrap();

    let err = h
        .service
        .get_download_url(Uuid::new_v4(), "passport")
        .await
        .unwrap_err();
    assert!(matches!(err, ClaimError::UnknownDocumentKind(_)));

    let err = h
        .service
        .get_download_url(Uuid::new_v4(), "identity")
        .await
        .unwrap_err();
    assert!(matches!(err, ClaimError::ClaimNotFound(_)));

    let err = h
        .service
        .get_download_url(receipt.claim_id, "form_b")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClaimError::DocumentNotFound { kind: DocumentKind::FormB, .. }
    ));
}
