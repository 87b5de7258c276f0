//! # Intake Flow
//!
//! Public submission through `POST /claims`, public tracking, and the
//! notifications intake produces.

#[cfg(test)]
mod tests {
    use crate::harness::{
        json_body, start, MultipartForm, APPLICANT_EMAIL, OPERATIONS_EMAIL,
    };
    use axum::http::StatusCode;
    use cd_01_claims::{ClaimType, Notification};

    #[tokio::test]
    async fn test_submission_is_trackable_and_notifies_both_parties() {
        let (_dir, desk) = start().await;

        let code = desk.submit(MultipartForm::medical()).await;
        assert_eq!(code.len(), 8);
        assert!(code
            .chars()
            .all(|c| "23456789ABCDEFGHJKMNPQRSTUVWXYZ".contains(c)));

        let response = desk.get(&format!("/claims/track/{code}"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let view = json_body(response).await;
        assert_eq!(view["trackingCode"], code.as_str());
        assert_eq!(view["status"], "Received");
        assert!(view["createdAt"].is_string());
        assert_eq!(view.as_object().unwrap().len(), 3);

        let sent = desk.notifications(2).await;
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().any(|n| matches!(
            n,
            Notification::ClaimReceived { to, tracking_code, .. }
                if to == APPLICANT_EMAIL && tracking_code.as_str() == code
        )));
        assert!(sent.iter().any(|n| matches!(
            n,
            Notification::NewClaimAlert { to, claim_type: ClaimType::Medical, national_id, .. }
                if to == OPERATIONS_EMAIL && national_id == "30111222"
        )));
    }

    #[tokio::test]
    async fn test_tracking_is_case_insensitive() {
        let (_dir, desk) = start().await;
        let code = desk.submit(MultipartForm::medical()).await;

        let path = format!("/CLAIMS/Track/{}", code.to_lowercase());
        let response = desk.get(&path, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["trackingCode"], code.as_str());
    }

    #[tokio::test]
    async fn test_unknown_tracking_code_is_404() {
        let (_dir, desk) = start().await;
        let response = desk.get("/claims/track/ZZZZ9999", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["statusCode"], 404);
    }

    #[tokio::test]
    async fn test_missing_required_document_stores_nothing() {
        let (_dir, desk) = start().await;
        let form = MultipartForm::applicant("Incapacity")
            .pdf("identityDocument", b"%PDF")
            .pdf("medicalClearance", b"%PDF")
            .pdf("incomeProof", b"%PDF")
            .pdf("formA", b"%PDF");

        let response = desk.send(form.into_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("Missing required document"));

        let token = desk.login().await;
        assert!(desk.list_claims(&token).await.is_empty());
        assert!(std::fs::read_dir(desk.data_dir().join("blobs"))
            .unwrap()
            .next()
            .is_none());
        assert!(desk.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_prior_representation_requires_revocation_letter() {
        let (_dir, desk) = start().await;

        let without_letter = MultipartForm::medical().text("priorRepresentation", "true");
        let response = desk.send(without_letter.into_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["message"]
            .as_str()
            .unwrap()
            .contains("revocation letter"));

        let with_letter = MultipartForm::medical()
            .text("priorRepresentation", "true")
            .pdf("revocationLetter", b"%PDF-revocation");
        desk.submit(with_letter).await;
    }

    #[tokio::test]
    async fn test_rejected_uploads() {
        let (_dir, desk) = start().await;

        let wrong_type = MultipartForm::applicant("Other").file(
            "identityDocument",
            "id.txt",
            "text/plain",
            b"plain text",
        );
        let response = desk.send(wrong_type.into_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let oversized = vec![0u8; 5 * 1024 * 1024 + 1];
        let too_large = MultipartForm::applicant("Other").file(
            "identityDocument",
            "id.png",
            "image/png",
            &oversized,
        );
        let response = desk.send(too_large.into_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["message"]
            .as_str()
            .unwrap()
            .contains("too large"));

        let unexpected = MultipartForm::medical().text("isAdmin", "true");
        let response = desk.send(unexpected.into_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let token = desk.login().await;
        assert!(desk.list_claims(&token).await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_applicant_fields() {
        let (_dir, desk) = start().await;
        let bad_id = MultipartForm::new()
            .text("name", "Ana Perez")
            .text("nationalId", "12-34")
            .text("email", APPLICANT_EMAIL)
            .pdf("identityDocument", b"%PDF");
        let response = desk.send(bad_id.into_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
