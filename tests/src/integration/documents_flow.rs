//! # Documents Flow
//!
//! Stored documents, signed download links and the `/files` route.

#[cfg(test)]
mod tests {
    use crate::harness::{body_bytes, json_body, start, MultipartForm, TestDesk, PUBLIC_BASE_URL};
    use axum::http::{header, StatusCode};

    /// Id of the only claim, and a download URL for `kind`.
    async fn download_url(desk: &TestDesk, token: &str, kind: &str) -> (String, axum::response::Response) {
        let id = desk.list_claims(token).await[0]["id"]
            .as_str()
            .unwrap()
            .to_string();
        let response = desk
            .get(&format!("/claims/{id}/download/{kind}"), Some(token))
            .await;
        (id, response)
    }

    #[tokio::test]
    async fn test_signed_link_serves_the_uploaded_bytes() {
        let (_dir, desk) = start().await;
        let form = MultipartForm::applicant("Medical")
            .pdf("identityDocument", b"%PDF-identity")
            .file("medicalClearance", "clearance.PNG", "image/png", b"\x89PNG-medical");
        desk.submit(form).await;
        let token = desk.login().await;

        let (_id, response) = download_url(&desk, &token, "MEDICAL_CLEARANCE").await;
        assert_eq!(response.status(), StatusCode::OK);
        let url = json_body(response).await["url"].as_str().unwrap().to_string();
        assert!(url.starts_with(&format!("{PUBLIC_BASE_URL}/files/medical/30111222-medical-")));
        assert!(url.contains(".png?expires="));
        assert!(url.contains("&signature="));

        // The link works without a bearer token.
        let path = url.strip_prefix(PUBLIC_BASE_URL).unwrap();
        let response = desk.get(path, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(body_bytes(response).await, b"\x89PNG-medical");
    }

    #[tokio::test]
    async fn test_documents_land_under_the_data_directory() {
        let (_dir, desk) = start().await;
        desk.submit(MultipartForm::medical()).await;
        let token = desk.login().await;

        let claim = &desk.list_claims(&token).await[0];
        let key = claim["documents"]["identityDocumentKey"].as_str().unwrap();
        assert!(key.starts_with("identity/30111222-identity-"));
        assert!(key.ends_with(".pdf"));
        let stored = std::fs::read(desk.data_dir().join("blobs").join(key)).unwrap();
        assert_eq!(stored, b"%PDF-identity");
        assert!(claim["documents"]["formAKey"].is_null());
    }

    #[tokio::test]
    async fn test_tampered_link_is_forbidden() {
        let (_dir, desk) = start().await;
        desk.submit(MultipartForm::medical()).await;
        let token = desk.login().await;

        let (_id, response) = download_url(&desk, &token, "identity").await;
        let url = json_body(response).await["url"].as_str().unwrap().to_string();
        let path = url.strip_prefix(PUBLIC_BASE_URL).unwrap();

        let (file_path, query) = path.split_once('?').unwrap();
        let response = desk.get(file_path, None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Same signature presented for another document.
        let other = file_path.replace("identity", "medical");
        let response = desk.get(&format!("{other}?{query}"), None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let (prefix, _) = query.split_once("&signature=").unwrap();
        let forged = format!("{file_path}?{prefix}&signature={}", "0".repeat(64));
        let response = desk.get(&forged, None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_download_errors() {
        let (_dir, desk) = start().await;
        desk.submit(MultipartForm::medical()).await;
        let token = desk.login().await;

        let (id, response) = download_url(&desk, &token, "form_a").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = desk
            .get(&format!("/claims/{id}/download/passport"), Some(&token))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Unknown kind is reported even for an unknown claim.
        let response = desk
            .get("/claims/not-a-uuid/download/passport", Some(&token))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
