//! # Back-Office Flow
//!
//! Staff login, the authorization boundary, listing, status changes and
//! deletion.

#[cfg(test)]
mod tests {
    use crate::harness::{json_body, json_request, start, MultipartForm, ADMIN_EMAIL};
    use axum::http::{header, Method, StatusCode};
    use cd_01_claims::{ClaimStatus, Notification};
    use serde_json::json;

    #[tokio::test]
    async fn test_protected_routes_require_a_valid_token() {
        let (_dir, desk) = start().await;
        let id = uuid_like();

        for (method, uri) in [
            (Method::GET, "/claims".to_string()),
            (Method::GET, format!("/claims/{id}")),
            (Method::PATCH, format!("/claims/{id}")),
            (Method::DELETE, format!("/claims/{id}")),
            (Method::GET, format!("/claims/{id}/download/identity")),
        ] {
            let response = desk.send(json_request(method.clone(), &uri, None, None)).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");

            let response = desk
                .send(json_request(method.clone(), &uri, Some("not-a-token"), None))
                .await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (_dir, desk) = start().await;

        let mut messages = Vec::new();
        for (email, password) in [
            (ADMIN_EMAIL, "wrong-password"),
            ("nobody@studio.test", "correct-horse-battery"),
        ] {
            let response = desk
                .send(json_request(
                    Method::POST,
                    "/auth/login",
                    None,
                    Some(json!({ "email": email, "password": password })),
                ))
                .await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            messages.push(json_body(response).await["message"].clone());
        }
        assert_eq!(messages[0], messages[1]);
    }

    #[tokio::test]
    async fn test_list_filter_and_status_change() {
        let (_dir, desk) = start().await;
        let first = desk.submit(MultipartForm::medical()).await;
        let second = desk.submit(MultipartForm::medical()).await;
        let token = desk.login().await;

        let claims = desk.list_claims(&token).await;
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0]["trackingCode"], second.as_str());
        assert_eq!(claims[1]["trackingCode"], first.as_str());
        assert_eq!(claims[0]["applicant"]["nationalId"], "30111222");
        assert!(claims[0]["documents"]["identityDocumentKey"].is_string());

        let id = claims[1]["id"].as_str().unwrap().to_string();
        let response = desk
            .send(json_request(
                Method::PATCH,
                &format!("/claims/{id}"),
                Some(&token),
                Some(json!({ "status": "in_process" })),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = json_body(response).await;
        assert_eq!(updated["status"], "In Process");
        assert_eq!(updated["trackingCode"], first.as_str());

        let response = desk
            .get("/claims?status=In%20Process", Some(&token))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let filtered = json_body(response).await;
        assert_eq!(filtered.as_array().unwrap().len(), 1);
        assert_eq!(filtered[0]["id"], id.as_str());

        let response = desk.get(&format!("/claims/track/{first}"), None).await;
        assert_eq!(json_body(response).await["status"], "In Process");

        // Two intake messages per claim, then the status update.
        let sent = desk.notifications(5).await;
        assert!(sent.iter().any(|n| matches!(
            n,
            Notification::StatusChanged { status: ClaimStatus::InProcess, tracking_code, .. }
                if tracking_code.as_str() == first
        )));
    }

    #[tokio::test]
    async fn test_invalid_status_values() {
        let (_dir, desk) = start().await;
        desk.submit(MultipartForm::medical()).await;
        let token = desk.login().await;
        let id = desk.list_claims(&token).await[0]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = desk
            .send(json_request(
                Method::PATCH,
                &format!("/claims/{id}"),
                Some(&token),
                Some(json!({ "status": "Archived" })),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = desk.get("/claims?status=archived", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids_are_404() {
        let (_dir, desk) = start().await;
        let token = desk.login().await;

        for uri in [format!("/claims/{}", uuid_like()), "/claims/not-a-uuid".to_string()] {
            let response = desk.get(&uri, Some(&token)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }

        let response = desk
            .send(json_request(
                Method::PATCH,
                &format!("/claims/{}", uuid_like()),
                Some(&token),
                Some(json!({ "status": "Finalized" })),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_removes_the_claim() {
        let (_dir, desk) = start().await;
        let code = desk.submit(MultipartForm::medical()).await;
        let token = desk.login().await;
        let id = desk.list_claims(&token).await[0]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = desk
            .send(json_request(
                Method::DELETE,
                &format!("/claims/{id}"),
                Some(&token),
                None,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["deleted"], true);
        assert_eq!(body["id"], id.as_str());

        let response = desk.get(&format!("/claims/{id}"), Some(&token)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = desk.get(&format!("/claims/track/{code}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = desk
            .send(json_request(
                Method::DELETE,
                &format!("/claims/{id}"),
                Some(&token),
                None,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    fn uuid_like() -> String {
        "5f0c7a3e-2b1d-4c8e-9a6f-0d4e3b2a1c9f".to_string()
    }
}
