//! # Persistence Flow
//!
//! Claims, accounts and documents survive a restart over the same data
//! directory.

#[cfg(test)]
mod tests {
    use crate::harness::{body_bytes, json_body, json_request, start, MultipartForm, PUBLIC_BASE_URL};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_state_survives_restart() {
        let (_dir, desk) = start().await;
        let kept = desk.submit(MultipartForm::medical()).await;
        let removed = desk.submit(MultipartForm::medical()).await;
        let token = desk.login().await;

        let claims = desk.list_claims(&token).await;
        let id_of = |code: &str| {
            claims
                .iter()
                .find(|c| c["trackingCode"] == code)
                .and_then(|c| c["id"].as_str())
                .unwrap()
                .to_string()
        };
        let kept_id = id_of(&kept);
        let removed_id = id_of(&removed);

        let response = desk
            .send(json_request(
                Method::PATCH,
                &format!("/claims/{kept_id}"),
                Some(&token),
                Some(json!({ "status": "Finalized" })),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = desk
            .send(json_request(
                Method::DELETE,
                &format!("/claims/{removed_id}"),
                Some(&token),
                None,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        assert!(desk.data_dir().join("claims.json").is_file());
        assert!(desk.data_dir().join("accounts.json").is_file());

        let desk = desk.restart().await;

        // Admin bootstrap found the existing account; the old password works.
        let token = desk.login().await;
        let claims = desk.list_claims(&token).await;
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0]["id"], kept_id.as_str());
        assert_eq!(claims[0]["status"], "Finalized");

        let response = desk.get(&format!("/claims/track/{kept}"), None).await;
        assert_eq!(json_body(response).await["status"], "Finalized");
        let response = desk.get(&format!("/claims/track/{removed}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = desk
            .get(&format!("/claims/{kept_id}/download/identity"), Some(&token))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let url = json_body(response).await["url"].as_str().unwrap().to_string();
        let response = desk
            .get(url.strip_prefix(PUBLIC_BASE_URL).unwrap(), None)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"%PDF-identity");
    }

    #[tokio::test]
    async fn test_tokens_remain_valid_across_restart() {
        let (_dir, desk) = start().await;
        let token = desk.login().await;
        let desk = desk.restart().await;

        let response = desk.get("/claims", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
