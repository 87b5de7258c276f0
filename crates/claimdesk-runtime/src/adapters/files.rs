//! `GET /files/*key`: serves documents behind signed download links.
//!
//! Public tier; the signature in the query string is the credential.

use super::fs_blob::{content_type_for_key, FsBlobStore};
use super::signing::SignatureRejection;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use cd_01_claims::BlobStoreError;
use cd_03_api_gateway::ApiError;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, warn};

#[derive(Debug, Deserialize)]
pub struct LinkQuery {
    pub expires: Option<i64>,
    pub signature: Option<String>,
}

/// Routes to merge into the gateway router.
pub fn files_router(store: Arc<FsBlobStore>) -> Router {
    Router::new()
        .route("/files/*key", get(serve_file))
        .with_state(store)
}

async fn serve_file(
    State(store): State<Arc<FsBlobStore>>,
    Path(key): Path<String>,
    Query(link): Query<LinkQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(expires), Some(signature)) = (link.expires, link.signature) else {
        return Err(ApiError::forbidden("Missing download signature"));
    };

    if let Err(rejection) = store.verify_link(&key, expires, &signature) {
        warn!(key = %key, ?rejection, "Download link refused");
        return Err(match rejection {
            SignatureRejection::Expired => ApiError::forbidden("Download link has expired"),
            SignatureRejection::Malformed | SignatureRejection::Mismatch => {
                ApiError::forbidden("Invalid download signature")
            }
        });
    }

    let bytes = store.read(&key).await.map_err(|err| match err {
        BlobStoreError::NotFound(_) | BlobStoreError::InvalidKey(_) => {
            ApiError::not_found(format!("File not found: {key}"))
        }
        other => {
            error!(key = %key, error = %other, "Failed to read stored document");
            ApiError::internal()
        }
    })?;

    debug!(key = %key, size = bytes.len(), "Serving document");
    Ok((
        [
            (header::CONTENT_TYPE, content_type_for_key(&key)),
            (header::CACHE_CONTROL, "private, no-store"),
        ],
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::signing::UrlSigner;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use bytes::Bytes;
    use cd_01_claims::BlobStore;
    use http_body_util::BodyExt;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const KEY: &str = "income/30111222-income-1700000000123-a1b2c3.png";

    async fn setup(dir: &TempDir) -> (Arc<FsBlobStore>, Router) {
        let store = Arc::new(
            FsBlobStore::open(dir.path(), "http://localhost:3000", UrlSigner::new("k").unwrap())
                .await
                .unwrap(),
        );
        let router = files_router(store.clone());
        (store, router)
    }

    fn path_and_query(url: &str) -> &str {
        url.strip_prefix("http://localhost:3000").unwrap()
    }

    async fn get(router: Router, uri: &str) -> axum::response::Response {
        router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_link_serves_bytes() {
        let dir = TempDir::new().unwrap();
        let (store, router) = setup(&dir).await;
        store.put(KEY, Bytes::from_static(b"\x89PNG"), "image/png").await.unwrap();
        let url = store.signed_url(KEY, Duration::from_secs(60)).await.unwrap();

        let response = get(router, path_and_query(&url)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"\x89PNG");
    }

    #[tokio::test]
    async fn test_tampered_or_unsigned_link_forbidden() {
        let dir = TempDir::new().unwrap();
        let (store, router) = setup(&dir).await;
        store.put(KEY, Bytes::from_static(b"x"), "image/png").await.unwrap();
        let url = store.signed_url(KEY, Duration::from_secs(60)).await.unwrap();
        let tampered = path_and_query(&url).replace("expires=", "expires=9");

        let response = get(router.clone(), &tampered).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = get(router, &format!("/files/{KEY}")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_expired_link_forbidden() {
        let dir = TempDir::new().unwrap();
        let (store, router) = setup(&dir).await;
        store.put(KEY, Bytes::from_static(b"x"), "image/png").await.unwrap();
        let signer = UrlSigner::new("k").unwrap();
        let expires = chrono::Utc::now().timestamp() - 10;
        let uri = format!(
            "/files/{KEY}?expires={expires}&signature={}",
            signer.sign(KEY, expires)
        );

        let response = get(router, &uri).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Download link has expired");
    }

    #[tokio::test]
    async fn test_signed_link_to_missing_blob_is_not_found() {
        let dir = TempDir::new().unwrap();
        let (_store, router) = setup(&dir).await;
        let signer = UrlSigner::new("k").unwrap();
        let expires = chrono::Utc::now().timestamp() + 60;
        let uri = format!(
            "/files/{KEY}?expires={expires}&signature={}",
            signer.sign(KEY, expires)
        );

        let response = get(router, &uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
