//! Test instance and request helpers.
//!
//! `TestDesk` runs the real runtime wiring (filesystem blob store, JSON
//! snapshot stores, signed download route) in a temp directory, with a
//! recording notifier in place of the mail provider.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use cd_01_claims::{Notification, RecordingNotifier};
use cd_03_api_gateway::GatewayApp;
use claimdesk_runtime::{RuntimeConfig, ServiceContainer};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@studio.test";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";
pub const OPERATIONS_EMAIL: &str = "ops@studio.test";
pub const PUBLIC_BASE_URL: &str = "http://claims.test";
pub const APPLICANT_EMAIL: &str = "ana@example.com";

const BOUNDARY: &str = "claimdesk-test-boundary";

/// A running instance over one data directory.
pub struct TestDesk {
    pub app: GatewayApp,
    pub notifier: Arc<RecordingNotifier>,
    pub container: ServiceContainer,
    data_dir: PathBuf,
}

impl TestDesk {
    /// Start an instance in `data_dir`, provisioning the admin account.
    pub async fn start_in(data_dir: &Path) -> Self {
        let mut config = RuntimeConfig::default();
        config.storage.data_dir = data_dir.to_path_buf();
        config.storage.public_base_url = PUBLIC_BASE_URL.to_string();
        config.security.password_iterations = 10;
        config.mail.operations_email = OPERATIONS_EMAIL.to_string();
        config.bootstrap.admin_email = Some(ADMIN_EMAIL.to_string());
        config.bootstrap.admin_password = Some(ADMIN_PASSWORD.to_string());

        let notifier = Arc::new(RecordingNotifier::new());
        let container = ServiceContainer::build_with_notifier(config, notifier.clone())
            .await
            .expect("services build");
        container.bootstrap_admin().await.expect("admin bootstrap");
        let app = container.gateway().expect("gateway config").app();

        Self {
            app,
            notifier,
            container,
            data_dir: data_dir.to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Stop this instance and start a fresh one over the same directory.
    pub async fn restart(self) -> Self {
        let data_dir = self.data_dir.clone();
        drop(self.app);
        self.container.shutdown().await;
        Self::start_in(&data_dir).await
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.expect("infallible service")
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        self.send(json_request(Method::GET, uri, token, None)).await
    }

    /// Log in as the bootstrap admin and return the bearer token.
    pub async fn login(&self) -> String {
        let response = self
            .send(json_request(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await["accessToken"]
            .as_str()
            .expect("accessToken")
            .to_string()
    }

    /// Submit `form` and return the tracking code, asserting 201.
    pub async fn submit(&self, form: MultipartForm) -> String {
        let response = self.send(form.into_request()).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await["trackingCode"]
            .as_str()
            .expect("trackingCode")
            .to_string()
    }

    /// Every claim as the back office sees it.
    pub async fn list_claims(&self, token: &str) -> Vec<Value> {
        let response = self.get("/claims", Some(token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        match json_body(response).await {
            Value::Array(claims) => claims,
            other => panic!("expected array, got {other}"),
        }
    }

    /// Wait for `count` notifications to reach the recording notifier.
    pub async fn notifications(&self, count: usize) -> Vec<Notification> {
        self.notifier.wait_for(count, Duration::from_secs(2)).await
    }
}

/// Fresh temp directory plus an instance running in it.
pub async fn start() -> (TempDir, TestDesk) {
    let dir = TempDir::new().expect("temp dir");
    let desk = TestDesk::start_in(dir.path()).await;
    (dir, desk)
}

pub fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("valid request")
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes()
        .to_vec()
}

pub async fn json_body(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("JSON body")
}

/// Builder for `multipart/form-data` submissions to `POST /claims`.
#[derive(Debug, Default, Clone)]
pub struct MultipartForm {
    parts: Vec<Part>,
}

#[derive(Debug, Clone)]
enum Part {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Valid applicant fields for `claim_type`.
    pub fn applicant(claim_type: &str) -> Self {
        Self::new()
            .text("name", "Ana Perez")
            .text("nationalId", "30111222")
            .text("email", APPLICANT_EMAIL)
            .text("claimType", claim_type)
    }

    /// A complete medical claim: identity document plus medical clearance.
    pub fn medical() -> Self {
        Self::applicant("medical")
            .pdf("identityDocument", b"%PDF-identity")
            .pdf("medicalClearance", b"%PDF-medical")
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts.push(Part::Text {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.parts.push(Part::File {
            name: name.to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes: bytes.to_vec(),
        });
        self
    }

    pub fn pdf(self, name: &str, bytes: &[u8]) -> Self {
        let file_name = format!("{name}.pdf");
        self.file(name, &file_name, "application/pdf", bytes)
    }

    pub fn into_request(self) -> Request<Body> {
        let mut body = Vec::new();
        for part in self.parts {
            match part {
                Part::Text { name, value } => body.extend_from_slice(
                    format!(
                        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                    )
                    .as_bytes(),
                ),
                Part::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    body.extend_from_slice(
                        format!(
                            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                             filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(&bytes);
                    body.extend_from_slice(b"\r\n");
                }
            }
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri("/claims")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("valid request")
    }
}
