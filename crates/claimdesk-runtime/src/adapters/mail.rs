//! Transactional email over HTTP.
//!
//! Posts `{"from","to","subject","html"}` JSON with a bearer API key to a
//! Resend-compatible endpoint.

use super::templates::MailTemplates;
use async_trait::async_trait;
use cd_01_claims::{Notification, NotifyError, Notifier};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
/// Longest provider response body kept in an error.
const MAX_ERROR_BODY: usize = 512;

/// Errors building the mail client.
#[derive(Debug, Error)]
pub enum MailSetupError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Serialize)]
struct OutgoingEmail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Notifier delivering rendered emails through the mail provider's API.
pub struct HttpMailNotifier {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
    templates: MailTemplates,
}

impl HttpMailNotifier {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
        templates: MailTemplates,
    ) -> Result<Self, MailSetupError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            from: from.into(),
            templates,
        })
    }
}

#[async_trait]
impl Notifier for HttpMailNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let email = self.templates.render(notification);
        let payload = OutgoingEmail {
            from: &self.from,
            to: notification.recipient(),
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Transport(format!("mail provider timed out: {e}"))
                } else {
                    NotifyError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(
            kind = notification.kind(),
            tracking_code = %notification.tracking_code(),
            "Email accepted by mail provider"
        );
        Ok(())
    }
}
