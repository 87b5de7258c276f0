//! # Runtime Configuration
//!
//! Unified configuration for the gateway, storage, credentials, mail and
//! admin bootstrap, loaded from `CD_*` environment variables.
//!
//! ## Security Requirements
//!
//! - URL-signing and token secrets MUST NOT keep their development defaults
//!   in production (`validate_for_production`).
//! - All limits and timeouts have sane defaults with override capability.

use cd_02_accounts::{DEFAULT_ITERATIONS, DEFAULT_TOKEN_TTL_SECS};
use cd_03_api_gateway::GatewayConfig;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEV_URL_SIGNING_SECRET: &str = "claimdesk-dev-url-signing-secret";
pub const DEV_TOKEN_SECRET: &str = "claimdesk-dev-token-secret";

/// Shortest secret accepted in production.
pub const MIN_SECRET_LEN: usize = 32;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// Deployment environment.
    pub environment: Environment,
    /// HTTP surface.
    pub gateway: GatewayConfig,
    /// Record and blob storage.
    pub storage: StorageConfig,
    /// Credential settings.
    pub security: SecurityConfig,
    /// Outgoing mail.
    pub mail: MailConfig,
    /// Admin account provisioned at startup.
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root for `claims.json`, `accounts.json` and `blobs/`.
    pub data_dir: PathBuf,
    /// Externally reachable base URL used in signed download links.
    pub public_base_url: String,
    pub url_signing_secret: String,
    pub signed_url_ttl: Duration,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            public_base_url: "http://localhost:3000".to_string(),
            url_signing_secret: DEV_URL_SIGNING_SECRET.to_string(),
            signed_url_ttl: Duration::from_secs(3600),
        }
    }
}

/// Security configuration.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// HS256 key for bearer tokens. MUST NOT be default in production.
    pub token_secret: String,
    pub token_ttl_secs: i64,
    pub password_iterations: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            token_secret: DEV_TOKEN_SECRET.to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            password_iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// Mail configuration. Without an API key mail is only logged.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub from: String,
    /// Recipient of new-claim alerts.
    pub operations_email: String,
    /// Page linked from applicant emails.
    pub tracking_page_url: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.resend.com/emails".to_string(),
            api_key: None,
            from: "ClaimDesk <no-reply@claimdesk.local>".to_string(),
            operations_email: "operations@claimdesk.local".to_string(),
            tracking_page_url: None,
        }
    }
}

/// Admin bootstrap. Skipped unless both email and password are set.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_name: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            admin_email: None,
            admin_password: None,
            admin_name: "Administrator".to_string(),
        }
    }
}

impl BootstrapConfig {
    pub fn is_enabled(&self) -> bool {
        self.admin_email.is_some() && self.admin_password.is_some()
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },

    #[error("Gateway configuration invalid: {0}")]
    Gateway(#[from] cd_03_api_gateway::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("SECURITY VIOLATION: {var} is unset, a development default or shorter than {MIN_SECRET_LEN} bytes")]
    InsecureSecret { var: &'static str },
}

impl RuntimeConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an explicit variable source; unset variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = RuntimeConfig::default();

        if let Some(value) = get("CD_ENVIRONMENT") {
            config.environment = match value.to_ascii_lowercase().as_str() {
                "production" | "prod" => Environment::Production,
                "development" | "dev" => Environment::Development,
                _ => return Err(ConfigError::InvalidValue { var: "CD_ENVIRONMENT", value }),
            };
        }

        if let Some(value) = get("CD_HTTP_HOST") {
            config.gateway.http.host = parse("CD_HTTP_HOST", value)?;
        }
        if let Some(value) = get("CD_HTTP_PORT").or_else(|| get("PORT")) {
            config.gateway.http.port = parse("CD_HTTP_PORT", value)?;
        }
        if let Some(value) = get("CD_MAX_REQUEST_BYTES") {
            config.gateway.limits.max_request_size = parse("CD_MAX_REQUEST_BYTES", value)?;
        }
        if let Some(value) = get("CD_REQUEST_TIMEOUT_SECS") {
            config.gateway.timeouts.request_secs = parse("CD_REQUEST_TIMEOUT_SECS", value)?;
        }
        if let Some(value) = get("CD_CORS_ORIGINS") {
            config.gateway.cors.allowed_origins = value
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        if let Some(value) = get("CD_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(value);
        }
        if let Some(value) = get("CD_PUBLIC_BASE_URL") {
            config.storage.public_base_url = value.trim_end_matches('/').to_string();
        }
        if let Some(value) = get("CD_URL_SIGNING_SECRET") {
            config.storage.url_signing_secret = value;
        }
        if let Some(value) = get("CD_SIGNED_URL_TTL_SECS") {
            config.storage.signed_url_ttl =
                Duration::from_secs(parse("CD_SIGNED_URL_TTL_SECS", value)?);
        }

        if let Some(value) = get("CD_TOKEN_SECRET") {
            config.security.token_secret = value;
        }
        if let Some(value) = get("CD_TOKEN_TTL_SECS") {
            config.security.token_ttl_secs = parse("CD_TOKEN_TTL_SECS", value)?;
        }
        if let Some(value) = get("CD_PASSWORD_ITERATIONS") {
            config.security.password_iterations = parse("CD_PASSWORD_ITERATIONS", value)?;
        }

        if let Some(value) = get("CD_MAIL_API_URL") {
            config.mail.api_url = value;
        }
        config.mail.api_key = get("CD_MAIL_API_KEY");
        if let Some(value) = get("CD_MAIL_FROM") {
            config.mail.from = value;
        }
        if let Some(value) = get("CD_OPERATIONS_EMAIL") {
            config.mail.operations_email = value;
        }
        config.mail.tracking_page_url = get("CD_TRACKING_PAGE_URL");

        config.bootstrap.admin_email = get("CD_ADMIN_EMAIL");
        config.bootstrap.admin_password = get("CD_ADMIN_PASSWORD");
        if let Some(value) = get("CD_ADMIN_NAME") {
            config.bootstrap.admin_name = value;
        }

        Ok(config)
    }

    /// Structural checks, run in every environment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gateway.validate()?;

        if self.storage.signed_url_ttl.is_zero() {
            return Err(ConfigError::Invalid("signed URL TTL cannot be 0".into()));
        }
        if !(self.storage.public_base_url.starts_with("http://")
            || self.storage.public_base_url.starts_with("https://"))
        {
            return Err(ConfigError::Invalid(format!(
                "public base URL must be http(s): '{}'",
                self.storage.public_base_url
            )));
        }
        if self.security.token_ttl_secs <= 0 {
            return Err(ConfigError::Invalid("token TTL must be positive".into()));
        }
        if self.security.password_iterations == 0 {
            return Err(ConfigError::Invalid("password iterations cannot be 0".into()));
        }
        if self.mail.operations_email.trim().is_empty() {
            return Err(ConfigError::Invalid("operations email cannot be empty".into()));
        }
        Ok(())
    }

    /// Validate configuration for production readiness.
    ///
    /// Returns `Err` if either signing secret is a development default or
    /// too short.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if is_insecure(&self.storage.url_signing_secret, DEV_URL_SIGNING_SECRET) {
            return Err(ConfigError::InsecureSecret {
                var: "CD_URL_SIGNING_SECRET",
            });
        }
        if is_insecure(&self.security.token_secret, DEV_TOKEN_SECRET) {
            return Err(ConfigError::InsecureSecret {
                var: "CD_TOKEN_SECRET",
            });
        }
        Ok(())
    }

    /// `validate`, plus `validate_for_production` in production.
    pub fn validate_for_environment(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.environment == Environment::Production {
            self.validate_for_production()?;
        }
        Ok(())
    }

    pub fn bind_host(&self) -> IpAddr {
        self.gateway.http.host
    }
}

fn is_insecure(secret: &str, dev_default: &str) -> bool {
    secret.is_empty() || secret == dev_default || secret.len() < MIN_SECRET_LEN
}

fn parse<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidValue { var, value })
}
