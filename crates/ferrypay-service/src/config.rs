//! Service configuration.

use std::path::Path;

use ferrypay_core::SharedSecret;
use serde::Deserialize;

/// Default processor API root.
pub const DEFAULT_BASE_URL: &str = "https://sandbox.mpay.one/api/v1";

/// Default merchant ID used when a request omits one.
pub const DEFAULT_MERCHANT_ID: &str = "MERCH-12345";

/// Service configuration loaded from environment variables and secrets files.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:5000").
    pub listen_addr: String,

    /// mPAY ONE API root.
    pub mpay_base_url: String,

    /// Secret shared with mPAY ONE for signing and webhook verification.
    pub mpay_secret_key: SharedSecret,

    /// Merchant ID filled into requests that omit one.
    pub merchant_id: String,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Timeout for calls to the processor, in seconds.
    pub upstream_timeout_seconds: u64,

    /// How long webhook-delivered statuses are kept, in hours.
    pub status_retention_hours: u64,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No merchant secret was configured.
    #[error("MPAY_ONE_SECRET_KEY is not set and no secrets file provides one")]
    MissingSecret,

    /// A variable holds a value that cannot be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// A secrets file exists but cannot be read.
    #[error("failed to load secrets file {path}: {source}")]
    SecretsFile {
        /// File path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// mPAY ONE secrets file structure.
#[derive(Debug, Default, Deserialize)]
struct MpaySecrets {
    secret_key: String,
    #[serde(default)]
    merchant_id: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
}

impl ServiceConfig {
    /// Configuration with defaults for everything but the secret.
    #[must_use]
    pub fn with_secret(secret: impl Into<SharedSecret>) -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".into(),
            mpay_base_url: DEFAULT_BASE_URL.into(),
            mpay_secret_key: secret.into(),
            merchant_id: DEFAULT_MERCHANT_ID.into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
            upstream_timeout_seconds: 30,
            status_retention_hours: 24,
        }
    }

    /// Load configuration from the secrets file and environment variables.
    ///
    /// Values from `.secrets/mpay.json` take precedence over the
    /// corresponding `MPAY_ONE_*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if no secret is configured, a secrets file is
    /// unreadable or a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secrets = load_mpay_secrets()?;
        Self::from_sources(secrets, |key| std::env::var(key).ok())
    }

    fn from_sources(
        secrets: Option<MpaySecrets>,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let secrets = secrets.unwrap_or_default();

        let secret_key = Some(secrets.secret_key)
            .filter(|s| !s.is_empty())
            .or_else(|| var("MPAY_ONE_SECRET_KEY"))
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        let mut config = Self::with_secret(secret_key);

        if let Some(addr) = var("LISTEN_ADDR") {
            config.listen_addr = addr;
        }
        if let Some(url) = secrets.base_url.or_else(|| var("MPAY_ONE_BASE_URL")) {
            config.mpay_base_url = url;
        }
        if let Some(merchant_id) = secrets.merchant_id.or_else(|| var("MPAY_ONE_MERCHANT_ID")) {
            config.merchant_id = merchant_id;
        }
        if let Some(origins) = var("CORS_ORIGINS") {
            config.cors_origins = origins.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Some(value) = var("MAX_BODY_BYTES") {
            config.max_body_bytes = parse_var("MAX_BODY_BYTES", value)?;
        }
        if let Some(value) = var("REQUEST_TIMEOUT_SECONDS") {
            config.request_timeout_seconds = parse_var("REQUEST_TIMEOUT_SECONDS", value)?;
        }
        if let Some(value) = var("UPSTREAM_TIMEOUT_SECONDS") {
            config.upstream_timeout_seconds = parse_var("UPSTREAM_TIMEOUT_SECONDS", value)?;
        }
        if let Some(value) = var("STATUS_RETENTION_HOURS") {
            config.status_retention_hours = parse_var("STATUS_RETENTION_HOURS", value)?;
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { var, value })
}

/// Load mPAY ONE secrets from the first secrets file found.
fn load_mpay_secrets() -> Result<Option<MpaySecrets>, ConfigError> {
    let secret_paths = [".secrets/mpay.json", "../.secrets/mpay.json"];

    for path in &secret_paths {
        match load_secrets_file::<MpaySecrets>(path) {
            Ok(secrets) => {
                tracing::info!(path = %path, "Loaded mPAY ONE secrets from file");
                return Ok(Some(secrets));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(ConfigError::SecretsFile {
                    path: (*path).to_string(),
                    source,
                })
            }
        }
    }

    tracing::debug!("mPAY ONE secrets file not found, using environment variables");
    Ok(None)
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
