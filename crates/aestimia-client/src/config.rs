//! Aestimia client configuration.
//!
//! Configuration is built once and handed to [`crate::AestimiaClient::new`].
//! There is no global state; two clients may talk to two services.

use aestimia_core::{SubmissionPolicy, DEFAULT_CANNED_RESPONSES, DEFAULT_MIN_WORDS};
use url::Url;
use zeroize::Zeroizing;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to an Aestimia service.
///
/// Custom `Debug` implementation redacts the `secret` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct AestimiaConfig {
    /// Base URL of the review service.
    pub endpoint: Url,
    /// Basic-auth password; the username is always `api`.
    pub secret: Zeroizing<String>,
    /// Minimum description word count when no evidence is attached.
    pub min_words: usize,
    /// Replies offered to reviewers for sensitive applicants.
    pub canned_responses: Vec<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for AestimiaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AestimiaConfig")
            .field("endpoint", &self.endpoint)
            .field("secret", &"[REDACTED]")
            .field("min_words", &self.min_words)
            .field("canned_responses", &self.canned_responses.len())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AestimiaConfig {
    /// Configuration with defaults for everything but endpoint and secret.
    pub fn new(endpoint: &str, secret: impl Into<String>) -> Result<Self, ConfigError> {
        if endpoint.trim().is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        Ok(Self {
            endpoint: parse_url("endpoint", endpoint)?,
            secret: Zeroizing::new(secret),
            min_words: DEFAULT_MIN_WORDS,
            canned_responses: DEFAULT_CANNED_RESPONSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    pub fn with_min_words(mut self, min_words: usize) -> Self {
        self.min_words = min_words;
        self
    }

    pub fn with_canned_responses(mut self, responses: Vec<String>) -> Self {
        self.canned_responses = responses;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `AESTIMIA_ENDPOINT` (required)
    /// - `AESTIMIA_SECRET` (required)
    /// - `AESTIMIA_MIN_WORDS` (default: 0)
    /// - `AESTIMIA_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup("AESTIMIA_ENDPOINT").ok_or(ConfigError::MissingEndpoint)?;
        let secret = lookup("AESTIMIA_SECRET").ok_or(ConfigError::MissingSecret)?;

        let mut config = Self::new(&endpoint, secret)?;
        if let Some(raw) = lookup("AESTIMIA_MIN_WORDS") {
            config.min_words = parse_number("AESTIMIA_MIN_WORDS", &raw)?;
        }
        if let Some(raw) = lookup("AESTIMIA_TIMEOUT_SECS") {
            config.timeout_secs = parse_number("AESTIMIA_TIMEOUT_SECS", &raw)?;
        }
        Ok(config)
    }

    /// The submission settings carried by this configuration.
    pub fn policy(&self) -> SubmissionPolicy {
        SubmissionPolicy {
            min_words: self.min_words,
            canned_responses: self.canned_responses.clone(),
        }
    }
}

fn parse_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(name.to_string(), e.to_string()))
}

fn parse_number<N: std::str::FromStr>(var: &str, raw: &str) -> Result<N, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber(var.to_string(), raw.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("AESTIMIA_ENDPOINT is required")]
    MissingEndpoint,
    #[error("AESTIMIA_SECRET is required")]
    MissingSecret,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid number for {0}: {1:?}")]
    InvalidNumber(String, String),
}
