//! Transport to the Aestimia HTTP API.
//!
//! ## API Paths
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/submission` | Create submission, returns `{id}` |
//! | GET    | `/submissions/{id}` | Fetch submission with its reviews |
//! | POST   | `/submissions/{id}/reviews/{reviewId}` | Mark a review processed |
//!
//! Every request carries HTTP basic auth with username `api` and the
//! configured secret as password.
//!
//! Paths are passed as segments and appended to the base URL one by one,
//! so ids are percent-encoded and can never add segments or a query.

use std::time::Duration;

use aestimia_core::{BoxError, SubmissionId};
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::config::AestimiaConfig;

/// Basic-auth username expected by the service.
const API_USER: &str = "api";

/// Errors raised while talking to the review service.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The service returned a non-2xx status.
    #[error("Aestimia {endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The configured endpoint cannot carry a path (e.g. `mailto:`).
    #[error("endpoint {0} cannot be used as a base URL")]
    InvalidBaseUrl(String),
    /// Failure reported by a non-HTTP transport.
    #[error("transport error: {0}")]
    Other(BoxError),
}

/// The three calls the workflow makes against the review service.
///
/// `segments` are unencoded path segments relative to the endpoint, e.g.
/// `["submissions", "5207a0a1"]`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON payload and return the id of the created submission.
    async fn create(
        &self,
        segments: &[&str],
        payload: &serde_json::Value,
    ) -> Result<SubmissionId, TransportError>;

    /// GET a JSON document.
    async fn get(&self, segments: &[&str]) -> Result<serde_json::Value, TransportError>;

    /// POST with no body.
    async fn post(&self, segments: &[&str]) -> Result<(), TransportError>;
}

#[derive(Deserialize)]
struct Created {
    #[serde(alias = "_id")]
    id: SubmissionId,
}

/// reqwest-backed [`Transport`].
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
    secret: Zeroizing<String>,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl HttpTransport {
    /// Build a transport from configuration.
    pub fn new(config: &AestimiaConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self {
            http,
            base_url: config.endpoint.clone(),
            secret: config.secret.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, TransportError> {
        tracing::debug!(endpoint, "dispatching Aestimia request");

        let resp = request
            .basic_auth(API_USER, Some(self.secret.as_str()))
            .send()
            .await
            .map_err(|e| TransportError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn create(
        &self,
        segments: &[&str],
        payload: &serde_json::Value,
    ) -> Result<SubmissionId, TransportError> {
        let endpoint = endpoint_label("POST", segments);
        let resp = self
            .send(&endpoint, self.http.post(self.url(segments)?).json(payload))
            .await?;
        let created: Created = resp
            .json()
            .await
            .map_err(|e| TransportError::Deserialization {
                endpoint: endpoint.clone(),
                source: e,
            })?;
        Ok(created.id)
    }

    async fn get(&self, segments: &[&str]) -> Result<serde_json::Value, TransportError> {
        let endpoint = endpoint_label("GET", segments);
        let resp = self
            .send(&endpoint, self.http.get(self.url(segments)?))
            .await?;
        resp.json()
            .await
            .map_err(|e| TransportError::Deserialization {
                endpoint: endpoint.clone(),
                source: e,
            })
    }

    async fn post(&self, segments: &[&str]) -> Result<(), TransportError> {
        let endpoint = endpoint_label("POST", segments);
        self.send(&endpoint, self.http.post(self.url(segments)?))
            .await?;
        Ok(())
    }
}

/// `"GET /submissions/5207a0a1"`, used in logs and error messages.
fn endpoint_label(method: &str, segments: &[&str]) -> String {
    format!("{method} /{}", segments.join("/"))
}
