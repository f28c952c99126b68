//! # aestimia-webhook — Review Notification Endpoint
//!
//! Aestimia calls the submission's `onChangeUrl` whenever a review changes.
//! [`endpoint`] builds the router that answers that call:
//!
//! ```text
//! POST /  {"_id": "<submission id>"}
//!   → update(application)      fetch + evaluate the latest review
//!   → handler.handle(...)      caller decides what acceptance means
//!   → process(application, r)  acknowledge review r (skipped without one)
//!   ← 202 Accepted
//! ```
//!
//! The submission id may also arrive as `id` or `submissionId`.

pub mod error;

pub use error::{ErrorBody, ErrorDetail, WebhookError};

use std::sync::Arc;

use aestimia_client::{AestimiaClient, Transport};
use aestimia_core::{Application, BoxError, Evaluation, Model, Value};
use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// Receives each evaluated submission.
#[async_trait]
pub trait ReviewHandler: Send + Sync {
    /// Called after the latest review has been evaluated and before it is
    /// acknowledged. An error aborts the acknowledgement.
    async fn handle(&self, application: &Application, evaluation: &Evaluation)
        -> Result<(), BoxError>;
}

/// Body of a review notification.
#[derive(Debug, Deserialize)]
struct Notification {
    #[serde(rename = "_id", alias = "id", alias = "submissionId")]
    id: String,
}

struct WebhookState<T, H> {
    client: Arc<AestimiaClient<T>>,
    handler: Arc<H>,
}

impl<T, H> Clone for WebhookState<T, H> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            handler: Arc::clone(&self.handler),
        }
    }
}

/// Build the webhook router.
pub fn endpoint<T, H>(client: Arc<AestimiaClient<T>>, handler: Arc<H>) -> Router
where
    T: Transport + 'static,
    H: ReviewHandler + 'static,
{
    Router::new()
        .route("/", post(receive::<T, H>))
        .layer(TraceLayer::new_for_http())
        .with_state(WebhookState { client, handler })
}

async fn receive<T, H>(
    State(state): State<WebhookState<T, H>>,
    body: Bytes,
) -> Result<StatusCode, WebhookError>
where
    T: Transport + 'static,
    H: ReviewHandler + 'static,
{
    let notification: Notification = serde_json::from_slice(&body)
        .map_err(|e| WebhookError::BadRequest(format!("invalid notification: {e}")))?;
    if notification.id.trim().is_empty() {
        return Err(WebhookError::BadRequest("empty submission id".into()));
    }

    let application = Application::from_value(Value::from(notification.id))
        .map_err(|e| WebhookError::BadRequest(e.to_string()))?;

    let evaluation = state.client.update(&application).await?;

    state
        .handler
        .handle(&application, &evaluation)
        .await
        .map_err(|e| WebhookError::Handler(e.to_string()))?;

    if let Some(review_id) = evaluation.review.as_ref().and_then(|r| r.id.as_ref()) {
        state.client.process(&application, review_id).await?;
    }

    Ok(StatusCode::ACCEPTED)
}
