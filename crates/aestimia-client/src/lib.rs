//! # aestimia-client -- Typed Rust client for the Aestimia review service
//!
//! Drives the three-step review workflow for a badge [`Application`]:
//!
//! - **submit** assembles the submission and creates it remotely,
//! - **update** fetches the submission and evaluates its latest review,
//! - **process** tells the service a review decision has been consumed.
//!
//! ## Architecture
//!
//! The workflow is generic over a [`Transport`]. [`HttpTransport`] is the
//! production implementation; tests and embedders may supply their own.
//! Nothing here retries: the first error is returned to the caller.

pub mod config;
pub mod error;
pub mod transport;

pub use config::{AestimiaConfig, ConfigError};
pub use error::AestimiaError;
pub use transport::{HttpTransport, Transport, TransportError};

use std::sync::Arc;

use aestimia_core::{
    build_submission, evaluate, Application, Evaluation, NewSubmission, ReviewId, SubmissionId,
    SubmissionPolicy, SubmissionRecord, WorkflowError,
};

/// Hook that sees every successfully assembled submission before dispatch.
pub type SubmissionLogger = Arc<dyn Fn(&NewSubmission) + Send + Sync>;

/// Workflow orchestrator for one Aestimia service.
#[derive(Clone)]
pub struct AestimiaClient<T = HttpTransport> {
    transport: T,
    policy: SubmissionPolicy,
    logger: SubmissionLogger,
}

impl<T: std::fmt::Debug> std::fmt::Debug for AestimiaClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AestimiaClient")
            .field("transport", &self.transport)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl AestimiaClient<HttpTransport> {
    /// Create a client talking HTTP to the configured endpoint.
    pub fn new(config: AestimiaConfig) -> Result<Self, AestimiaError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(transport, config.policy()))
    }
}

impl<T: Transport> AestimiaClient<T> {
    /// Create a client over an arbitrary transport.
    pub fn with_transport(transport: T, policy: SubmissionPolicy) -> Self {
        Self {
            transport,
            policy,
            logger: Arc::new(|_| {}),
        }
    }

    /// Replace the submission logger.
    pub fn with_logger<F>(mut self, logger: F) -> Self
    where
        F: Fn(&NewSubmission) + Send + Sync + 'static,
    {
        self.logger = Arc::new(logger);
        self
    }

    pub fn policy(&self) -> &SubmissionPolicy {
        &self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Assemble and create a submission for `application`.
    ///
    /// Returns the id the service assigned. Callers store it on the
    /// application for later `update` and `process` calls.
    pub async fn submit(&self, application: &Application) -> Result<SubmissionId, AestimiaError> {
        let submission = build_submission(application, &self.policy).await?;
        (self.logger)(&submission);

        let payload = serde_json::to_value(&submission).map_err(AestimiaError::Encode)?;
        let id = self.transport.create(&["submission"], &payload).await?;
        tracing::debug!(submission = %id, "submission created");
        Ok(id)
    }

    /// Fetch the submission and evaluate its latest review.
    pub async fn update(&self, application: &Application) -> Result<Evaluation, AestimiaError> {
        let id = submission_id(application)?;
        let document = self.transport.get(&["submissions", id.as_str()]).await?;
        let record: SubmissionRecord =
            serde_json::from_value(document).map_err(|source| AestimiaError::InvalidRecord {
                id: id.clone(),
                source,
            })?;
        Ok(evaluate(&record))
    }

    /// Mark `review` of the application's submission as processed.
    pub async fn process(
        &self,
        application: &Application,
        review: &ReviewId,
    ) -> Result<(), AestimiaError> {
        let id = submission_id(application)?;
        let review_segment = path_segment("review", review.as_str())?;
        self.transport
            .post(&["submissions", id.as_str(), "reviews", review_segment])
            .await?;
        tracing::info!(submission = %id, review = %review, "review processed");
        Ok(())
    }
}

fn submission_id(application: &Application) -> Result<&SubmissionId, WorkflowError> {
    let id = application
        .submission_id
        .as_ref()
        .ok_or(WorkflowError::NotYetSubmitted)?;
    path_segment("submission", id.as_str())?;
    Ok(id)
}

/// Ids are encoded into one segment each; these would still be dropped or
/// resolved against the parent path.
fn path_segment<'a>(kind: &'static str, id: &'a str) -> Result<&'a str, WorkflowError> {
    match id {
        "" | "." | ".." => Err(WorkflowError::InvalidIdentifier {
            kind,
            id: id.to_string(),
        }),
        _ => Ok(id),
    }
}
