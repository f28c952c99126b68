//! Review handler used by `aestimia serve`.

use aestimia_core::{Application, BoxError, Evaluation};
use aestimia_webhook::ReviewHandler;
use async_trait::async_trait;

/// Logs each evaluated submission and lets the webhook acknowledge it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReviews;

#[async_trait]
impl ReviewHandler for LogReviews {
    async fn handle(
        &self,
        application: &Application,
        evaluation: &Evaluation,
    ) -> Result<(), BoxError> {
        let submission = application
            .submission_id
            .as_ref()
            .map(|id| id.as_str())
            .unwrap_or_default();
        let review = evaluation
            .review
            .as_ref()
            .and_then(|r| r.id.as_ref())
            .map(|id| id.as_str())
            .unwrap_or_default();
        tracing::info!(
            submission,
            review,
            accepted = evaluation.accepted,
            "submission evaluated"
        );
        Ok(())
    }
}
