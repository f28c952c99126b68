//! Aestimia client error types.

use aestimia_core::{CoreError, SubmissionId, ValidationError, WorkflowError};

use crate::config::ConfigError;
use crate::transport::TransportError;

/// Errors from the submit/update/process workflow.
#[derive(Debug, thiserror::Error)]
pub enum AestimiaError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Model, accessor or workflow-rule failure.
    #[error(transparent)]
    Core(#[from] CoreError),
    /// The review service could not be reached or rejected the call.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The assembled submission could not be encoded as JSON.
    #[error("failed to encode submission: {0}")]
    Encode(#[source] serde_json::Error),
    /// A fetched submission did not have the expected shape.
    #[error("submission {id} has an unexpected shape: {source}")]
    InvalidRecord {
        id: SubmissionId,
        source: serde_json::Error,
    },
}

impl From<WorkflowError> for AestimiaError {
    fn from(err: WorkflowError) -> Self {
        AestimiaError::Core(err.into())
    }
}

impl From<ValidationError> for AestimiaError {
    fn from(err: ValidationError) -> Self {
        AestimiaError::Core(err.into())
    }
}
