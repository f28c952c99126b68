//! # Review Evaluation
//!
//! Read-side types for a submission fetched back from the review service,
//! and the rule that decides whether it was accepted.
//!
//! The latest review wins. A submission is accepted when that review marks
//! at least one criterion and every required criterion as satisfied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{ReviewId, SubmissionId};
use crate::model::Rubric;

/// One reviewer's verdict on a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ReviewId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Indices into the submission rubric's items.
    #[serde(default)]
    pub satisfied_rubrics: Vec<usize>,
}

/// A submission as returned by `GET /submissions/{id}`.
///
/// Only the fields the evaluation needs are typed. Everything else the
/// service returns is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SubmissionId>,
    #[serde(default)]
    pub rubric: Rubric,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Outcome of evaluating a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// The latest review, if any review exists.
    pub review: Option<Review>,
    pub accepted: bool,
}

/// Pick the latest review and decide acceptance.
///
/// Reviews are ordered by `date`; a review without a date sorts before
/// every dated one, and ties go to the later entry in the list.
pub fn evaluate(record: &SubmissionRecord) -> Evaluation {
    // max_by_key keeps the last maximum, which gives ties to later entries.
    let latest = record.reviews.iter().max_by_key(|review| review.date);

    let Some(review) = latest else {
        return Evaluation {
            review: None,
            accepted: false,
        };
    };

    let accepted = !review.satisfied_rubrics.is_empty()
        && record
            .rubric
            .required_indices()
            .all(|index| review.satisfied_rubrics.contains(&index));

    Evaluation {
        review: Some(review.clone()),
        accepted,
    }
}
