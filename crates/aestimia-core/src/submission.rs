//! # Submission Assembly
//!
//! Turns an [`Application`] into the payload the review service accepts at
//! `POST /submission`.
//!
//! Steps, in order (the first failure aborts the build):
//!
//! 1. Count the words of the description.
//! 2. Resolve evidence. No evidence together with fewer than
//!    `min_words` words is `InsufficientEvidence`.
//! 3. Resolve the applicant, then the badge.
//! 4. Pick the rubric (the badge's, or one default criterion).
//! 5. Derive the criteria and callback URLs from the badge.
//! 6. Add email, canned responses (sensitive applicants only) and meta.
//! 7. Add the description as a `link` evidence entry.
//! 8. Add each evidence item with its media type collapsed.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, WorkflowError};
use crate::model::{Application, MediaType, Rubric, RubricItem};

/// Minimum description word count when no evidence is attached.
pub const DEFAULT_MIN_WORDS: usize = 0;

/// Stock reviewer replies offered for sensitive applicants.
pub const DEFAULT_CANNED_RESPONSES: [&str; 10] = [
    "You did a great job!",
    "You went above and beyond.",
    "Keep up the good work!",
    "Good job.",
    "You met all the criteria needed to earn this badge.",
    "Creative and thoughtful work.",
    "Nice reflection of your work.",
    "You didn't submit relevant evidence.",
    "Your evidence did not properly reflect the criteria.",
    "Good work! But you still have a few criteria to meet to earn this badge. Make sure you take a look at all the criteria before reapplying.",
];

/// Settings that shape a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPolicy {
    pub min_words: usize,
    pub canned_responses: Vec<String>,
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        Self {
            min_words: DEFAULT_MIN_WORDS,
            canned_responses: DEFAULT_CANNED_RESPONSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Badge block of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub name: String,
    pub description: String,
    pub image_url: String,
}

/// One evidence entry of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionEvidence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,
    pub media_type: MediaType,
}

/// Payload for creating a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    pub criteria_url: String,
    pub on_change_url: String,
    pub achievement: Achievement,
    #[serde(default)]
    pub classifications: Vec<String>,
    #[serde(default)]
    pub evidence: Vec<SubmissionEvidence>,
    pub rubric: Rubric,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canned_responses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

/// Words in a description after dropping everything but letters, digits
/// and whitespace.
pub fn word_count(description: &str) -> usize {
    let normalized: String = description
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    normalized.split_whitespace().count()
}

/// Assemble the submission for `application`.
pub async fn build_submission(
    application: &Application,
    policy: &SubmissionPolicy,
) -> Result<NewSubmission, CoreError> {
    let description = application
        .description
        .as_deref()
        .filter(|d| !d.is_empty());
    let words = description.map(word_count).unwrap_or(0);

    let evidence = application.evidence().await?.unwrap_or_default();
    if evidence.is_empty() && words < policy.min_words {
        return Err(WorkflowError::InsufficientEvidence {
            words,
            min_words: policy.min_words,
        }
        .into());
    }

    let applicant = application.applicant().await?;
    let badge = application.badge().await?;

    let rubric = badge
        .rubric
        .clone()
        .map(|source| source.into_rubric())
        .unwrap_or_else(|| Rubric::new(vec![RubricItem::default_criterion()]));

    let mut submission = NewSubmission {
        criteria_url: application.criteria_url(&badge).await?,
        on_change_url: application.callback_url(&badge).await?,
        achievement: Achievement {
            name: badge.name.clone(),
            description: badge.description.clone(),
            image_url: badge.image.clone(),
        },
        classifications: badge.categories.clone().unwrap_or_default(),
        evidence: Vec::with_capacity(evidence.len() + 1),
        rubric,
        email: None,
        canned_responses: None,
        meta: None,
    };

    if let Some(email) = applicant.email.clone() {
        submission.email = Some(email);
    }
    if applicant.is_sensitive() {
        submission.canned_responses = Some(policy.canned_responses.clone());
    }
    if let Some(meta) = application.meta.clone() {
        submission.meta = Some(meta);
    }

    if let Some(description) = description {
        submission.evidence.push(SubmissionEvidence {
            url: application.url(&badge).await?,
            reflection: Some(description.to_string()),
            media_type: MediaType::Link,
        });
    }

    for item in &evidence {
        submission.evidence.push(SubmissionEvidence {
            url: item.url().await?,
            reflection: item.description.clone(),
            media_type: item.submission_media_type(),
        });
    }

    Ok(submission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_count_ignores_punctuation() {
        assert_eq!(word_count("Good job work here"), 4);
        assert_eq!(word_count("  Hello, world!  "), 2);
        assert_eq!(word_count("..."), 0);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("a - b"), 2);
        assert_eq!(word_count("line one\nline\ttwo"), 4);
    }

    #[test]
    fn default_policy_carries_ten_canned_responses() {
        let policy = SubmissionPolicy::default();
        assert_eq!(policy.min_words, 0);
        assert_eq!(policy.canned_responses.len(), 10);
        assert_eq!(policy.canned_responses[0], "You did a great job!");
    }

    #[test]
    fn optional_fields_are_omitted_from_the_wire() {
        let submission = NewSubmission {
            criteria_url: "https://c".into(),
            on_change_url: "https://o".into(),
            achievement: Achievement {
                name: "n".into(),
                description: "d".into(),
                image_url: "https://i".into(),
            },
            classifications: vec![],
            evidence: vec![SubmissionEvidence {
                url: None,
                reflection: Some("r".into()),
                media_type: MediaType::Link,
            }],
            rubric: Rubric::new(vec![RubricItem::default_criterion()]),
            email: None,
            canned_responses: None,
            meta: None,
        };
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "criteriaUrl": "https://c",
                "onChangeUrl": "https://o",
                "achievement": {"name": "n", "description": "d", "imageUrl": "https://i"},
                "classifications": [],
                "evidence": [{"reflection": "r", "mediaType": "link"}],
                "rubric": {"items": [{"text": "Has done some work", "required": true}]}
            })
        );
    }
}
