//! # Applicant
//!
//! The learner applying for a badge.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::{unsupported_shorthand, Model};
use crate::schema::{Construction, ModelSchema, PropertySpec};
use crate::types::{EntityKind, Primitive};

/// The person applying for a badge.
///
/// `sensitive` gates canned-response inclusion in the submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitive: Option<bool>,
}

impl Applicant {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            sensitive: None,
        }
    }

    pub fn sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = Some(sensitive);
        self
    }

    pub fn is_sensitive(&self) -> bool {
        self.sensitive.unwrap_or(false)
    }
}

impl Model for Applicant {
    const KIND: EntityKind = EntityKind::Applicant;

    fn schema() -> &'static ModelSchema {
        static SCHEMA: OnceLock<ModelSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            ModelSchema::new(
                "Applicant",
                vec![
                    PropertySpec::optional("email", Primitive::String),
                    PropertySpec::optional("sensitive", Primitive::Boolean),
                ],
            )
        })
    }

    fn from_construction(construction: Construction) -> Result<Self, ValidationError> {
        let mut props = match construction {
            Construction::Properties(props) => props,
            Construction::Default { property, .. } => {
                return Err(unsupported_shorthand("Applicant", property))
            }
        };
        Ok(Self {
            email: props.take_string("email")?,
            sensitive: props.take_bool("sensitive")?,
        })
    }
}
