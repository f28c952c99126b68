//! # Application
//!
//! The badge application being reviewed. Its applicant, badge, evidence and
//! callback URLs are relations, so each may be a stored value or an accessor
//! resolved at submission time. A bare string constructs an application
//! that only carries a submission id.

use std::sync::OnceLock;

use crate::error::{CoreError, ValidationError};
use crate::identity::SubmissionId;
use crate::model::relation::take_relation;
use crate::model::{hydrate, Applicant, Badge, Evidence, Model, Relation};
use crate::schema::{Construction, FieldType, ModelSchema, PropertySpec};
use crate::types::{EntityKind, Primitive};
use crate::value::Value;

const NAME: &str = "Application";

/// A caller's badge claim.
///
/// Relations may be supplied inline or through accessors; the methods on
/// this type always read through [`Relation::get`], so both forms behave
/// the same to the submission builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Application {
    pub description: Option<String>,
    pub applicant: Relation<Applicant>,
    pub badge: Relation<Badge>,
    pub callback_url: Relation<String>,
    pub criteria_url: Relation<String>,
    pub url: Relation<String>,
    pub evidence: Relation<Vec<Evidence>>,
    pub submission_id: Option<SubmissionId>,
    /// Opaque metadata forwarded verbatim to the review service.
    pub meta: Option<serde_json::Value>,
}

impl Application {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    /// An application known only by its submission id, as used by the
    /// webhook to re-fetch a submission.
    pub fn from_submission_id(id: impl Into<String>) -> Self {
        Self {
            submission_id: Some(SubmissionId::new(id)),
            ..Self::default()
        }
    }

    pub fn with_applicant(mut self, applicant: impl Into<Relation<Applicant>>) -> Self {
        self.applicant = applicant.into();
        self
    }

    pub fn with_badge(mut self, badge: impl Into<Relation<Badge>>) -> Self {
        self.badge = badge.into();
        self
    }

    pub fn with_evidence(mut self, evidence: impl Into<Relation<Vec<Evidence>>>) -> Self {
        self.evidence = evidence.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<Relation<String>>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_criteria_url(mut self, url: impl Into<Relation<String>>) -> Self {
        self.criteria_url = url.into();
        self
    }

    pub fn with_callback_url(mut self, url: impl Into<Relation<String>>) -> Self {
        self.callback_url = url.into();
        self
    }

    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_submission_id(mut self, id: SubmissionId) -> Self {
        self.submission_id = Some(id);
        self
    }

    pub async fn applicant(&self) -> Result<Applicant, CoreError> {
        self.applicant.get(NAME, "applicant", None).await
    }

    pub async fn badge(&self) -> Result<Badge, CoreError> {
        self.badge.get(NAME, "badge", None).await
    }

    /// Attached evidence; `None` when the application supplies none.
    pub async fn evidence(&self) -> Result<Option<Vec<Evidence>>, CoreError> {
        self.evidence.get_optional(NAME, "evidence", None).await
    }

    pub async fn criteria_url(&self, badge: &Badge) -> Result<String, CoreError> {
        self.criteria_url.get(NAME, "criteriaUrl", Some(badge)).await
    }

    pub async fn callback_url(&self, badge: &Badge) -> Result<String, CoreError> {
        self.callback_url.get(NAME, "callbackUrl", Some(badge)).await
    }

    /// The application's own public URL, if it has one.
    pub async fn url(&self, badge: &Badge) -> Result<Option<String>, CoreError> {
        self.url.get_optional(NAME, "url", Some(badge)).await
    }

    /// Build from a plain JSON document, constructing nested `applicant`,
    /// `badge` (with its `rubric`) and `evidence` records as entities first.
    pub fn from_document(document: serde_json::Value) -> Result<Self, ValidationError> {
        let value = match Value::from(document) {
            Value::Object(mut map) => {
                if let Some(applicant) = map.remove("applicant") {
                    map.insert("applicant".into(), hydrate::<Applicant>(applicant)?);
                }
                if let Some(badge) = map.remove("badge") {
                    let badge = match badge {
                        Value::Object(_) => Value::from(Badge::from_document_value(badge)?),
                        other => other,
                    };
                    map.insert("badge".into(), badge);
                }
                if let Some(evidence) = map.remove("evidence") {
                    let evidence = match evidence {
                        Value::Array(items) => Value::Array(
                            items
                                .into_iter()
                                .map(hydrate::<Evidence>)
                                .collect::<Result<_, _>>()?,
                        ),
                        other => other,
                    };
                    map.insert("evidence".into(), evidence);
                }
                Value::Object(map)
            }
            other => other,
        };
        Self::from_value(value)
    }
}

impl Model for Application {
    const KIND: EntityKind = EntityKind::Application;

    fn schema() -> &'static ModelSchema {
        static SCHEMA: OnceLock<ModelSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            ModelSchema::new(
                NAME,
                vec![
                    PropertySpec::required("description", Primitive::String),
                    PropertySpec::optional("applicant", EntityKind::Applicant),
                    PropertySpec::optional("getApplicant", Primitive::Function),
                    PropertySpec::optional("badge", EntityKind::Badge),
                    PropertySpec::optional("getBadge", Primitive::Function),
                    PropertySpec::optional("callbackUrl", Primitive::String),
                    PropertySpec::optional("getCallbackUrl", Primitive::Function),
                    PropertySpec::optional("criteriaUrl", Primitive::String),
                    PropertySpec::optional("getCriteriaUrl", Primitive::Function),
                    PropertySpec::optional("url", Primitive::String),
                    PropertySpec::optional("getUrl", Primitive::Function),
                    PropertySpec::optional(
                        "evidence",
                        FieldType::List(vec![EntityKind::Evidence.into()]),
                    ),
                    PropertySpec::optional("getEvidence", Primitive::Function),
                    PropertySpec::optional("submissionId", Primitive::String),
                    PropertySpec::optional("meta", Primitive::Object),
                ],
            )
            .with_default_property("submissionId")
        })
    }

    fn from_construction(construction: Construction) -> Result<Self, ValidationError> {
        let mut props = match construction {
            Construction::Default {
                value: Value::String(id),
                ..
            } => return Ok(Self::from_submission_id(id)),
            Construction::Default { property, .. } => {
                return Err(ValidationError::InvalidPropertyType {
                    model: NAME,
                    property: property.to_string(),
                    expected: Primitive::String.to_string(),
                })
            }
            Construction::Properties(props) => props,
        };

        let meta = match props.take("meta") {
            None => None,
            Some(meta) => Some(
                meta.into_json()
                    .ok_or_else(|| props.wrong_type("meta", "object"))?,
            ),
        };

        Ok(Self {
            description: props.take_string("description")?,
            applicant: take_relation(&mut props, NAME, "applicant", "getApplicant")?,
            badge: take_relation(&mut props, NAME, "badge", "getBadge")?,
            callback_url: take_relation(&mut props, NAME, "callbackUrl", "getCallbackUrl")?,
            criteria_url: take_relation(&mut props, NAME, "criteriaUrl", "getCriteriaUrl")?,
            url: take_relation(&mut props, NAME, "url", "getUrl")?,
            evidence: take_relation(&mut props, NAME, "evidence", "getEvidence")?,
            submission_id: props.take_string("submissionId")?.map(SubmissionId),
            meta,
        })
    }
}
