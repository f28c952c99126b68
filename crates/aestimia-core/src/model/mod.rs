//! # Entity Model
//!
//! The five entity shapes of the review workflow. Each is a plain struct
//! with a schema table ([`Model::schema`]) used when it is built from a
//! dynamic [`Value`].
//!
//! | Entity | Required | Optional |
//! |--------|----------|----------|
//! | [`Application`] | description | applicant, badge, callbackUrl, criteriaUrl, url, evidence (each value or accessor), submissionId, meta |
//! | [`Applicant`] | | email, sensitive |
//! | [`Badge`] | name, description, image | categories, rubric |
//! | [`Evidence`] | mediaType | description, url (value or accessor) |
//! | [`Rubric`] | | items |

mod applicant;
mod application;
mod badge;
mod evidence;
mod relation;
mod rubric;

pub use applicant::Applicant;
pub use application::Application;
pub use badge::{Badge, RubricSource};
pub use evidence::{Evidence, MediaType};
pub use relation::{FromRelation, Relation};
pub use rubric::{Rubric, RubricItem};

use crate::error::ValidationError;
use crate::schema::{Construction, ModelSchema};
use crate::types::EntityKind;
use crate::value::Value;

/// Common construction surface of the entity structs.
pub trait Model: Sized {
    /// Nominal kind tag carried by values of this entity.
    const KIND: EntityKind;

    /// The schema table for this entity.
    fn schema() -> &'static ModelSchema;

    /// Move validated properties into the struct.
    fn from_construction(construction: Construction) -> Result<Self, ValidationError>;

    /// Validate dynamic input and build the entity.
    fn from_value(data: impl Into<Value>) -> Result<Self, ValidationError> {
        Self::from_construction(Self::schema().construct(data.into())?)
    }
}

/// Construct `M` from a plain object, leaving other values untouched so the
/// owning schema reports them.
pub(crate) fn hydrate<M>(value: Value) -> Result<Value, ValidationError>
where
    M: Model + Into<Value>,
{
    match value {
        Value::Object(_) => M::from_value(value).map(Into::into),
        other => Ok(other),
    }
}

/// Error for a shorthand construction that a model does not support.
pub(crate) fn unsupported_shorthand(model: &'static str, property: &str) -> ValidationError {
    ValidationError::InvalidPropertyType {
        model,
        property: property.to_string(),
        expected: "object".to_string(),
    }
}
