//! # Rubric
//!
//! Criteria a reviewer checks off. A badge may carry a full rubric or just
//! its list of items.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::{unsupported_shorthand, Model};
use crate::schema::{Construction, FieldType, ModelSchema, PropertySpec};
use crate::types::{EntityKind, TypeSpec};
use crate::value::Value;

/// One criterion a reviewer checks off. Its index in [`Rubric::items`] is
/// its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricItem {
    pub text: String,
    #[serde(default)]
    pub required: bool,
}

impl RubricItem {
    pub fn new(text: impl Into<String>, required: bool) -> Self {
        Self {
            text: text.into(),
            required,
        }
    }

    /// The criterion used when a badge carries no rubric.
    pub fn default_criterion() -> Self {
        Self::new("Has done some work", true)
    }

    /// Read a criterion record. `required` defaults to false.
    pub(crate) fn from_element(
        value: &Value,
        model: &'static str,
        property: &'static str,
    ) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidItemType {
            model,
            property: property.to_string(),
            expected: "{text, required}".to_string(),
        };
        let text = match value.get("text") {
            Some(Value::String(text)) => text.clone(),
            _ => return Err(invalid()),
        };
        let required = match value.get("required") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(required)) => *required,
            Some(_) => return Err(invalid()),
        };
        Ok(Self { text, required })
    }

    pub(crate) fn list_from_elements(
        items: Vec<Value>,
        model: &'static str,
        property: &'static str,
    ) -> Result<Vec<Self>, ValidationError> {
        items
            .iter()
            .map(|item| Self::from_element(item, model, property))
            .collect()
    }
}

/// Ordered list of review criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rubric {
    #[serde(default)]
    pub items: Vec<RubricItem>,
}

impl Rubric {
    pub fn new(items: Vec<RubricItem>) -> Self {
        Self { items }
    }

    /// Indices of the required criteria.
    pub fn required_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.required)
            .map(|(index, _)| index)
    }
}

impl Model for Rubric {
    const KIND: EntityKind = EntityKind::Rubric;

    fn schema() -> &'static ModelSchema {
        static SCHEMA: OnceLock<ModelSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            ModelSchema::new(
                "Rubric",
                vec![PropertySpec::optional(
                    "items",
                    FieldType::List(vec![TypeSpec::OBJECT]),
                )],
            )
        })
    }

    fn from_construction(construction: Construction) -> Result<Self, ValidationError> {
        let mut props = match construction {
            Construction::Properties(props) => props,
            Construction::Default { property, .. } => {
                return Err(unsupported_shorthand("Rubric", property))
            }
        };
        let items = match props.take_list("items")? {
            Some(items) => RubricItem::list_from_elements(items, "Rubric", "items")?,
            None => Vec::new(),
        };
        Ok(Self { items })
    }
}
