//! # Badge
//!
//! Badge definition: display fields, categories and an optional rubric.

use std::sync::OnceLock;

use crate::error::ValidationError;
use crate::model::{hydrate, unsupported_shorthand, Model, Rubric, RubricItem};
use crate::schema::{Construction, FieldType, ModelSchema, PropertySpec};
use crate::types::{EntityKind, Primitive, TypeSpec};
use crate::value::{Entity, Value};

/// How a badge supplies its rubric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RubricSource {
    /// A bare ordered list of criteria.
    Items(Vec<RubricItem>),
    /// A constructed rubric entity.
    Rubric(Rubric),
}

impl RubricSource {
    /// Normalize to a rubric; bare lists are wrapped as `{items}`.
    pub fn into_rubric(self) -> Rubric {
        match self {
            RubricSource::Items(items) => Rubric { items },
            RubricSource::Rubric(rubric) => rubric,
        }
    }
}

/// The badge an application claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub name: String,
    pub description: String,
    pub image: String,
    pub categories: Option<Vec<String>>,
    pub rubric: Option<RubricSource>,
}

impl Badge {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            image: image.into(),
            categories: None,
            rubric: None,
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_rubric(mut self, rubric: RubricSource) -> Self {
        self.rubric = Some(rubric);
        self
    }

    /// Build from a plain object, constructing a nested `rubric` object as a
    /// [`Rubric`] first.
    pub(crate) fn from_document_value(value: Value) -> Result<Self, ValidationError> {
        let value = match value {
            Value::Object(mut map) => {
                if let Some(rubric) = map.remove("rubric") {
                    map.insert("rubric".to_string(), hydrate::<Rubric>(rubric)?);
                }
                Value::Object(map)
            }
            other => other,
        };
        Self::from_value(value)
    }
}

impl Model for Badge {
    const KIND: EntityKind = EntityKind::Badge;

    fn schema() -> &'static ModelSchema {
        static SCHEMA: OnceLock<ModelSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            ModelSchema::new(
                "Badge",
                vec![
                    PropertySpec::optional("categories", FieldType::List(vec![TypeSpec::STRING])),
                    PropertySpec::required("description", Primitive::String),
                    PropertySpec::required("image", Primitive::String),
                    PropertySpec::required("name", Primitive::String),
                    PropertySpec::optional(
                        "rubric",
                        TypeSpec::AnyOf(vec![TypeSpec::ARRAY, EntityKind::Rubric.into()]),
                    ),
                ],
            )
        })
    }

    fn from_construction(construction: Construction) -> Result<Self, ValidationError> {
        let mut props = match construction {
            Construction::Properties(props) => props,
            Construction::Default { property, .. } => {
                return Err(unsupported_shorthand("Badge", property))
            }
        };

        let categories = props
            .take_list("categories")?
            .map(|items| {
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s),
                        _ => Err(props.wrong_type("categories", "string")),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        let rubric = match props.take("rubric") {
            None => None,
            Some(Value::Array(items)) => Some(RubricSource::Items(
                RubricItem::list_from_elements(items, "Badge", "rubric")?,
            )),
            Some(Value::Entity(Entity::Rubric(rubric))) => Some(RubricSource::Rubric(rubric)),
            Some(_) => return Err(props.wrong_type("rubric", "array, Rubric")),
        };

        let required = |value: Option<String>, name: &str| {
            value.ok_or_else(|| ValidationError::MissingRequiredProperty {
                model: "Badge",
                property: name.to_string(),
            })
        };

        Ok(Self {
            name: required(props.take_string("name")?, "name")?,
            description: required(props.take_string("description")?, "description")?,
            image: required(props.take_string("image")?, "image")?,
            categories,
            rubric,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn badge_json() -> serde_json::Value {
        json!({
            "name": "Open Source Contributor",
            "description": "Merged a pull request",
            "image": "https://badges.example.org/oss.png",
            "categories": ["code", "community"]
        })
    }

    #[test]
    fn constructs_with_required_fields_and_categories() {
        let badge = Badge::from_value(Value::from(badge_json())).unwrap();
        assert_eq!(badge.name, "Open Source Contributor");
        assert_eq!(badge.description, "Merged a pull request");
        assert_eq!(badge.image, "https://badges.example.org/oss.png");
        assert_eq!(
            badge.categories,
            Some(vec!["code".to_string(), "community".to_string()])
        );
        assert_eq!(badge.rubric, None);
    }

    #[test]
    fn each_required_field_is_enforced() {
        for field in ["name", "description", "image"] {
            let mut input = badge_json();
            input.as_object_mut().unwrap().remove(field);
            let err = Badge::from_value(Value::from(input)).unwrap_err();
            assert_eq!(
                err,
                ValidationError::MissingRequiredProperty {
                    model: "Badge",
                    property: field.to_string()
                }
            );
        }
    }

    #[test]
    fn bare_list_rubric_wraps_as_items() {
        let mut input = badge_json();
        input["rubric"] = json!([{"text": "A", "required": true}]);
        let badge = Badge::from_value(Value::from(input)).unwrap();
        let rubric = badge.rubric.unwrap().into_rubric();
        assert_eq!(rubric, Rubric::new(vec![RubricItem::new("A", true)]));
    }

    #[test]
    fn rubric_entity_is_accepted() {
        let rubric = Rubric::new(vec![RubricItem::new("B", false)]);
        let mut input = Value::from(badge_json());
        if let Value::Object(map) = &mut input {
            map.insert("rubric".into(), Value::from(rubric.clone()));
        }
        let badge = Badge::from_value(input).unwrap();
        assert_eq!(badge.rubric, Some(RubricSource::Rubric(rubric)));
    }

    #[test]
    fn plain_rubric_object_needs_hydration() {
        let mut input = badge_json();
        input["rubric"] = json!({"items": [{"text": "C", "required": true}]});
        let err = Badge::from_value(Value::from(input.clone())).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPropertyType { .. }));

        let badge = Badge::from_document_value(Value::from(input)).unwrap();
        assert_eq!(
            badge.rubric.unwrap().into_rubric().items,
            vec![RubricItem::new("C", true)]
        );
    }

    #[test]
    fn non_string_category_is_rejected() {
        let mut input = badge_json();
        input["categories"] = json!(["code", 7]);
        let err = Badge::from_value(Value::from(input)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidItemType { .. }));
    }
}
