//! Value-or-accessor relations.

use crate::error::{AccessError, CoreError, ValidationError};
use crate::model::{Applicant, Badge, Evidence, Model};
use crate::schema::Properties;
use crate::value::{Accessor, Entity, Value};

/// A related record supplied inline or produced by an accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum Relation<T> {
    Absent,
    Value(T),
    Accessor(Accessor),
}

impl<T> Default for Relation<T> {
    fn default() -> Self {
        Relation::Absent
    }
}

impl<T> Relation<T> {
    /// The accessor wins when both are supplied.
    pub fn from_parts(value: Option<T>, accessor: Option<Accessor>) -> Self {
        match (accessor, value) {
            (Some(accessor), _) => Relation::Accessor(accessor),
            (None, Some(value)) => Relation::Value(value),
            (None, None) => Relation::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Relation::Absent)
    }
}

impl<T> From<T> for Relation<T> {
    fn from(value: T) -> Self {
        Relation::Value(value)
    }
}

impl<T: FromRelation + Clone> Relation<T> {
    /// Read the relation; an absent relation fails with `MissingProperty`.
    pub async fn get(
        &self,
        owner: &'static str,
        property: &'static str,
        badge: Option<&Badge>,
    ) -> Result<T, CoreError> {
        match self {
            Relation::Absent => Err(AccessError::MissingProperty {
                model: owner,
                property,
            }
            .into()),
            Relation::Value(value) => Ok(value.clone()),
            Relation::Accessor(accessor) => {
                let value = call(accessor, property, badge).await?;
                Ok(T::from_relation(value, owner, property)?)
            }
        }
    }

    /// Read the relation; absent relations and null accessor results
    /// yield `None`.
    pub async fn get_optional(
        &self,
        owner: &'static str,
        property: &'static str,
        badge: Option<&Badge>,
    ) -> Result<Option<T>, CoreError> {
        match self {
            Relation::Absent => Ok(None),
            Relation::Value(value) => Ok(Some(value.clone())),
            Relation::Accessor(accessor) => match call(accessor, property, badge).await? {
                Value::Null => Ok(None),
                value => Ok(Some(T::from_relation(value, owner, property)?)),
            },
        }
    }
}

async fn call(
    accessor: &Accessor,
    property: &'static str,
    badge: Option<&Badge>,
) -> Result<Value, AccessError> {
    accessor
        .call(badge)
        .await
        .map_err(|source| AccessError::Failed { property, source })
}

/// Conversion from a value produced for a relation.
pub trait FromRelation: Sized {
    fn from_relation(
        value: Value,
        owner: &'static str,
        property: &'static str,
    ) -> Result<Self, ValidationError>;
}

fn wrong_type(owner: &'static str, property: &str, expected: &str) -> ValidationError {
    ValidationError::InvalidPropertyType {
        model: owner,
        property: property.to_string(),
        expected: expected.to_string(),
    }
}

impl FromRelation for String {
    fn from_relation(
        value: Value,
        owner: &'static str,
        property: &'static str,
    ) -> Result<Self, ValidationError> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(wrong_type(owner, property, "string")),
        }
    }
}

impl FromRelation for Applicant {
    fn from_relation(
        value: Value,
        owner: &'static str,
        property: &'static str,
    ) -> Result<Self, ValidationError> {
        match value {
            Value::Entity(Entity::Applicant(applicant)) => Ok(applicant),
            Value::Object(_) => Applicant::from_value(value),
            _ => Err(wrong_type(owner, property, "Applicant")),
        }
    }
}

impl FromRelation for Badge {
    fn from_relation(
        value: Value,
        owner: &'static str,
        property: &'static str,
    ) -> Result<Self, ValidationError> {
        match value {
            Value::Entity(Entity::Badge(badge)) => Ok(*badge),
            Value::Object(_) => Badge::from_document_value(value),
            _ => Err(wrong_type(owner, property, "Badge")),
        }
    }
}

impl FromRelation for Evidence {
    fn from_relation(
        value: Value,
        owner: &'static str,
        property: &'static str,
    ) -> Result<Self, ValidationError> {
        match value {
            Value::Entity(Entity::Evidence(evidence)) => Ok(evidence),
            Value::Object(_) => Evidence::from_value(value),
            _ => Err(ValidationError::InvalidItemType {
                model: owner,
                property: property.to_string(),
                expected: "Evidence".to_string(),
            }),
        }
    }
}

impl FromRelation for Vec<Evidence> {
    fn from_relation(
        value: Value,
        owner: &'static str,
        property: &'static str,
    ) -> Result<Self, ValidationError> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| Evidence::from_relation(item, owner, property))
                .collect(),
            other => Err(ValidationError::InvalidEvidenceType {
                found: other.describe(),
            }),
        }
    }
}

/// Pull a relation's value and accessor out of validated properties.
pub(crate) fn take_relation<T: FromRelation>(
    props: &mut Properties,
    owner: &'static str,
    value_key: &'static str,
    accessor_key: &'static str,
) -> Result<Relation<T>, ValidationError> {
    let accessor = match props.take(accessor_key) {
        None => None,
        Some(Value::Function(accessor)) => Some(accessor),
        Some(_) => return Err(props.wrong_type(accessor_key, "function")),
    };
    let value = props
        .take(value_key)
        .map(|value| T::from_relation(value, owner, value_key))
        .transpose()?;
    Ok(Relation::from_parts(value, accessor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[tokio::test]
    async fn absent_relation_reports_missing_property() {
        let relation: Relation<String> = Relation::Absent;
        let err = relation.get("Application", "criteriaUrl", None).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Access(AccessError::MissingProperty { property: "criteriaUrl", .. })
        ));
        assert_eq!(
            relation.get_optional("Application", "criteriaUrl", None).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn accessor_receives_badge() {
        let relation: Relation<String> = Relation::Accessor(Accessor::from_fn(|badge| {
            Ok(Value::from(format!(
                "https://example.org/badges/{}",
                badge.map(|b| b.name).unwrap_or_default()
            )))
        }));
        let badge = Badge::new("Maker", "Makes things", "https://example.org/maker.png");
        let url = relation.get("Application", "url", Some(&badge)).await.unwrap();
        assert_eq!(url, "https://example.org/badges/Maker");
    }

    #[tokio::test]
    async fn accessor_errors_are_wrapped_with_source() {
        let relation: Relation<Applicant> =
            Relation::Accessor(Accessor::from_fn(|_| Err("lookup failed".into())));
        let err = relation.get("Application", "applicant", None).await.unwrap_err();
        match err {
            CoreError::Access(AccessError::Failed { property, source }) => {
                assert_eq!(property, "applicant");
                assert_eq!(source.to_string(), "lookup failed");
            }
            other => panic!("expected accessor failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn accessor_objects_are_constructed_through_the_schema() {
        let relation: Relation<Applicant> = Relation::Accessor(Accessor::constant(Value::from(
            serde_json::json!({"email": "a@example.org", "sensitive": true}),
        )));
        let applicant = relation.get("Application", "applicant", None).await.unwrap();
        assert_eq!(applicant.email.as_deref(), Some("a@example.org"));
        assert!(applicant.is_sensitive());
    }

    #[test]
    fn accessor_wins_over_value() {
        let accessor = Accessor::constant("from accessor");
        let relation = Relation::from_parts(Some("inline".to_string()), Some(accessor.clone()));
        assert_eq!(relation, Relation::Accessor(accessor));
    }

    #[test]
    fn non_list_evidence_is_rejected() {
        let err = Vec::<Evidence>::from_relation(Value::from("nope"), "Application", "evidence")
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidEvidenceType {
                found: "string".into()
            }
        );
    }
}
