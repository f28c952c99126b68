//! # Entity Schemas
//!
//! A [`ModelSchema`] is the table of properties an entity accepts, each with
//! a declared [`FieldType`] and a required flag. [`ModelSchema::construct`]
//! checks dynamic input against the table and hands back the accepted
//! properties; the entity types in [`crate::model`] then move them into their
//! struct fields.
//!
//! ## Construction rules
//!
//! - A schema may name a *default property*. When the whole input matches
//!   that property's type, the input is assigned to it wholesale and the
//!   per-property checks are skipped.
//! - Otherwise every declared property is visited in declaration order.
//!   Absent or null values fail with `MissingRequiredProperty` if the
//!   property is required, fall back to the declared default if one exists,
//!   and are skipped otherwise.
//! - List fields require an array whose elements each match the element
//!   union (an empty union accepts any element).
//! - Input that is not an object is read as an empty record.
//! - Undeclared keys are ignored.

use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::types::{matches, EntityKind, Primitive, TypeSpec};
use crate::value::Value;

/// Declared type of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// The value itself must match.
    Single(TypeSpec),
    /// The value must be an array whose elements match this union.
    List(Vec<TypeSpec>),
}

impl FieldType {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldType::Single(spec) => matches(value, spec),
            FieldType::List(elements) => match value {
                Value::Array(items) => items.iter().all(|item| element_matches(item, elements)),
                _ => false,
            },
        }
    }
}

fn element_matches(item: &Value, elements: &[TypeSpec]) -> bool {
    elements.is_empty() || matches(item, &TypeSpec::AnyOf(elements.to_vec()))
}

impl From<TypeSpec> for FieldType {
    fn from(value: TypeSpec) -> Self {
        FieldType::Single(value)
    }
}

impl From<Primitive> for FieldType {
    fn from(value: Primitive) -> Self {
        FieldType::Single(value.into())
    }
}

impl From<EntityKind> for FieldType {
    fn from(value: EntityKind) -> Self {
        FieldType::Single(value.into())
    }
}

/// One row of a schema table.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
    /// Assigned when the property is absent and not required.
    pub default: Option<Value>,
}

impl PropertySpec {
    pub fn required(name: &'static str, ty: impl Into<FieldType>) -> Self {
        Self {
            name,
            ty: ty.into(),
            required: true,
            default: None,
        }
    }

    pub fn optional(name: &'static str, ty: impl Into<FieldType>) -> Self {
        Self {
            name,
            ty: ty.into(),
            required: false,
            default: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Property table for one entity shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSchema {
    name: &'static str,
    properties: Vec<PropertySpec>,
    default_property: Option<&'static str>,
}

/// Result of a successful [`ModelSchema::construct`].
#[derive(Debug, Clone, PartialEq)]
pub enum Construction {
    /// Shorthand path: the whole input was assigned to one property.
    Default {
        property: &'static str,
        value: Value,
    },
    /// Per-property path.
    Properties(Properties),
}

impl ModelSchema {
    pub fn new(name: &'static str, properties: Vec<PropertySpec>) -> Self {
        Self {
            name,
            properties,
            default_property: None,
        }
    }

    /// Designate the property that receives shorthand input.
    pub fn with_default_property(mut self, property: &'static str) -> Self {
        self.default_property = Some(property);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn properties(&self) -> &[PropertySpec] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn default_property(&self) -> Option<&'static str> {
        self.default_property
    }

    /// Validate `data` against the table.
    pub fn construct(&self, data: Value) -> Result<Construction, ValidationError> {
        if let Some(spec) = self.default_property.and_then(|name| self.property(name)) {
            if spec.ty.accepts(&data) {
                return Ok(Construction::Default {
                    property: spec.name,
                    value: data,
                });
            }
        }

        let mut record = match data {
            Value::Object(map) => map,
            _ => BTreeMap::new(),
        };

        let mut values = BTreeMap::new();
        for spec in &self.properties {
            let value = match record.remove(spec.name) {
                Some(value) if !value.is_null() => value,
                _ => {
                    if spec.required {
                        return Err(ValidationError::MissingRequiredProperty {
                            model: self.name,
                            property: spec.name.to_string(),
                        });
                    }
                    if let Some(default) = &spec.default {
                        values.insert(spec.name, default.clone());
                    }
                    continue;
                }
            };

            self.check(spec, &value)?;
            values.insert(spec.name, value);
        }

        Ok(Construction::Properties(Properties {
            model: self.name,
            values,
        }))
    }

    fn check(&self, spec: &PropertySpec, value: &Value) -> Result<(), ValidationError> {
        match &spec.ty {
            FieldType::Single(ty) => {
                if !matches(value, ty) {
                    return Err(ValidationError::InvalidPropertyType {
                        model: self.name,
                        property: spec.name.to_string(),
                        expected: ty.to_string(),
                    });
                }
            }
            FieldType::List(elements) => {
                let Value::Array(items) = value else {
                    return Err(ValidationError::InvalidPropertyType {
                        model: self.name,
                        property: spec.name.to_string(),
                        expected: Primitive::Array.to_string(),
                    });
                };
                if items.iter().any(|item| !element_matches(item, elements)) {
                    return Err(ValidationError::InvalidItemType {
                        model: self.name,
                        property: spec.name.to_string(),
                        expected: TypeSpec::AnyOf(elements.clone()).to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Properties accepted by the per-property construction path.
#[derive(Debug, Clone, PartialEq)]
pub struct Properties {
    model: &'static str,
    values: BTreeMap<&'static str, Value>,
}

impl Properties {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn take(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn take_string(&mut self, name: &'static str) -> Result<Option<String>, ValidationError> {
        match self.take(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(self.wrong_type(name, Primitive::String)),
        }
    }

    pub fn take_bool(&mut self, name: &'static str) -> Result<Option<bool>, ValidationError> {
        match self.take(name) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(_) => Err(self.wrong_type(name, Primitive::Boolean)),
        }
    }

    pub fn take_list(&mut self, name: &'static str) -> Result<Option<Vec<Value>>, ValidationError> {
        match self.take(name) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(_) => Err(self.wrong_type(name, Primitive::Array)),
        }
    }

    /// Error for a property whose value cannot be moved into its field.
    pub fn wrong_type(&self, name: &str, expected: impl ToString) -> ValidationError {
        ValidationError::InvalidPropertyType {
            model: self.model,
            property: name.to_string(),
            expected: expected.to_string(),
        }
    }
}
