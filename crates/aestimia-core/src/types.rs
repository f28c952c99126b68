//! # Type Checker
//!
//! Closed type descriptors and the pure matching function used by the
//! entity model.
//!
//! Matching order:
//! 1. runtime tag equality (`Value::tag`);
//! 2. nominal match of the entity kind carried by the value.
//!
//! A union matches when any member does.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Primitive runtime tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    String,
    Number,
    Boolean,
    Array,
    Function,
    Object,
}

impl Primitive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Number => "number",
            Primitive::Boolean => "boolean",
            Primitive::Array => "array",
            Primitive::Function => "function",
            Primitive::Object => "object",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five entity shapes of the review workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Application,
    Applicant,
    Badge,
    Evidence,
    Rubric,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Application => "Application",
            EntityKind::Applicant => "Applicant",
            EntityKind::Badge => "Badge",
            EntityKind::Evidence => "Evidence",
            EntityKind::Rubric => "Rubric",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec {
    Primitive(Primitive),
    Entity(EntityKind),
    /// Matches if any member matches. An empty union matches nothing.
    AnyOf(Vec<TypeSpec>),
}

impl TypeSpec {
    pub const STRING: TypeSpec = TypeSpec::Primitive(Primitive::String);
    pub const NUMBER: TypeSpec = TypeSpec::Primitive(Primitive::Number);
    pub const BOOLEAN: TypeSpec = TypeSpec::Primitive(Primitive::Boolean);
    pub const ARRAY: TypeSpec = TypeSpec::Primitive(Primitive::Array);
    pub const FUNCTION: TypeSpec = TypeSpec::Primitive(Primitive::Function);
    pub const OBJECT: TypeSpec = TypeSpec::Primitive(Primitive::Object);
}

impl From<Primitive> for TypeSpec {
    fn from(value: Primitive) -> Self {
        TypeSpec::Primitive(value)
    }
}

impl From<EntityKind> for TypeSpec {
    fn from(value: EntityKind) -> Self {
        TypeSpec::Entity(value)
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Primitive(p) => p.fmt(f),
            TypeSpec::Entity(k) => k.fmt(f),
            TypeSpec::AnyOf(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    member.fmt(f)?;
                }
                Ok(())
            }
        }
    }
}

/// Does `value` conform to `spec`?
pub fn matches(value: &Value, spec: &TypeSpec) -> bool {
    match spec {
        TypeSpec::AnyOf(members) => members.iter().any(|member| matches(value, member)),
        TypeSpec::Primitive(primitive) => value.tag() == Some(*primitive),
        TypeSpec::Entity(kind) => match value {
            Value::Entity(entity) => entity.kind() == *kind,
            _ => false,
        },
    }
}
