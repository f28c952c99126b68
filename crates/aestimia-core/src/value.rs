//! # Dynamic Values
//!
//! [`Value`] is the input side of the entity model: the shape callers hand to
//! `Model::from_value` and the shape accessors return. It is JSON plus two
//! extra cases the JSON data model cannot express: accessor functions and
//! already-constructed entities (tagged with their [`EntityKind`]).

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::model::{Applicant, Application, Badge, Evidence, Rubric};
use crate::types::{EntityKind, Primitive};

/// Boxed error type accessors may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type AccessorFn = dyn Fn(Option<Badge>) -> BoxFuture<'static, Result<Value, BoxError>> + Send + Sync;

/// A value-producing callback attached to an entity.
///
/// URL derivations receive the resolved badge; other accessors receive
/// `None`. Synchronous closures are lifted into ready futures so callers
/// treat every accessor as asynchronous.
#[derive(Clone)]
pub struct Accessor(Arc<AccessorFn>);

impl Accessor {
    /// Wrap an asynchronous accessor.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Option<Badge>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, BoxError>> + Send + 'static,
    {
        Self(Arc::new(move |badge| f(badge).boxed()))
    }

    /// Wrap a synchronous accessor.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(Option<Badge>) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self::new(move |badge| futures::future::ready(f(badge)))
    }

    /// An accessor that always yields a clone of `value`.
    pub fn constant(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::from_fn(move |_| Ok(value.clone()))
    }

    /// Invoke the accessor.
    pub async fn call(&self, badge: Option<&Badge>) -> Result<Value, BoxError> {
        (self.0)(badge.cloned()).await
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Accessor(..)")
    }
}

// Two accessors are equal only when they share the same closure.
impl PartialEq for Accessor {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A constructed entity carried inside a [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Application(Box<Application>),
    Applicant(Applicant),
    Badge(Box<Badge>),
    Evidence(Evidence),
    Rubric(Rubric),
}

impl Entity {
    /// The nominal kind tag of this entity.
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Application(_) => EntityKind::Application,
            Entity::Applicant(_) => EntityKind::Applicant,
            Entity::Badge(_) => EntityKind::Badge,
            Entity::Evidence(_) => EntityKind::Evidence,
            Entity::Rubric(_) => EntityKind::Rubric,
        }
    }
}

/// Dynamically typed input to the entity model.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Function(Accessor),
    Entity(Entity),
}

impl Value {
    /// Runtime tag of the value. Entities report `object`; null has no tag.
    pub fn tag(&self) -> Option<Primitive> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(Primitive::Boolean),
            Value::Number(_) => Some(Primitive::Number),
            Value::String(_) => Some(Primitive::String),
            Value::Array(_) => Some(Primitive::Array),
            Value::Object(_) | Value::Entity(_) => Some(Primitive::Object),
            Value::Function(_) => Some(Primitive::Function),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Value::Entity(entity) => entity.kind().to_string(),
            other => other
                .tag()
                .map(|tag| tag.to_string())
                .unwrap_or_else(|| "null".to_string()),
        }
    }

    /// Look up a key on an object value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Convert back to plain JSON. Returns `None` when the value holds an
    /// accessor or an entity anywhere inside it.
    pub fn into_json(self) -> Option<serde_json::Value> {
        Some(match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Value::Number(n),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(items) => serde_json::Value::Array(
                items
                    .into_iter()
                    .map(Value::into_json)
                    .collect::<Option<Vec<_>>>()?,
            ),
            Value::Object(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| v.into_json().map(|v| (k, v)))
                    .collect::<Option<serde_json::Map<_, _>>>()?,
            ),
            Value::Function(_) | Value::Entity(_) => return None,
        })
    }

    /// Build an object value from key/value pairs.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Accessor> for Value {
    fn from(value: Accessor) -> Self {
        Value::Function(value)
    }
}

impl From<Entity> for Value {
    fn from(value: Entity) -> Self {
        Value::Entity(value)
    }
}

impl From<Application> for Value {
    fn from(value: Application) -> Self {
        Value::Entity(Entity::Application(Box::new(value)))
    }
}

impl From<Applicant> for Value {
    fn from(value: Applicant) -> Self {
        Value::Entity(Entity::Applicant(value))
    }
}

impl From<Badge> for Value {
    fn from(value: Badge) -> Self {
        Value::Entity(Entity::Badge(Box::new(value)))
    }
}

impl From<Evidence> for Value {
    fn from(value: Evidence) -> Self {
        Value::Entity(Entity::Evidence(value))
    }
}

impl From<Rubric> for Value {
    fn from(value: Rubric) -> Self {
        Value::Entity(Entity::Rubric(value))
    }
}
