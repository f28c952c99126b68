//! # Error Types — Structured Error Hierarchy
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Validation errors name the model, the offending property, and the
//!   expected type(s).
//! - Accessor failures keep the accessor's own error as their source.
//! - Workflow errors are domain-rule violations, raised before any
//!   submission leaves the process.

use thiserror::Error;

use crate::value::BoxError;

/// Top-level error type for the core crate.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Input data did not fit an entity schema.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A related record could not be read.
    #[error("access error: {0}")]
    Access(#[from] AccessError),

    /// A review-workflow rule was violated.
    #[error("workflow error: {0}")]
    Workflow(#[from] WorkflowError),
}

/// Shape/type contract violations raised while constructing entities or
/// resolving their relations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required property was absent.
    #[error("{model}: missing required property: {property}")]
    MissingRequiredProperty {
        /// Model being constructed.
        model: &'static str,
        /// Property that was absent.
        property: String,
    },

    /// A property value did not match its declared type.
    #[error("{model}: property of wrong type: {property}; expecting type: {expected}")]
    InvalidPropertyType {
        /// Model being constructed.
        model: &'static str,
        /// Offending property.
        property: String,
        /// Rendered type descriptor.
        expected: String,
    },

    /// A list property contained an element of the wrong type.
    #[error("{model}: property contains items of wrong type: {property}; expecting type(s): {expected}")]
    InvalidItemType {
        /// Model being constructed.
        model: &'static str,
        /// Offending property.
        property: String,
        /// Rendered element type union.
        expected: String,
    },

    /// Resolved evidence was not a list.
    #[error("evidence not of type `array` (found {found})")]
    InvalidEvidenceType {
        /// Tag of the value that was returned instead.
        found: String,
    },
}

/// Failures reading a value-or-accessor relation.
#[derive(Error, Debug)]
pub enum AccessError {
    /// Neither a value nor an accessor was supplied for the property.
    #[error("{model} missing property: {property}")]
    MissingProperty {
        /// Model that owns the relation.
        model: &'static str,
        /// Relation that was read.
        property: &'static str,
    },

    /// The accessor itself reported an error.
    #[error("accessor for {property} failed: {source}")]
    Failed {
        /// Relation that was read.
        property: &'static str,
        /// Error returned by the accessor.
        source: BoxError,
    },
}

/// Domain-rule violations in the submit/update/process workflow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// No evidence was attached and the description is too short.
    #[error("insufficient evidence for this application: {words} word(s), {min_words} required without evidence")]
    InsufficientEvidence {
        /// Words counted in the description.
        words: usize,
        /// Configured minimum.
        min_words: usize,
    },

    /// The application carries no submission id yet.
    #[error("application has not yet been submitted")]
    NotYetSubmitted,

    /// A submission or review id that cannot name a single path segment.
    #[error("invalid {kind} id: {id:?}")]
    InvalidIdentifier {
        /// `"submission"` or `"review"`.
        kind: &'static str,
        /// The rejected id.
        id: String,
    },
}
