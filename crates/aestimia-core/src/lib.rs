//! # aestimia-core — Badge Application Model and Review Logic
//!
//! This crate holds everything the Aestimia client does that does not touch
//! the network. It defines the runtime-validated entity model used to
//! describe a badge application, turns an application into the submission
//! payload the review service accepts, and interprets a fetched submission's
//! reviews against its rubric.
//!
//! ## Key Design Principles
//!
//! 1. **Closed type descriptors.** Property types are a [`TypeSpec`] enum
//!    (primitive kind, entity kind, or union). Every entity value carries its
//!    [`EntityKind`] tag, so matching never depends on names reported at
//!    runtime.
//!
//! 2. **Static entities, one schema table each.** `Application`, `Applicant`,
//!    `Badge`, `Evidence` and `Rubric` are plain structs. Dynamic input goes
//!    through [`ModelSchema::construct`] before it becomes one of them.
//!
//! 3. **Value-or-accessor relations.** Related records may be supplied inline
//!    or through an [`Accessor`], which may be synchronous or asynchronous.
//!    Reading always goes through the accessor path.
//!
//! 4. **First error wins.** Submission assembly is a sequence of `.await`s;
//!    the first failure aborts it and nothing partial escapes.
//!
//! ## Crate Policy
//!
//! - No I/O. Transport and configuration live in `aestimia-client`.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod model;
pub mod review;
pub mod schema;
pub mod submission;
pub mod types;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::{AccessError, CoreError, ValidationError, WorkflowError};
pub use identity::{ReviewId, SubmissionId};
pub use model::{
    Applicant, Application, Badge, Evidence, MediaType, Model, Relation, Rubric, RubricItem,
    RubricSource,
};
pub use review::{evaluate, Evaluation, Review, SubmissionRecord};
pub use schema::{Construction, FieldType, ModelSchema, PropertySpec};
pub use submission::{
    build_submission, word_count, Achievement, NewSubmission, SubmissionEvidence,
    SubmissionPolicy, DEFAULT_CANNED_RESPONSES, DEFAULT_MIN_WORDS,
};
pub use types::{matches, EntityKind, Primitive, TypeSpec};
pub use value::{Accessor, BoxError, Entity, Value};
