//! # aestimia-cli — Aestimia Command-Line Interface
//!
//! ## Subcommands
//!
//! - `submit` — Submit an application document for review
//! - `status` — Fetch a submission and evaluate its latest review
//! - `process` — Acknowledge a review
//! - `serve` — Run the review webhook
//!
//! Connection settings come from `AESTIMIA_*` environment variables.
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to the client crates.

pub mod commands;
pub mod document;
pub mod handler;
