//! Builds an ecschedule configuration document from a YAML rule list and a
//! per-rule template.
//!
//! This crate provides:
//! - Rule decoding with serde and field-level validation/normalization
//! - Environment filtering with duplicate-name detection
//! - Minijinja rendering with Go-style `{{ .Field }}` template compatibility
//! - A staged build pipeline and atomic output writing

pub mod error;
pub mod filter;
pub mod loader;
pub mod pipeline;
pub mod runner;
pub mod schema;
pub mod templates;
pub mod validation;

pub use error::{BuildError, ErrorKind, Result, RuleRef};
pub use pipeline::{build_schedule, Build, BuildState, RenderedSchedule};
pub use runner::{execute, BuildRequest, BuildSummary};
pub use schema::{BuildParams, Rule, RuleField};
