#![forbid(unsafe_code)]
//! retab-pipeline: from a declarative spec (JSON or YAML) to a validated,
//! immutable pipeline of operation instances.
//!
//! Design:
//! - `spec` decodes the persisted sequence-of-entries form.
//! - `builder` resolves and validates *every* entry before instantiating
//!   anything: either the whole spec is clean and a `Pipeline` comes back, or
//!   the error carries every violation found at every index.
//! - `pipeline` is the built artifact; it never exists in a partial state.

pub mod builder;
pub mod pipeline;
pub mod spec;

pub use builder::{build, BuildViolation, PipelineBuildError};
pub use pipeline::Pipeline;
pub use spec::{from_json_str, from_yaml_str, OperationSpec, SpecError};
