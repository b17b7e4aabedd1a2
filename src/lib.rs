#![forbid(unsafe_code)]
//! retab: remodel tabular event files with declarative operation pipelines.
//!
//! This crate re-exports the workspace members; the integration tests under
//! `tests/` exercise the engine through these paths.

pub use retab_core;
pub use retab_exec;
pub use retab_io;
pub use retab_ops;
pub use retab_pipeline;
