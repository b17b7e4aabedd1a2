#![forbid(unsafe_code)]
//! retab-core: table model, run configuration, manifests, and hashing for the
//! retab remodeling engine.
//!
//! Design:
//! - `types` holds the in-memory table representation (rows × named columns
//!   of loosely-typed scalars) that every operation consumes and produces.
//! - `config`/`manifest` carry run-level settings and provenance.
//! - No I/O and no operation logic here; higher crates own both.

pub mod config;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod prelude;
pub mod types;

pub use error::{Error, Result};
pub use types::{Column, Scalar, Table};

/// Engine version string recorded in run manifests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
