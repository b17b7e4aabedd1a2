//! Convenient re-exports for downstream crates.

pub use crate::config::RunConfig;
pub use crate::error::{Error, Result};
pub use crate::hash::{hash_serde, hash_str, Hash256};
pub use crate::manifest::{ManifestId, RunManifest};
pub use crate::types::{scalar_cmp, Column, Scalar, Table};
