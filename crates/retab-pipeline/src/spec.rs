//! Decoded form of a persisted pipeline spec.
//!
//! The persisted form is an ordered sequence of entries, each naming an
//! operation and carrying its parameter mapping:
//!
//! ```json
//! [
//!   { "name": "remove_columns",
//!     "description": "Drop bookkeeping columns.",
//!     "parameters": { "column_names": ["sample"], "ignore_missing": true } },
//!   { "name": "summarize_column_names",
//!     "parameters": { "summary_name": "columns" } }
//! ]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("failed to decode JSON pipeline spec: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to decode YAML pipeline spec: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// One declarative entry: `{name, parameters}` plus an optional free-text
/// description carried through for provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl OperationSpec {
    pub fn new(name: impl Into<String>, parameters: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters,
        }
    }
}

/// Decode a JSON pipeline spec (an array of entries).
pub fn from_json_str(src: &str) -> Result<Vec<OperationSpec>, SpecError> {
    Ok(serde_json::from_str(src)?)
}

/// Decode a YAML pipeline spec (a sequence of entries).
pub fn from_yaml_str(src: &str) -> Result<Vec<OperationSpec>, SpecError> {
    Ok(serde_yaml::from_str(src)?)
}
