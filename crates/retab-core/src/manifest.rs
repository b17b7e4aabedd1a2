//! Run manifest for provenance.
//!
//! The engine emits a manifest after a run so a dataset's derivatives record
//! which pipeline produced them and what happened to each input file.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hash::Hash256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestId(pub Uuid);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub id: ManifestId,

    /// Stable hash of the pipeline spec (operation names and parameters).
    pub spec_hash: Hash256,

    /// Engine version string for provenance.
    pub engine_version: String,

    /// Milliseconds since Unix epoch (UTC).
    pub started_ms: u64,
    pub finished_ms: u64,

    /// Identifiers of tables that completed the whole pipeline.
    pub tables_processed: Vec<String>,

    /// Identifiers of tables that failed, with the failing operation.
    pub tables_failed: Vec<(String, String)>,

    /// Summary names produced by the run's summarizers.
    pub summaries: Vec<String>,
}

impl RunManifest {
    pub fn new(spec_hash: Hash256, started_ms: u64) -> Self {
        Self {
            id: ManifestId(Uuid::new_v4()),
            spec_hash,
            engine_version: crate::VERSION.to_string(),
            started_ms,
            finished_ms: started_ms,
            tables_processed: Vec::new(),
            tables_failed: Vec::new(),
            summaries: Vec::new(),
        }
    }

    pub fn finish(mut self, finished_ms: u64) -> Self {
        self.finished_ms = finished_ms;
        self
    }
}
