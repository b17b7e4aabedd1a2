//! Run configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Abort the whole run on the first table failure instead of recording it
    /// and moving on.
    pub fail_fast: bool,

    /// Filename suffix that marks a file as part of the dataset
    /// (e.g. `_events.tsv`).
    pub file_suffix: String,

    /// Directory names skipped during dataset discovery.
    pub exclude_dirs: Vec<String>,

    /// Where transformed tables are written; `None` means the run is
    /// summary-only and transformed tables are discarded.
    pub output_dir: Option<String>,

    /// Where summarizer reports are written as JSON.
    pub summary_dir: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            file_suffix: "_events.tsv".to_string(),
            exclude_dirs: vec![
                "derivatives".to_string(),
                "sourcedata".to_string(),
                "code".to_string(),
                "stimuli".to_string(),
            ],
            output_dir: None,
            summary_dir: None,
        }
    }
}

impl RunConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `RETAB_FAIL_FAST`: "1"/"true" to abort on first table failure
    /// - `RETAB_FILE_SUFFIX`: dataset file suffix
    /// - `RETAB_EXCLUDE_DIRS`: comma-separated directory names to skip
    /// - `RETAB_OUTPUT_DIR`: destination for transformed tables
    /// - `RETAB_SUMMARY_DIR`: destination for summary reports
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(v) = std::env::var("RETAB_FAIL_FAST") {
            cfg.fail_fast = matches!(v.as_str(), "1" | "true" | "TRUE" | "yes");
        }
        if let Ok(v) = std::env::var("RETAB_FILE_SUFFIX") {
            if !v.is_empty() {
                cfg.file_suffix = v;
            }
        }
        if let Ok(v) = std::env::var("RETAB_EXCLUDE_DIRS") {
            cfg.exclude_dirs = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = std::env::var("RETAB_OUTPUT_DIR") {
            cfg.output_dir = Some(v);
        }
        if let Ok(v) = std::env::var("RETAB_SUMMARY_DIR") {
            cfg.summary_dir = Some(v);
        }
        cfg
    }
}
