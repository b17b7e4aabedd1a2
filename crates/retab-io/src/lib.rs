#![forbid(unsafe_code)]
//! retab-io: the file-facing edge of the engine.
//!
//! The executor never touches the filesystem; this crate supplies what it
//! consumes (tab-separated tables read with per-column type inference, and
//! dataset discovery that turns a directory tree into `(table, identifier)`
//! pairs) and writes transformed tables back out.

pub mod dataset;
pub mod tsv;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("i/o error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("tabular decode error on '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("'{path}': {reason}")]
    Format { path: String, reason: String },
}

pub use dataset::{find_data_files, relative_id, DatasetSource};
pub use tsv::{read_tsv, write_tsv};
