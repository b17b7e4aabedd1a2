#![forbid(unsafe_code)]
//! retab-exec: runs a built pipeline over the tables of a dataset.
//!
//! Each table folds through the pipeline independently; summarizer
//! accumulation is the only cross-table state and is keyed by table
//! identifier, so one table's failure never corrupts what other tables
//! already contributed.

pub mod executor;

pub use executor::{CancelToken, ErrorPolicy, Executor, RunOutcome, TableFailure};
