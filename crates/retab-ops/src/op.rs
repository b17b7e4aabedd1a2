//! The polymorphic operation contract.
//!
//! Transform kinds are stateless across tables: `apply` consumes a table and
//! returns a new one, and may change the row count, the column set, or both.
//! Summarizer kinds additionally accumulate cross-table state keyed by table
//! identifier and pass tables through `apply` unchanged, so they compose
//! transparently between transforms.

use retab_core::types::Table;
use thiserror::Error;

use crate::params::Violation;

/// Runtime precondition failures a parameter schema cannot rule out ahead of
/// time (they depend on the particular table flowing through the pipeline).
#[derive(Debug, Error)]
pub enum OpError {
    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    #[error("column '{0}' already exists")]
    ColumnExists(String),

    #[error("column '{column}' has a non-numeric value at row {row}")]
    NonNumeric { column: String, row: usize },

    #[error("no remap entry for source key ({key}) at row {row}")]
    UnmappedKey { key: String, row: usize },

    #[error("{0}")]
    Other(String),
}

/// Parameter-validation failure raised by an operation factory.
#[derive(Debug)]
pub struct InvalidParameters {
    pub operation: &'static str,
    pub violations: Vec<Violation>,
}

impl std::fmt::Display for InvalidParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid parameters for '{}':", self.operation)?;
        for violation in &self.violations {
            write!(f, " {};", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for InvalidParameters {}

/// A validated, ready-to-run unit of work bound to one parameter set.
pub trait Operation: Send + Sync {
    /// Registry name of the operation kind.
    fn name(&self) -> &'static str;

    /// Transform one table. Ownership of the input transfers in; the caller
    /// keeps only the returned table.
    fn apply(&self, table: Table) -> Result<Table, OpError>;

    /// Summarizing kinds expose their accumulate/report capability here.
    fn as_summarizer(&self) -> Option<&dyn Summarizer> {
        None
    }
}

/// Cross-table accumulation capability of summarizing operations.
pub trait Summarizer: Send + Sync {
    /// User-chosen name the summary is reported under.
    fn summary_name(&self) -> &str;

    /// Fold one table into the accumulated state under `table_id`.
    ///
    /// Re-accumulating the same identifier overwrites that identifier's
    /// contribution; it never double-counts.
    fn accumulate(&self, table: &Table, table_id: &str) -> Result<(), OpError>;

    /// Pure read of the accumulated state; callable at any time, including
    /// mid-run and before any table has been seen.
    fn report(&self) -> SummaryReport;
}

/// Report produced by one summarizer.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SummaryReport {
    pub summary_name: String,
    pub operation: &'static str,
    /// Filename the report is saved under when a run writes summaries.
    pub filename: String,
    pub content: serde_json::Value,
}
