//! Summarizer operations: accumulate cross-table state, pass tables through.

pub mod column_names;
pub mod column_values;

/// Default report filename when a spec does not choose one.
pub(crate) fn default_filename(summary_name: &str) -> String {
    format!("{}.json", summary_name)
}
