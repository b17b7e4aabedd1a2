//! Summarize the value distributions of categorical columns across a dataset.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use retab_core::types::Table;

use crate::op::{InvalidParameters, OpError, Operation, Summarizer, SummaryReport};
use crate::params::{FieldSpec, ParamKind, ParamSchema, Violation};

pub(crate) static SCHEMA: ParamSchema = ParamSchema {
    operation: "summarize_column_values",
    fields: &[
        FieldSpec::required("summary_name", ParamKind::String),
        FieldSpec::optional("summary_filename", ParamKind::String),
        FieldSpec::optional("skip_columns", ParamKind::StringList),
        FieldSpec::optional("value_columns", ParamKind::StringList),
    ],
    checks: &[],
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Params {
    summary_name: String,
    #[serde(default)]
    summary_filename: Option<String>,
    #[serde(default)]
    skip_columns: Vec<String>,
    #[serde(default)]
    value_columns: Vec<String>,
}

pub(crate) fn build(params: &Map<String, Value>) -> Result<Box<dyn Operation>, InvalidParameters> {
    let decoded: Params =
        serde_json::from_value(Value::Object(params.clone())).map_err(|e| InvalidParameters {
            operation: SCHEMA.operation,
            violations: vec![Violation::new("parameters", e.to_string())],
        })?;
    let filename = decoded
        .summary_filename
        .unwrap_or_else(|| super::default_filename(&decoded.summary_name));
    Ok(Box::new(SummarizeColumnValues {
        summary_name: decoded.summary_name,
        filename,
        skip_columns: decoded.skip_columns,
        value_columns: decoded.value_columns,
        state: Mutex::new(BTreeMap::new()),
    }))
}

/// Per-file tallies folded into the summary state.
#[derive(Debug, Clone, Default, Serialize)]
struct FileCounts {
    total_events: usize,
    /// column → value rendering → occurrences
    categorical: BTreeMap<String, BTreeMap<String, usize>>,
    /// designated value columns → non-null count
    value_counts: BTreeMap<String, usize>,
}

/// Counts the distinct values of every categorical column, per file and
/// dataset-wide. Columns in `skip_columns` are ignored; columns in
/// `value_columns` are tallied (non-null count) without enumerating values.
pub struct SummarizeColumnValues {
    summary_name: String,
    filename: String,
    skip_columns: Vec<String>,
    value_columns: Vec<String>,
    state: Mutex<BTreeMap<String, FileCounts>>,
}

impl SummarizeColumnValues {
    fn tally(&self, table: &Table) -> FileCounts {
        let mut counts = FileCounts {
            total_events: table.num_rows(),
            ..FileCounts::default()
        };
        for column in &table.columns {
            if self.skip_columns.contains(&column.name) {
                continue;
            }
            if self.value_columns.contains(&column.name) {
                let non_null = column.values.iter().filter(|v| !v.is_null()).count();
                counts.value_counts.insert(column.name.clone(), non_null);
                continue;
            }
            let per_value = counts.categorical.entry(column.name.clone()).or_default();
            for value in &column.values {
                *per_value.entry(value.key_render()).or_insert(0) += 1;
            }
        }
        counts
    }
}

impl Operation for SummarizeColumnValues {
    fn name(&self) -> &'static str {
        "summarize_column_values"
    }

    fn apply(&self, table: Table) -> Result<Table, OpError> {
        Ok(table)
    }

    fn as_summarizer(&self) -> Option<&dyn Summarizer> {
        Some(self)
    }
}

impl Summarizer for SummarizeColumnValues {
    fn summary_name(&self) -> &str {
        &self.summary_name
    }

    fn accumulate(&self, table: &Table, table_id: &str) -> Result<(), OpError> {
        let counts = self.tally(table);
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.insert(table_id.to_string(), counts);
        Ok(())
    }

    fn report(&self) -> SummaryReport {
        let state = self.state.lock().unwrap_or_else(|p| p.into_inner());

        let mut dataset = FileCounts::default();
        for counts in state.values() {
            dataset.total_events += counts.total_events;
            for (column, per_value) in &counts.categorical {
                let merged = dataset.categorical.entry(column.clone()).or_default();
                for (value, n) in per_value {
                    *merged.entry(value.clone()).or_insert(0) += n;
                }
            }
            for (column, n) in &counts.value_counts {
                *dataset.value_counts.entry(column.clone()).or_insert(0) += n;
            }
        }

        let individual: Map<String, Value> = state
            .iter()
            .map(|(id, counts)| {
                (
                    id.clone(),
                    serde_json::to_value(counts).unwrap_or(Value::Null),
                )
            })
            .collect();

        let content = json!({
            "dataset": {
                "total_files": state.len(),
                "total_events": dataset.total_events,
                "categorical": dataset.categorical,
                "value_counts": dataset.value_counts,
            },
            "individual": individual,
        });

        SummaryReport {
            summary_name: self.summary_name.clone(),
            operation: "summarize_column_values",
            filename: self.filename.clone(),
            content,
        }
    }
}
