//! Summarize which column-name orderings appear across a dataset.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Map, Value};

use retab_core::types::Table;

use crate::op::{InvalidParameters, OpError, Operation, Summarizer, SummaryReport};
use crate::params::{FieldSpec, ParamKind, ParamSchema, Violation};

pub(crate) static SCHEMA: ParamSchema = ParamSchema {
    operation: "summarize_column_names",
    fields: &[
        FieldSpec::required("summary_name", ParamKind::String),
        FieldSpec::optional("summary_filename", ParamKind::String),
    ],
    checks: &[],
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Params {
    summary_name: String,
    #[serde(default)]
    summary_filename: Option<String>,
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
    Ok(Box::new(SummarizeColumnNames {
        summary_name: decoded.summary_name,
        filename,
        state: Mutex::new(BTreeMap::new()),
    }))
}

/// Groups tables by their exact column-name ordering.
///
/// The dataset section lists each distinct ordering with the files sharing
/// it; the individual section gives every file's own columns.
pub struct SummarizeColumnNames {
    summary_name: String,
    filename: String,
    state: Mutex<BTreeMap<String, Vec<String>>>,
}

impl Operation for SummarizeColumnNames {
    fn name(&self) -> &'static str {
        "summarize_column_names"
    }

    fn apply(&self, table: Table) -> Result<Table, OpError> {
        Ok(table)
    }

    fn as_summarizer(&self) -> Option<&dyn Summarizer> {
        Some(self)
    }
}

impl Summarizer for SummarizeColumnNames {
    fn summary_name(&self) -> &str {
        &self.summary_name
    }

    fn accumulate(&self, table: &Table, table_id: &str) -> Result<(), OpError> {
        let columns: Vec<String> = table.column_names().iter().map(|s| s.to_string()).collect();
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.insert(table_id.to_string(), columns);
        Ok(())
    }

    fn report(&self) -> SummaryReport {
        let state = self.state.lock().unwrap_or_else(|p| p.into_inner());

        let mut patterns: Vec<(&Vec<String>, Vec<&String>)> = Vec::new();
        for (id, columns) in state.iter() {
            match patterns.iter_mut().find(|(cols, _)| *cols == columns) {
                Some((_, files)) => files.push(id),
                None => patterns.push((columns, vec![id])),
            }
        }

        let individual: Map<String, Value> = state
            .iter()
            .map(|(id, columns)| (id.clone(), json!({ "column_names": columns })))
            .collect();

        let content = json!({
            "dataset": {
                "total_files": state.len(),
                "unique_column_patterns": patterns.len(),
                "patterns": patterns
                    .iter()
                    .map(|(columns, files)| json!({
                        "column_names": columns,
                        "files": files,
                    }))
                    .collect::<Vec<_>>(),
            },
            "individual": individual,
        });

        SummaryReport {
            summary_name: self.summary_name.clone(),
            operation: "summarize_column_names",
            filename: self.filename.clone(),
            content,
        }
    }
}
