//! Collapse runs of consecutive rows that repeat the same event code.

use serde::Deserialize;
use serde_json::{Map, Value};

use retab_core::types::{Scalar, Table};

use crate::op::{InvalidParameters, OpError, Operation};
use crate::params::{CrossCheck, FieldSpec, ParamKind, ParamSchema, Violation};
use crate::{DURATION_COLUMN, ONSET_COLUMN};

pub(crate) static SCHEMA: ParamSchema = ParamSchema {
    operation: "merge_consecutive",
    fields: &[
        FieldSpec::required("column_name", ParamKind::String),
        FieldSpec::required("event_code", ParamKind::Scalar),
        FieldSpec::optional("match_columns", ParamKind::StringList),
        FieldSpec::required("set_durations", ParamKind::Bool),
        FieldSpec::required("ignore_missing", ParamKind::Bool),
    ],
    checks: &[CrossCheck::Custom(check_match_columns)],
};

fn check_match_columns(params: &Map<String, Value>) -> Vec<Violation> {
    let (Some(Value::String(column)), Some(Value::Array(matches))) =
        (params.get("column_name"), params.get("match_columns"))
    else {
        return Vec::new();
    };
    if matches.iter().any(|m| m.as_str() == Some(column.as_str())) {
        vec![Violation::new(
            "match_columns",
            format!("must not contain the merge column '{}'", column),
        )]
    } else {
        Vec::new()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Params {
    column_name: String,
    event_code: Value,
    #[serde(default)]
    match_columns: Vec<String>,
    set_durations: bool,
    ignore_missing: bool,
}

pub(crate) fn build(params: &Map<String, Value>) -> Result<Box<dyn Operation>, InvalidParameters> {
    let decoded: Params =
        serde_json::from_value(Value::Object(params.clone())).map_err(|e| InvalidParameters {
            operation: SCHEMA.operation,
            violations: vec![Violation::new("parameters", e.to_string())],
        })?;
    let event_code = Scalar::from_json(&decoded.event_code).ok_or_else(|| InvalidParameters {
        operation: SCHEMA.operation,
        violations: vec![Violation::new("event_code", "must be a scalar value")],
    })?;
    Ok(Box::new(MergeConsecutive {
        column_name: decoded.column_name,
        event_code,
        match_columns: decoded.match_columns,
        set_durations: decoded.set_durations,
        ignore_missing: decoded.ignore_missing,
    }))
}

/// Merges each run of consecutive rows whose `column_name` cell equals
/// `event_code` (and whose `match_columns` agree with the run's first row)
/// into that first row.
///
/// With `set_durations`, the surviving row's duration spans from its onset to
/// the end (onset + duration) of the run's last row; this needs numeric
/// `onset`/`duration` columns.
pub struct MergeConsecutive {
    column_name: String,
    event_code: Scalar,
    match_columns: Vec<String>,
    set_durations: bool,
    ignore_missing: bool,
}

impl MergeConsecutive {
    fn cell_f64(table: &Table, col: usize, row: usize) -> Result<f64, OpError> {
        table.value(row, col).numeric().ok_or_else(|| OpError::NonNumeric {
            column: table.columns[col].name.clone(),
            row,
        })
    }
}

impl Operation for MergeConsecutive {
    fn name(&self) -> &'static str {
        "merge_consecutive"
    }

    fn apply(&self, mut table: Table) -> Result<Table, OpError> {
        let code_idx = table
            .column_index(&self.column_name)
            .ok_or_else(|| OpError::MissingColumn(self.column_name.clone()))?;

        let mut match_indices = Vec::new();
        for name in &self.match_columns {
            match table.column_index(name) {
                Some(idx) => match_indices.push(idx),
                None if self.ignore_missing => {}
                None => return Err(OpError::MissingColumn(name.clone())),
            }
        }

        let timing = if self.set_durations {
            let onset = table
                .column_index(ONSET_COLUMN)
                .ok_or_else(|| OpError::MissingColumn(ONSET_COLUMN.to_string()))?;
            let duration = table
                .column_index(DURATION_COLUMN)
                .ok_or_else(|| OpError::MissingColumn(DURATION_COLUMN.to_string()))?;
            Some((onset, duration))
        } else {
            None
        };

        let num_rows = table.num_rows();
        let mut keep = vec![true; num_rows];
        // (surviving row, last row merged into it)
        let mut closed_runs: Vec<(usize, usize)> = Vec::new();

        let mut run_start: Option<usize> = None;
        let mut run_last = 0usize;
        for row in 0..num_rows {
            let is_code = table.value(row, code_idx).matches(&self.event_code);
            let extends_run = is_code
                && run_start.is_some_and(|start| {
                    match_indices
                        .iter()
                        .all(|&c| table.value(row, c).matches(table.value(start, c)))
                });
            if extends_run {
                keep[row] = false;
                run_last = row;
            } else {
                if let Some(start) = run_start {
                    if run_last > start {
                        closed_runs.push((start, run_last));
                    }
                }
                run_start = is_code.then_some(row);
                run_last = row;
            }
        }
        if let Some(start) = run_start {
            if run_last > start {
                closed_runs.push((start, run_last));
            }
        }

        if let Some((onset_idx, duration_idx)) = timing {
            for &(start, last) in &closed_runs {
                let span = Self::cell_f64(&table, onset_idx, last)?
                    + Self::cell_f64(&table, duration_idx, last)?
                    - Self::cell_f64(&table, onset_idx, start)?;
                table.columns[duration_idx].values[start] = Scalar::F64(span);
            }
        }

        Ok(table.filter_rows(&keep))
    }
}
