//! Split event rows into additional sub-event rows.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use retab_core::types::{Column, Scalar, Table};

use crate::op::{InvalidParameters, OpError, Operation};
use crate::params::{FieldSpec, ParamKind, ParamSchema, Violation};
use crate::{DURATION_COLUMN, ONSET_COLUMN};

pub(crate) static SCHEMA: ParamSchema = ParamSchema {
    operation: "split_rows",
    fields: &[
        FieldSpec::required("anchor_column", ParamKind::String),
        FieldSpec::required("new_events", ParamKind::Object),
        FieldSpec::required("remove_parent_row", ParamKind::Bool),
    ],
    checks: &[],
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EventDef {
    #[serde(default)]
    onset_source: Vec<Value>,
    #[serde(default)]
    duration: Vec<Value>,
    #[serde(default)]
    copy_columns: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Params {
    anchor_column: String,
    new_events: BTreeMap<String, EventDef>,
    remove_parent_row: bool,
}

/// One term of an onset/duration expression: a constant offset, or the name
/// of a column whose cell in the parent row supplies the value.
enum SourceTerm {
    Constant(f64),
    Column(String),
}

fn decode_terms(key: &str, raw: &[Value]) -> Result<Vec<SourceTerm>, InvalidParameters> {
    raw.iter()
        .map(|term| match term {
            Value::Number(n) => n.as_f64().map(SourceTerm::Constant),
            Value::String(s) => Some(SourceTerm::Column(s.clone())),
            _ => None,
        })
        .map(|term| {
            term.ok_or_else(|| InvalidParameters {
                operation: SCHEMA.operation,
                violations: vec![Violation::new(
                    key,
                    "entries must be numbers or column names",
                )],
            })
        })
        .collect()
}

struct NewEvent {
    name: String,
    onset_source: Vec<SourceTerm>,
    duration: Vec<SourceTerm>,
    copy_columns: Vec<String>,
}

pub(crate) fn build(params: &Map<String, Value>) -> Result<Box<dyn Operation>, InvalidParameters> {
    let decoded: Params =
        serde_json::from_value(Value::Object(params.clone())).map_err(|e| InvalidParameters {
            operation: SCHEMA.operation,
            violations: vec![Violation::new("parameters", e.to_string())],
        })?;
    let mut new_events = Vec::with_capacity(decoded.new_events.len());
    for (name, def) in decoded.new_events {
        new_events.push(NewEvent {
            onset_source: decode_terms("new_events.onset_source", &def.onset_source)?,
            duration: decode_terms("new_events.duration", &def.duration)?,
            copy_columns: def.copy_columns,
            name,
        });
    }
    Ok(Box::new(SplitRows {
        anchor_column: decoded.anchor_column,
        new_events,
        remove_parent_row: decoded.remove_parent_row,
    }))
}

/// For every parent row, emits one child row per new-event entry: the child's
/// onset is the parent onset plus the entry's onset terms, its duration is
/// the sum of the duration terms (null when a referenced cell is null), the
/// anchor column carries the entry name, `copy_columns` carry over from the
/// parent, and all other cells are null. A child whose onset terms reference
/// a null cell is skipped. The result is re-sorted by onset.
pub struct SplitRows {
    anchor_column: String,
    new_events: Vec<NewEvent>,
    remove_parent_row: bool,
}

impl SplitRows {
    /// Sum the terms against one parent row; `Ok(None)` means a referenced
    /// cell was null.
    fn eval_terms(
        table: &Table,
        row: usize,
        terms: &[SourceTerm],
    ) -> Result<Option<f64>, OpError> {
        let mut total = 0.0;
        for term in terms {
            match term {
                SourceTerm::Constant(v) => total += v,
                SourceTerm::Column(name) => {
                    let idx = table
                        .column_index(name)
                        .ok_or_else(|| OpError::MissingColumn(name.clone()))?;
                    let cell = table.value(row, idx);
                    if cell.is_null() {
                        return Ok(None);
                    }
                    total += cell.numeric().ok_or_else(|| OpError::NonNumeric {
                        column: name.clone(),
                        row,
                    })?;
                }
            }
        }
        Ok(Some(total))
    }
}

impl Operation for SplitRows {
    fn name(&self) -> &'static str {
        "split_rows"
    }

    fn apply(&self, mut table: Table) -> Result<Table, OpError> {
        let num_rows = table.num_rows();
        if table.column_index(&self.anchor_column).is_none() {
            let end = table.num_columns();
            table
                .insert_column(
                    end,
                    Column::new(self.anchor_column.clone(), vec![Scalar::Null; num_rows]),
                )
                .map_err(|e| OpError::Other(e.to_string()))?;
        }
        let wants_duration = self.new_events.iter().any(|e| !e.duration.is_empty());
        if wants_duration && table.column_index(DURATION_COLUMN).is_none() {
            let end = table.num_columns();
            table
                .insert_column(
                    end,
                    Column::new(DURATION_COLUMN, vec![Scalar::Null; num_rows]),
                )
                .map_err(|e| OpError::Other(e.to_string()))?;
        }

        let onset_idx = table
            .column_index(ONSET_COLUMN)
            .ok_or_else(|| OpError::MissingColumn(ONSET_COLUMN.to_string()))?;
        let anchor_idx = table
            .column_index(&self.anchor_column)
            .ok_or_else(|| OpError::MissingColumn(self.anchor_column.clone()))?;
        let duration_idx = table.column_index(DURATION_COLUMN);

        let width = table.num_columns();
        let mut children: Vec<Vec<Scalar>> = Vec::new();
        for row in 0..num_rows {
            let base = table
                .value(row, onset_idx)
                .numeric()
                .ok_or_else(|| OpError::NonNumeric {
                    column: ONSET_COLUMN.to_string(),
                    row,
                })?;
            for event in &self.new_events {
                let Some(offset) = Self::eval_terms(&table, row, &event.onset_source)? else {
                    continue;
                };
                let mut child = vec![Scalar::Null; width];
                for name in &event.copy_columns {
                    let idx = table
                        .column_index(name)
                        .ok_or_else(|| OpError::MissingColumn(name.clone()))?;
                    child[idx] = table.value(row, idx).clone();
                }
                child[onset_idx] = Scalar::F64(base + offset);
                if let Some(dur_idx) = duration_idx {
                    if !event.duration.is_empty() {
                        child[dur_idx] = match Self::eval_terms(&table, row, &event.duration)? {
                            Some(total) => Scalar::F64(total),
                            None => Scalar::Null,
                        };
                    }
                }
                child[anchor_idx] = Scalar::Str(event.name.clone());
                children.push(child);
            }
        }

        let mut result = if self.remove_parent_row {
            table.filter_rows(&vec![false; num_rows])
        } else {
            table
        };
        for child in children {
            for (col, value) in result.columns.iter_mut().zip(child.into_iter()) {
                col.values.push(value);
            }
        }
        result
            .sort_by_columns(&[ONSET_COLUMN.to_string()])
            .map_err(|e| OpError::Other(e.to_string()))?;
        Ok(result)
    }
}
