//! Put columns into an explicit order.

use serde::Deserialize;
use serde_json::{Map, Value};

use retab_core::types::Table;

use crate::op::{InvalidParameters, OpError, Operation};
use crate::params::{CrossCheck, FieldSpec, ParamKind, ParamSchema, Violation};

pub(crate) static SCHEMA: ParamSchema = ParamSchema {
    operation: "reorder_columns",
    fields: &[
        FieldSpec::required("column_order", ParamKind::StringList),
        FieldSpec::required("ignore_missing", ParamKind::Bool),
        FieldSpec::required("keep_others", ParamKind::Bool),
    ],
    checks: &[CrossCheck::Custom(check_no_duplicates)],
};

fn check_no_duplicates(params: &Map<String, Value>) -> Vec<Violation> {
    let Some(Value::Array(order)) = params.get("column_order") else {
        return Vec::new();
    };
    let mut seen = Vec::new();
    let mut violations = Vec::new();
    for name in order.iter().filter_map(Value::as_str) {
        if seen.contains(&name) {
            violations.push(Violation::new(
                "column_order",
                format!("column '{}' is listed more than once", name),
            ));
        } else {
            seen.push(name);
        }
    }
    violations
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Params {
    column_order: Vec<String>,
    ignore_missing: bool,
    keep_others: bool,
}

pub(crate) fn build(params: &Map<String, Value>) -> Result<Box<dyn Operation>, InvalidParameters> {
    let decoded: Params =
        serde_json::from_value(Value::Object(params.clone())).map_err(|e| InvalidParameters {
            operation: SCHEMA.operation,
            violations: vec![Violation::new("parameters", e.to_string())],
        })?;
    Ok(Box::new(ReorderColumns {
        column_order: decoded.column_order,
        ignore_missing: decoded.ignore_missing,
        keep_others: decoded.keep_others,
    }))
}

/// Reorders the table's columns to `column_order`; columns not listed are
/// appended in their original order (`keep_others`) or dropped.
pub struct ReorderColumns {
    column_order: Vec<String>,
    ignore_missing: bool,
    keep_others: bool,
}

impl Operation for ReorderColumns {
    fn name(&self) -> &'static str {
        "reorder_columns"
    }

    fn apply(&self, table: Table) -> Result<Table, OpError> {
        let mut picked: Vec<usize> = Vec::with_capacity(table.num_columns());
        for name in &self.column_order {
            match table.column_index(name) {
                Some(idx) => picked.push(idx),
                None if self.ignore_missing => {}
                None => return Err(OpError::MissingColumn(name.clone())),
            }
        }
        if self.keep_others {
            for idx in 0..table.num_columns() {
                if !picked.contains(&idx) {
                    picked.push(idx);
                }
            }
        }
        let columns = picked
            .into_iter()
            .map(|idx| table.columns[idx].clone())
            .collect();
        Ok(Table { columns })
    }
}
