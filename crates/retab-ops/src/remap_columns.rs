//! Rewrite destination columns from a lookup over source-column tuples.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use retab_core::types::{Column, Scalar, Table};

use crate::op::{InvalidParameters, OpError, Operation};
use crate::params::{CrossCheck, FieldSpec, ParamKind, ParamSchema, Violation};

pub(crate) static SCHEMA: ParamSchema = ParamSchema {
    operation: "remap_columns",
    fields: &[
        FieldSpec::required("source_columns", ParamKind::StringList),
        FieldSpec::required("destination_columns", ParamKind::StringList),
        FieldSpec::required("map_list", ParamKind::ScalarListList),
        FieldSpec::required("ignore_missing", ParamKind::Bool),
    ],
    checks: &[CrossCheck::Custom(check_map_shape)],
};

fn check_map_shape(params: &Map<String, Value>) -> Vec<Violation> {
    let mut violations = Vec::new();
    let sources = params
        .get("source_columns")
        .and_then(Value::as_array)
        .map(Vec::len);
    let destinations = params
        .get("destination_columns")
        .and_then(Value::as_array)
        .map(Vec::len);
    if sources == Some(0) {
        violations.push(Violation::new("source_columns", "must not be empty"));
    }
    if destinations == Some(0) {
        violations.push(Violation::new("destination_columns", "must not be empty"));
    }
    if let (Some(src), Some(dst), Some(Value::Array(rows))) =
        (sources, destinations, params.get("map_list"))
    {
        let expected = src + dst;
        for (i, row) in rows.iter().enumerate() {
            if row.as_array().map(Vec::len) != Some(expected) {
                violations.push(Violation::new(
                    "map_list",
                    format!("entry {} must have {} values", i, expected),
                ));
            }
        }
    }
    violations
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Params {
    source_columns: Vec<String>,
    destination_columns: Vec<String>,
    map_list: Vec<Vec<Value>>,
    ignore_missing: bool,
}

pub(crate) fn build(params: &Map<String, Value>) -> Result<Box<dyn Operation>, InvalidParameters> {
    let decoded: Params =
        serde_json::from_value(Value::Object(params.clone())).map_err(|e| InvalidParameters {
            operation: SCHEMA.operation,
            violations: vec![Violation::new("parameters", e.to_string())],
        })?;
    let mut mapping = Vec::with_capacity(decoded.map_list.len());
    for row in &decoded.map_list {
        let scalars: Vec<Scalar> = row.iter().filter_map(Scalar::from_json).collect();
        mapping.push(scalars);
    }
    Ok(Box::new(RemapColumns {
        source_columns: decoded.source_columns,
        destination_columns: decoded.destination_columns,
        mapping,
        ignore_missing: decoded.ignore_missing,
    }))
}

/// For every row, looks the source-column tuple up in the remap table and
/// writes the mapped values into the destination columns (created on demand).
/// A tuple with no entry is an error unless `ignore_missing` is set.
pub struct RemapColumns {
    source_columns: Vec<String>,
    destination_columns: Vec<String>,
    mapping: Vec<Vec<Scalar>>,
    ignore_missing: bool,
}

fn tuple_key(values: &[Scalar]) -> String {
    values
        .iter()
        .map(Scalar::key_render)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Operation for RemapColumns {
    fn name(&self) -> &'static str {
        "remap_columns"
    }

    fn apply(&self, mut table: Table) -> Result<Table, OpError> {
        let source_indices: Vec<usize> = self
            .source_columns
            .iter()
            .map(|name| {
                table
                    .column_index(name)
                    .ok_or_else(|| OpError::MissingColumn(name.clone()))
            })
            .collect::<Result<_, _>>()?;

        let num_rows = table.num_rows();
        for name in &self.destination_columns {
            if table.column_index(name).is_none() {
                let end = table.num_columns();
                table
                    .insert_column(end, Column::new(name.clone(), vec![Scalar::Null; num_rows]))
                    .map_err(|e| OpError::Other(e.to_string()))?;
            }
        }
        let destination_indices: Vec<usize> = self
            .destination_columns
            .iter()
            .map(|name| {
                table
                    .column_index(name)
                    .ok_or_else(|| OpError::MissingColumn(name.clone()))
            })
            .collect::<Result<_, _>>()?;

        let lookup: HashMap<String, &[Scalar]> = self
            .mapping
            .iter()
            .map(|entry| {
                let (key, dest) = entry.split_at(self.source_columns.len());
                (tuple_key(key), dest)
            })
            .collect();

        for row in 0..num_rows {
            let key = tuple_key(&table.row_values(row, &source_indices));
            match lookup.get(&key) {
                Some(dest) => {
                    for (&col, value) in destination_indices.iter().zip(dest.iter()) {
                        table.columns[col].values[row] = value.clone();
                    }
                }
                None if self.ignore_missing => {}
                None => return Err(OpError::UnmappedKey { key, row }),
            }
        }

        Ok(table)
    }
}
