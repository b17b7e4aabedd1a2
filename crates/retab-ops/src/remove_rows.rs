//! Drop rows whose cell in one column matches any listed value.

use serde::Deserialize;
use serde_json::{Map, Value};

use retab_core::types::{Scalar, Table};

use crate::op::{InvalidParameters, OpError, Operation};
use crate::params::{FieldSpec, ParamKind, ParamSchema, Violation};

pub(crate) static SCHEMA: ParamSchema = ParamSchema {
    operation: "remove_rows",
    fields: &[
        FieldSpec::required("column_name", ParamKind::String),
        FieldSpec::required("remove_values", ParamKind::ScalarList),
    ],
    checks: &[],
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Params {
    column_name: String,
    remove_values: Vec<Value>,
}

pub(crate) fn build(params: &Map<String, Value>) -> Result<Box<dyn Operation>, InvalidParameters> {
    let decoded: Params =
        serde_json::from_value(Value::Object(params.clone())).map_err(|e| InvalidParameters {
            operation: SCHEMA.operation,
            violations: vec![Violation::new("parameters", e.to_string())],
        })?;
    let remove_values = decoded
        .remove_values
        .iter()
        .filter_map(Scalar::from_json)
        .collect();
    Ok(Box::new(RemoveRows {
        column_name: decoded.column_name,
        remove_values,
    }))
}

pub struct RemoveRows {
    column_name: String,
    remove_values: Vec<Scalar>,
}

impl Operation for RemoveRows {
    fn name(&self) -> &'static str {
        "remove_rows"
    }

    fn apply(&self, table: Table) -> Result<Table, OpError> {
        let col_idx = table
            .column_index(&self.column_name)
            .ok_or_else(|| OpError::MissingColumn(self.column_name.clone()))?;
        let keep: Vec<bool> = table.columns[col_idx]
            .values
            .iter()
            .map(|cell| !self.remove_values.iter().any(|v| cell.matches(v)))
            .collect();
        Ok(table.filter_rows(&keep))
    }
}
