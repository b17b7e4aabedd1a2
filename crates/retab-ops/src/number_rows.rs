//! Insert a column numbering the rows of a table.

use serde::Deserialize;
use serde_json::{Map, Value};

use retab_core::types::{Column, Scalar, Table};

use crate::op::{InvalidParameters, OpError, Operation};
use crate::params::{FieldSpec, ParamKind, ParamSchema, Violation};

pub(crate) static SCHEMA: ParamSchema = ParamSchema {
    operation: "number_rows",
    fields: &[
        FieldSpec::required("number_column_name", ParamKind::String),
        FieldSpec::optional("overwrite", ParamKind::Bool),
    ],
    checks: &[],
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Params {
    number_column_name: String,
    #[serde(default)]
    overwrite: bool,
}

pub(crate) fn build(params: &Map<String, Value>) -> Result<Box<dyn Operation>, InvalidParameters> {
    let decoded: Params =
        serde_json::from_value(Value::Object(params.clone())).map_err(|e| InvalidParameters {
            operation: SCHEMA.operation,
            violations: vec![Violation::new("parameters", e.to_string())],
        })?;
    Ok(Box::new(NumberRows {
        number_column_name: decoded.number_column_name,
        overwrite: decoded.overwrite,
    }))
}

/// Numbers rows 1..n into `number_column_name`, inserted as the first column.
/// An existing column of that name is an error unless `overwrite` is set, in
/// which case it is renumbered in place.
pub struct NumberRows {
    number_column_name: String,
    overwrite: bool,
}

impl Operation for NumberRows {
    fn name(&self) -> &'static str {
        "number_rows"
    }

    fn apply(&self, mut table: Table) -> Result<Table, OpError> {
        let numbers: Vec<Scalar> = (1..=table.num_rows() as i64).map(Scalar::I64).collect();
        match table.column_index(&self.number_column_name) {
            Some(_) if !self.overwrite => {
                Err(OpError::ColumnExists(self.number_column_name.clone()))
            }
            Some(idx) => {
                table.columns[idx].values = numbers;
                Ok(table)
            }
            None => {
                table
                    .insert_column(0, Column::new(self.number_column_name.clone(), numbers))
                    .map_err(|e| OpError::Other(e.to_string()))?;
                Ok(table)
            }
        }
    }
}
