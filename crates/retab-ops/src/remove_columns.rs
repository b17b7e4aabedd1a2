//! Drop columns from a table.

use serde::Deserialize;
use serde_json::{Map, Value};

use retab_core::types::Table;

use crate::op::{InvalidParameters, OpError, Operation};
use crate::params::{FieldSpec, ParamKind, ParamSchema, Violation};

pub(crate) static SCHEMA: ParamSchema = ParamSchema {
    operation: "remove_columns",
    fields: &[
        FieldSpec::required("column_names", ParamKind::StringList),
        FieldSpec::required("ignore_missing", ParamKind::Bool),
    ],
    checks: &[],
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Params {
    column_names: Vec<String>,
    ignore_missing: bool,
}

pub(crate) fn build(params: &Map<String, Value>) -> Result<Box<dyn Operation>, InvalidParameters> {
    let decoded: Params =
        serde_json::from_value(Value::Object(params.clone())).map_err(|e| InvalidParameters {
            operation: SCHEMA.operation,
            violations: vec![Violation::new("parameters", e.to_string())],
        })?;
    Ok(Box::new(RemoveColumns {
        column_names: decoded.column_names,
        ignore_missing: decoded.ignore_missing,
    }))
}

pub struct RemoveColumns {
    column_names: Vec<String>,
    ignore_missing: bool,
}

impl Operation for RemoveColumns {
    fn name(&self) -> &'static str {
        "remove_columns"
    }

    fn apply(&self, mut table: Table) -> Result<Table, OpError> {
        for name in &self.column_names {
            if table.remove_column(name).is_none() && !self.ignore_missing {
                return Err(OpError::MissingColumn(name.clone()));
            }
        }
        Ok(table)
    }
}
