//! Rename columns via an explicit old-name → new-name mapping.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use retab_core::types::Table;

use crate::op::{InvalidParameters, OpError, Operation};
use crate::params::{FieldSpec, ParamKind, ParamSchema, Violation};

pub(crate) static SCHEMA: ParamSchema = ParamSchema {
    operation: "rename_columns",
    fields: &[
        FieldSpec::required("column_mapping", ParamKind::StringMap),
        FieldSpec::required("ignore_missing", ParamKind::Bool),
    ],
    checks: &[],
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Params {
    column_mapping: BTreeMap<String, String>,
    ignore_missing: bool,
}

pub(crate) fn build(params: &Map<String, Value>) -> Result<Box<dyn Operation>, InvalidParameters> {
    let decoded: Params =
        serde_json::from_value(Value::Object(params.clone())).map_err(|e| InvalidParameters {
            operation: SCHEMA.operation,
            violations: vec![Violation::new("parameters", e.to_string())],
        })?;
    Ok(Box::new(RenameColumns {
        column_mapping: decoded.column_mapping,
        ignore_missing: decoded.ignore_missing,
    }))
}

pub struct RenameColumns {
    column_mapping: BTreeMap<String, String>,
    ignore_missing: bool,
}

impl Operation for RenameColumns {
    fn name(&self) -> &'static str {
        "rename_columns"
    }

    fn apply(&self, mut table: Table) -> Result<Table, OpError> {
        for (old, new) in &self.column_mapping {
            let Some(idx) = table.column_index(old) else {
                if self.ignore_missing {
                    continue;
                }
                return Err(OpError::MissingColumn(old.clone()));
            };
            if old != new && table.column_index(new).is_some() {
                return Err(OpError::ColumnExists(new.clone()));
            }
            table.columns[idx].name = new.clone();
        }
        Ok(table)
    }
}
