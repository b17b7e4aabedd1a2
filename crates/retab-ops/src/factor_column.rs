//! Factor a column into 0/1 indicator columns, one per factored value.

use serde::Deserialize;
use serde_json::{Map, Value};

use retab_core::types::{Column, Scalar, Table};

use crate::op::{InvalidParameters, OpError, Operation};
use crate::params::{CrossCheck, FieldSpec, ParamKind, ParamSchema, Violation};

pub(crate) static SCHEMA: ParamSchema = ParamSchema {
    operation: "factor_column",
    fields: &[
        FieldSpec::required("column_name", ParamKind::String),
        FieldSpec::optional("factor_values", ParamKind::ScalarList),
        FieldSpec::optional("factor_names", ParamKind::StringList),
    ],
    checks: &[
        CrossCheck::Requires {
            key: "factor_names",
            needs: "factor_values",
        },
        CrossCheck::SameLength {
            left: "factor_names",
            right: "factor_values",
        },
    ],
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Params {
    column_name: String,
    #[serde(default)]
    factor_values: Vec<Value>,
    #[serde(default)]
    factor_names: Vec<String>,
}

pub(crate) fn build(params: &Map<String, Value>) -> Result<Box<dyn Operation>, InvalidParameters> {
    let decoded: Params =
        serde_json::from_value(Value::Object(params.clone())).map_err(|e| InvalidParameters {
            operation: SCHEMA.operation,
            violations: vec![Violation::new("parameters", e.to_string())],
        })?;
    let factor_values = decoded
        .factor_values
        .iter()
        .filter_map(Scalar::from_json)
        .collect();
    Ok(Box::new(FactorColumn {
        column_name: decoded.column_name,
        factor_values,
        factor_names: decoded.factor_names,
    }))
}

/// Appends one indicator column per factored value of `column_name`.
///
/// With no explicit `factor_values`, every distinct non-null value of the
/// column (in order of first appearance) is factored, and columns are named
/// `<column>.<value>` unless `factor_names` overrides them.
pub struct FactorColumn {
    column_name: String,
    factor_values: Vec<Scalar>,
    factor_names: Vec<String>,
}

impl Operation for FactorColumn {
    fn name(&self) -> &'static str {
        "factor_column"
    }

    fn apply(&self, mut table: Table) -> Result<Table, OpError> {
        let col_idx = table
            .column_index(&self.column_name)
            .ok_or_else(|| OpError::MissingColumn(self.column_name.clone()))?;

        let values: Vec<Scalar> = if self.factor_values.is_empty() {
            let mut seen: Vec<Scalar> = Vec::new();
            for v in &table.columns[col_idx].values {
                if !v.is_null() && !seen.iter().any(|s| s.matches(v)) {
                    seen.push(v.clone());
                }
            }
            seen
        } else {
            self.factor_values.clone()
        };

        let names: Vec<String> = if self.factor_names.is_empty() {
            values
                .iter()
                .map(|v| format!("{}.{}", self.column_name, v.key_render()))
                .collect()
        } else {
            self.factor_names.clone()
        };

        for (value, name) in values.iter().zip(names.iter()) {
            if table.column_index(name).is_some() {
                return Err(OpError::ColumnExists(name.clone()));
            }
            let indicators = table.columns[col_idx]
                .values
                .iter()
                .map(|cell| Scalar::I64(cell.matches(value) as i64))
                .collect();
            let end = table.num_columns();
            table
                .insert_column(end, Column::new(name.clone(), indicators))
                .map_err(|e| OpError::Other(e.to_string()))?;
        }

        Ok(table)
    }
}
