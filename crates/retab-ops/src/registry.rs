//! The operation registry: a closed set of tagged operation kinds.
//!
//! The set of valid operation names is exactly `OperationKind::ALL`; a name
//! not in this catalog can never be legally referenced. Dispatch from tag to
//! schema and factory is a total match, so the compiler enforces that every
//! registered kind has both.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::op::{InvalidParameters, Operation};
use crate::params::ParamSchema;
use crate::{
    factor_column, merge_consecutive, number_rows, remap_columns, remove_columns, remove_rows,
    rename_columns, reorder_columns, split_rows, summarize,
};

#[derive(Debug, Error)]
#[error("unknown operation '{0}'")]
pub struct UnknownOperation(pub String);

/// One variant per registered operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    FactorColumn,
    MergeConsecutive,
    NumberRows,
    RemapColumns,
    RemoveColumns,
    RemoveRows,
    RenameColumns,
    ReorderColumns,
    SplitRows,
    SummarizeColumnNames,
    SummarizeColumnValues,
}

impl OperationKind {
    pub const ALL: [OperationKind; 11] = [
        OperationKind::FactorColumn,
        OperationKind::MergeConsecutive,
        OperationKind::NumberRows,
        OperationKind::RemapColumns,
        OperationKind::RemoveColumns,
        OperationKind::RemoveRows,
        OperationKind::RenameColumns,
        OperationKind::ReorderColumns,
        OperationKind::SplitRows,
        OperationKind::SummarizeColumnNames,
        OperationKind::SummarizeColumnValues,
    ];

    /// Registry name (the spelling pipeline specs use).
    pub fn name(self) -> &'static str {
        match self {
            OperationKind::FactorColumn => "factor_column",
            OperationKind::MergeConsecutive => "merge_consecutive",
            OperationKind::NumberRows => "number_rows",
            OperationKind::RemapColumns => "remap_columns",
            OperationKind::RemoveColumns => "remove_columns",
            OperationKind::RemoveRows => "remove_rows",
            OperationKind::RenameColumns => "rename_columns",
            OperationKind::ReorderColumns => "reorder_columns",
            OperationKind::SplitRows => "split_rows",
            OperationKind::SummarizeColumnNames => "summarize_column_names",
            OperationKind::SummarizeColumnValues => "summarize_column_values",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Parameter schema of this kind.
    pub fn schema(self) -> &'static ParamSchema {
        match self {
            OperationKind::FactorColumn => &factor_column::SCHEMA,
            OperationKind::MergeConsecutive => &merge_consecutive::SCHEMA,
            OperationKind::NumberRows => &number_rows::SCHEMA,
            OperationKind::RemapColumns => &remap_columns::SCHEMA,
            OperationKind::RemoveColumns => &remove_columns::SCHEMA,
            OperationKind::RemoveRows => &remove_rows::SCHEMA,
            OperationKind::RenameColumns => &rename_columns::SCHEMA,
            OperationKind::ReorderColumns => &reorder_columns::SCHEMA,
            OperationKind::SplitRows => &split_rows::SCHEMA,
            OperationKind::SummarizeColumnNames => &summarize::column_names::SCHEMA,
            OperationKind::SummarizeColumnValues => &summarize::column_values::SCHEMA,
        }
    }

    /// Whether instances of this kind carry the accumulate/report capability.
    pub fn is_summarizer(self) -> bool {
        matches!(
            self,
            OperationKind::SummarizeColumnNames | OperationKind::SummarizeColumnValues
        )
    }

    /// Validate `params` against the kind's schema and construct an instance.
    ///
    /// Fails with the complete violation list; on success the instance is
    /// bound to this one parameter set for its lifetime.
    pub fn build(
        self,
        params: &Map<String, Value>,
    ) -> Result<Box<dyn Operation>, InvalidParameters> {
        let violations = self.schema().validate(params);
        if !violations.is_empty() {
            return Err(InvalidParameters {
                operation: self.name(),
                violations,
            });
        }
        let op = match self {
            OperationKind::FactorColumn => factor_column::build(params),
            OperationKind::MergeConsecutive => merge_consecutive::build(params),
            OperationKind::NumberRows => number_rows::build(params),
            OperationKind::RemapColumns => remap_columns::build(params),
            OperationKind::RemoveColumns => remove_columns::build(params),
            OperationKind::RemoveRows => remove_rows::build(params),
            OperationKind::RenameColumns => rename_columns::build(params),
            OperationKind::ReorderColumns => reorder_columns::build(params),
            OperationKind::SplitRows => split_rows::build(params),
            OperationKind::SummarizeColumnNames => summarize::column_names::build(params),
            OperationKind::SummarizeColumnValues => summarize::column_values::build(params),
        }?;
        tracing::debug!(operation = self.name(), "operation instance built");
        Ok(op)
    }
}

/// Resolve an operation name against the registry.
pub fn resolve(name: &str) -> Result<OperationKind, UnknownOperation> {
    OperationKind::from_name(name).ok_or_else(|| UnknownOperation(name.to_string()))
}

/// Registered operation names, in catalog order.
pub fn names() -> impl Iterator<Item = &'static str> {
    OperationKind::ALL.into_iter().map(OperationKind::name)
}
