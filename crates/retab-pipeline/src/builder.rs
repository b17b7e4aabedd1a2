//! All-or-nothing pipeline construction.

use std::collections::HashSet;

use serde_json::Value;

use retab_core::hash::hash_serde;
use retab_ops::registry::{self, OperationKind};
use retab_ops::{Operation, Violation};

use crate::pipeline::Pipeline;
use crate::spec::OperationSpec;

/// Everything wrong with one spec entry.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BuildViolation {
    pub index: usize,
    pub name: String,
    pub violations: Vec<Violation>,
}

/// Aggregate build failure: every violation at every index, so a spec can be
/// fixed in one pass. No pipeline exists when this is returned.
#[derive(Debug)]
pub struct PipelineBuildError {
    pub entries: Vec<BuildViolation>,
}

impl std::error::Error for PipelineBuildError {}

impl std::fmt::Display for PipelineBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "pipeline spec has {} invalid {}:",
            self.entries.len(),
            if self.entries.len() == 1 {
                "entry"
            } else {
                "entries"
            }
        )?;
        for entry in &self.entries {
            writeln!(f, "  [{}] {}:", entry.index, entry.name)?;
            for violation in &entry.violations {
                writeln!(f, "    - {}", violation)?;
            }
        }
        Ok(())
    }
}

/// Build a pipeline from an ordered spec list.
///
/// Pass 1 resolves every name and validates every parameter mapping,
/// accumulating violations across the whole list; an unknown name is a
/// violation at its index, and a summarizer reusing an earlier entry's
/// `summary_name` is flagged at the later index. Only a completely clean
/// list reaches pass 2, which instantiates the operations, so a failed
/// build never constructs any operation instance.
pub fn build(specs: &[OperationSpec]) -> Result<Pipeline, PipelineBuildError> {
    let mut entries: Vec<BuildViolation> = Vec::new();
    let mut resolved: Vec<OperationKind> = Vec::with_capacity(specs.len());
    let mut summary_names: HashSet<&str> = HashSet::new();

    for (index, spec) in specs.iter().enumerate() {
        match registry::resolve(&spec.name) {
            Err(err) => {
                entries.push(BuildViolation {
                    index,
                    name: spec.name.clone(),
                    violations: vec![Violation::new("name", err.to_string())],
                });
            }
            Ok(kind) => {
                let mut violations = kind.schema().validate(&spec.parameters);
                if kind.is_summarizer() {
                    if let Some(summary) =
                        spec.parameters.get("summary_name").and_then(Value::as_str)
                    {
                        if !summary_names.insert(summary) {
                            violations.push(Violation::new(
                                "summary_name",
                                format!("summary name '{}' is already used", summary),
                            ));
                        }
                    }
                }
                if violations.is_empty() {
                    resolved.push(kind);
                } else {
                    entries.push(BuildViolation {
                        index,
                        name: spec.name.clone(),
                        violations,
                    });
                }
            }
        }
    }

    if !entries.is_empty() {
        return Err(PipelineBuildError { entries });
    }

    let mut ops: Vec<Box<dyn Operation>> = Vec::with_capacity(specs.len());
    for ((index, spec), kind) in specs.iter().enumerate().zip(resolved) {
        match kind.build(&spec.parameters) {
            Ok(op) => ops.push(op),
            Err(err) => entries.push(BuildViolation {
                index,
                name: spec.name.clone(),
                violations: err.violations,
            }),
        }
    }
    if !entries.is_empty() {
        return Err(PipelineBuildError { entries });
    }

    let spec_hash = hash_serde(&specs).unwrap_or_else(|_| retab_core::hash::hash_str(""));
    tracing::info!(
        operations = ops.len(),
        spec_hash = %spec_hash,
        "pipeline built"
    );
    Ok(Pipeline::new(ops, spec_hash))
}
