//! Pipeline executor.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use retab_core::manifest::RunManifest;
use retab_core::types::Table;
use retab_ops::{OpError, SummaryReport};
use retab_pipeline::Pipeline;

/// A runtime failure scoped to one table.
#[derive(Debug, Error)]
#[error("operation '{operation}' failed on table '{table_id}': {source}")]
pub struct TableFailure {
    pub table_id: String,
    pub operation: String,
    #[source]
    pub source: OpError,
}

/// What to do when one table's chain fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Record the failure and continue with the remaining tables.
    #[default]
    Continue,
    /// Abort the run; remaining tables are never started.
    FailFast,
}

/// Cooperative cancellation: flipping the token stops the run before the
/// next table starts. In-flight work completes, and summary state already
/// accumulated stays valid (it is additive, never rolled back).
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of one run.
pub struct RunOutcome {
    /// Fully transformed tables, in input order, keyed by table identifier.
    pub tables: Vec<(String, Table)>,

    /// Per-table failures, in the order they occurred.
    pub failures: Vec<TableFailure>,

    /// True when the run stopped early (fail-fast or cancellation) and some
    /// input tables were never started.
    pub aborted: bool,

    /// Provenance record for the run.
    pub manifest: RunManifest,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && !self.aborted
    }

    /// JSON rendering of the per-table failures, for run logs.
    pub fn failures_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.failures
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "table_id": f.table_id,
                        "operation": f.operation,
                        "cause": f.source.to_string(),
                    })
                })
                .collect(),
        )
    }
}

/// Applies a built pipeline to the tables of a dataset, one at a time.
///
/// A summarizer observes each table as it exists at the summarizer's own
/// position in the pipeline: after the transforms before it, before the
/// transforms after it. Placement is therefore significant: the same
/// summarizer before and after a row-splitting transform reports different
/// row counts.
pub struct Executor {
    pipeline: Pipeline,
    policy: ErrorPolicy,
    cancel: CancelToken,
}

impl Executor {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            policy: ErrorPolicy::default(),
            cancel: CancelToken::new(),
        }
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Install a caller-held cancellation token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Fold one table through every operation in pipeline order.
    ///
    /// Summarizers accumulate under `table_id` before passing the table
    /// through unchanged. A failure aborts this table's chain only.
    pub fn execute_table(&self, mut table: Table, table_id: &str) -> Result<Table, TableFailure> {
        for op in self.pipeline.operations() {
            if let Some(summarizer) = op.as_summarizer() {
                summarizer
                    .accumulate(&table, table_id)
                    .map_err(|source| TableFailure {
                        table_id: table_id.to_string(),
                        operation: op.name().to_string(),
                        source,
                    })?;
            }
            table = op.apply(table).map_err(|source| TableFailure {
                table_id: table_id.to_string(),
                operation: op.name().to_string(),
                source,
            })?;
        }
        Ok(table)
    }

    /// Run the pipeline over a sequence of `(table, identifier)` pairs.
    ///
    /// Under `ErrorPolicy::Continue` a failing table is recorded and the run
    /// moves on; under `ErrorPolicy::FailFast` the first failure aborts the
    /// run and the remaining tables are never started.
    pub fn run(&self, tables: impl IntoIterator<Item = (Table, String)>) -> RunOutcome {
        let started_ms = now_ms();
        let mut outcome = RunOutcome {
            tables: Vec::new(),
            failures: Vec::new(),
            aborted: false,
            manifest: RunManifest::new(self.pipeline.spec_hash(), started_ms),
        };

        for (table, table_id) in tables {
            if self.cancel.is_cancelled() {
                tracing::info!("run cancelled; remaining tables not started");
                outcome.aborted = true;
                break;
            }
            match self.execute_table(table, &table_id) {
                Ok(transformed) => {
                    tracing::debug!(table = %table_id, rows = transformed.num_rows(), "table processed");
                    outcome.tables.push((table_id, transformed));
                }
                Err(failure) => {
                    tracing::warn!(table = %table_id, error = %failure, "table failed");
                    outcome.failures.push(failure);
                    if self.policy == ErrorPolicy::FailFast {
                        outcome.aborted = true;
                        break;
                    }
                }
            }
        }

        outcome.manifest.tables_processed =
            outcome.tables.iter().map(|(id, _)| id.clone()).collect();
        outcome.manifest.tables_failed = outcome
            .failures
            .iter()
            .map(|f| (f.table_id.clone(), f.operation.clone()))
            .collect();
        outcome.manifest.summaries = self
            .pipeline
            .summarizers()
            .map(|s| s.summary_name().to_string())
            .collect();
        outcome.manifest.finished_ms = now_ms();
        outcome
    }

    /// Reports from every summarizer in the pipeline, keyed by summary name.
    ///
    /// Callable at any time; before any table has been accumulated each
    /// report reflects an empty dataset rather than failing.
    pub fn reports(&self) -> BTreeMap<String, SummaryReport> {
        self.pipeline
            .summarizers()
            .map(|s| (s.summary_name().to_string(), s.report()))
            .collect()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
