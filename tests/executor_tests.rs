//! Executor tests: per-table folding, failure isolation, fail-fast,
//! cancellation, and manifests.

mod test_data_gen;

use retab_core::types::Scalar;
use retab_exec::{CancelToken, ErrorPolicy, Executor};
use retab_pipeline::{build, from_json_str, Pipeline};
use test_data_gen::{make_events_table, make_sparse_table};

fn pipeline(src: &str) -> Pipeline {
    build(&from_json_str(src).expect("spec should decode")).expect("build should succeed")
}

#[test]
fn empty_table_sequence_yields_empty_outputs_and_no_data_reports() {
    let executor = Executor::new(pipeline(
        r#"[{"name": "summarize_column_names", "parameters": {"summary_name": "cols"}}]"#,
    ));
    let outcome = executor.run(Vec::new());
    assert!(outcome.tables.is_empty());
    assert!(outcome.failures.is_empty());
    assert!(!outcome.aborted);

    let reports = executor.reports();
    let report = reports.get("cols").expect("report should exist");
    assert_eq!(report.content["dataset"]["total_files"], 0);
}

#[test]
fn summarizers_pass_tables_through_unchanged() {
    let executor = Executor::new(pipeline(
        r#"[{"name": "summarize_column_values", "parameters": {"summary_name": "values"}}]"#,
    ));
    let table = make_events_table();
    let result = executor
        .execute_table(table.clone(), "sub-01_events.tsv")
        .expect("identity pipeline should succeed");
    assert_eq!(result, table);
}

#[test]
fn one_failing_table_does_not_disturb_the_others() {
    // remove_columns requires response_time; the second table lacks it.
    let executor = Executor::new(pipeline(
        r#"[
            {"name": "summarize_column_names", "parameters": {"summary_name": "cols"}},
            {"name": "remove_columns",
             "parameters": {"column_names": ["response_time"], "ignore_missing": false}}
        ]"#,
    ));
    let outcome = executor.run(vec![
        (make_events_table(), "sub-01_events.tsv".to_string()),
        (make_sparse_table(), "sub-02_events.tsv".to_string()),
        (make_events_table(), "sub-03_events.tsv".to_string()),
    ]);

    assert!(!outcome.aborted);
    assert_eq!(outcome.tables.len(), 2);
    assert_eq!(outcome.tables[0].0, "sub-01_events.tsv");
    assert_eq!(outcome.tables[1].0, "sub-03_events.tsv");
    for (_, table) in &outcome.tables {
        assert!(table.column_index("response_time").is_none());
    }

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].table_id, "sub-02_events.tsv");
    assert_eq!(outcome.failures[0].operation, "remove_columns");
    assert!(outcome.failures[0].to_string().contains("response_time"));
}

#[test]
fn fail_fast_stops_before_later_tables_start() {
    // The summarizer sits after the failing operation, so it only ever sees
    // tables that survived it.
    let executor = Executor::new(pipeline(
        r#"[
            {"name": "remove_columns",
             "parameters": {"column_names": ["response_time"], "ignore_missing": false}},
            {"name": "summarize_column_names", "parameters": {"summary_name": "cols"}}
        ]"#,
    ))
    .with_policy(ErrorPolicy::FailFast);

    let outcome = executor.run(vec![
        (make_events_table(), "sub-01_events.tsv".to_string()),
        (make_sparse_table(), "sub-02_events.tsv".to_string()),
        (make_events_table(), "sub-03_events.tsv".to_string()),
    ]);

    assert!(outcome.aborted);
    assert_eq!(outcome.tables.len(), 1);
    assert_eq!(outcome.failures.len(), 1);

    let reports = executor.reports();
    let content = &reports["cols"].content;
    assert_eq!(content["dataset"]["total_files"], 1);
    assert!(content["individual"].get("sub-03_events.tsv").is_none());
}

#[test]
fn cancellation_prevents_new_tables_from_starting() {
    let cancel = CancelToken::new();
    let executor = Executor::new(pipeline(
        r#"[{"name": "number_rows", "parameters": {"number_column_name": "n"}}]"#,
    ))
    .with_cancel(cancel.clone());

    cancel.cancel();
    let outcome = executor.run(vec![(make_events_table(), "sub-01_events.tsv".to_string())]);
    assert!(outcome.aborted);
    assert!(outcome.tables.is_empty());
    assert!(outcome.failures.is_empty());
}

#[test]
fn manifests_record_processed_and_failed_tables() {
    let executor = Executor::new(pipeline(
        r#"[
            {"name": "remove_columns",
             "parameters": {"column_names": ["response_time"], "ignore_missing": false}},
            {"name": "summarize_column_names", "parameters": {"summary_name": "cols"}}
        ]"#,
    ));
    let spec_hash = executor.pipeline().spec_hash();
    let outcome = executor.run(vec![
        (make_events_table(), "sub-01_events.tsv".to_string()),
        (make_sparse_table(), "sub-02_events.tsv".to_string()),
    ]);

    assert_eq!(outcome.manifest.spec_hash, spec_hash);
    assert_eq!(
        outcome.manifest.tables_processed,
        vec!["sub-01_events.tsv".to_string()]
    );
    assert_eq!(
        outcome.manifest.tables_failed,
        vec![("sub-02_events.tsv".to_string(), "remove_columns".to_string())]
    );
    assert_eq!(outcome.manifest.summaries, vec!["cols".to_string()]);
    assert!(outcome.manifest.finished_ms >= outcome.manifest.started_ms);

    let failures = outcome.failures_json();
    assert_eq!(failures[0]["operation"], "remove_columns");
}

#[test]
fn empty_pipeline_passes_tables_through() {
    let executor = Executor::new(build(&[]).expect("empty build"));
    let table = make_events_table();
    let outcome = executor.run(vec![(table.clone(), "sub-01_events.tsv".to_string())]);
    assert_eq!(outcome.tables.len(), 1);
    assert_eq!(outcome.tables[0].1, table);
}

#[test]
fn transform_chain_composes_in_order() {
    // rename feeds the factor step; the engine must apply them in spec order.
    let executor = Executor::new(pipeline(
        r#"[
            {"name": "rename_columns",
             "parameters": {"column_mapping": {"trial_type": "condition"},
                            "ignore_missing": false}},
            {"name": "factor_column",
             "parameters": {"column_name": "condition",
                            "factor_values": ["go"],
                            "factor_names": ["is_go"]}}
        ]"#,
    ));
    let result = executor
        .execute_table(make_events_table(), "sub-01_events.tsv")
        .expect("chain should succeed");
    assert!(result.column_index("condition").is_some());
    let is_go = result.column("is_go").expect("factor column should exist");
    assert_eq!(
        is_go.values,
        vec![
            Scalar::I64(1),
            Scalar::I64(0),
            Scalar::I64(1),
            Scalar::I64(0)
        ]
    );
}

#[test]
fn reversed_order_fails_deterministically_when_preconditions_break() {
    // Factoring a column that will only exist after the rename must fail on
    // the missing column, and identically on every run.
    let executor = Executor::new(pipeline(
        r#"[
            {"name": "factor_column",
             "parameters": {"column_name": "condition",
                            "factor_values": ["go"],
                            "factor_names": ["is_go"]}},
            {"name": "rename_columns",
             "parameters": {"column_mapping": {"trial_type": "condition"},
                            "ignore_missing": false}}
        ]"#,
    ));
    for _ in 0..2 {
        let failure = executor
            .execute_table(make_events_table(), "sub-01_events.tsv")
            .expect_err("reversed order should fail");
        assert_eq!(failure.operation, "factor_column");
        assert!(failure.to_string().contains("condition"));
    }
}

#[test]
fn engine_matches_manual_application() {
    use retab_ops::Operation as _;
    use serde_json::json;
    use test_data_gen::params;

    let rename = retab_ops::OperationKind::RenameColumns
        .build(&params(json!({
            "column_mapping": {"trial_type": "condition"},
            "ignore_missing": false,
        })))
        .expect("rename should build");
    let factor = retab_ops::OperationKind::FactorColumn
        .build(&params(json!({
            "column_name": "condition",
            "factor_values": ["go"],
            "factor_names": ["is_go"],
        })))
        .expect("factor should build");

    let manual = factor
        .apply(rename.apply(make_events_table()).expect("rename"))
        .expect("factor");

    let executor = Executor::new(pipeline(
        r#"[
            {"name": "rename_columns",
             "parameters": {"column_mapping": {"trial_type": "condition"},
                            "ignore_missing": false}},
            {"name": "factor_column",
             "parameters": {"column_name": "condition",
                            "factor_values": ["go"],
                            "factor_names": ["is_go"]}}
        ]"#,
    ));
    let engine = executor
        .execute_table(make_events_table(), "sub-01_events.tsv")
        .expect("engine run");

    assert_eq!(engine, manual);
}
