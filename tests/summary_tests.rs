//! Summarizer tests: overwrite semantics, placement sensitivity, and report
//! shape.

mod test_data_gen;

use retab_exec::Executor;
use retab_pipeline::{build, from_json_str, Pipeline};
use test_data_gen::{make_events_table, make_sparse_table};

fn pipeline(src: &str) -> Pipeline {
    build(&from_json_str(src).expect("spec should decode")).expect("build should succeed")
}

#[test]
fn accumulating_the_same_identifier_twice_overwrites() {
    let executor = Executor::new(pipeline(
        r#"[{"name": "summarize_column_values", "parameters": {"summary_name": "values"}}]"#,
    ));

    executor
        .execute_table(make_events_table(), "sub-01_events.tsv")
        .expect("first pass");
    let once = executor.reports()["values"].content.clone();

    executor
        .execute_table(make_events_table(), "sub-01_events.tsv")
        .expect("second pass");
    let twice = executor.reports()["values"].content.clone();

    assert_eq!(once, twice);
    assert_eq!(twice["dataset"]["total_files"], 1);
    assert_eq!(twice["dataset"]["total_events"], 4);
}

#[test]
fn reaccumulating_a_changed_table_replaces_its_contribution() {
    let executor = Executor::new(pipeline(
        r#"[{"name": "summarize_column_values", "parameters": {"summary_name": "values"}}]"#,
    ));

    executor
        .execute_table(make_events_table(), "sub-01_events.tsv")
        .expect("first pass");
    executor
        .execute_table(make_sparse_table(), "sub-01_events.tsv")
        .expect("second pass");

    let content = &executor.reports()["values"].content;
    assert_eq!(content["dataset"]["total_files"], 1);
    assert_eq!(content["dataset"]["total_events"], 2);
}

#[test]
fn summarizer_placement_is_position_sensitive() {
    // The same summarizer kind before and after split_rows observes different
    // row counts: splitting doubles the four trials into eight rows.
    let executor = Executor::new(pipeline(
        r#"[
            {"name": "summarize_column_values",
             "parameters": {"summary_name": "before"}},
            {"name": "split_rows",
             "parameters": {
                "anchor_column": "trial_type",
                "new_events": {
                    "response": {"onset_source": ["response_time"],
                                 "duration": [0.25],
                                 "copy_columns": ["response_time"]}},
                "remove_parent_row": false}},
            {"name": "summarize_column_values",
             "parameters": {"summary_name": "after"}}
        ]"#,
    ));

    executor
        .execute_table(make_events_table(), "sub-01_events.tsv")
        .expect("split should succeed");

    let reports = executor.reports();
    assert_eq!(reports["before"].content["dataset"]["total_events"], 4);
    assert_eq!(reports["after"].content["dataset"]["total_events"], 8);
}

#[test]
fn column_name_patterns_group_files() {
    let executor = Executor::new(pipeline(
        r#"[{"name": "summarize_column_names", "parameters": {"summary_name": "cols"}}]"#,
    ));

    let outcome = executor.run(vec![
        (make_events_table(), "sub-01_events.tsv".to_string()),
        (make_sparse_table(), "sub-02_events.tsv".to_string()),
        (make_events_table(), "sub-03_events.tsv".to_string()),
    ]);
    assert!(outcome.is_success());

    let content = &executor.reports()["cols"].content;
    assert_eq!(content["dataset"]["total_files"], 3);
    assert_eq!(content["dataset"]["unique_column_patterns"], 2);

    let patterns = content["dataset"]["patterns"]
        .as_array()
        .expect("patterns should be a list");
    let wide = patterns
        .iter()
        .find(|p| {
            p["files"]
                .as_array()
                .is_some_and(|files| files.len() == 2)
        })
        .expect("two files share the four-column pattern");
    assert_eq!(wide["column_names"].as_array().unwrap().len(), 4);
}

#[test]
fn value_counts_merge_across_files() {
    let executor = Executor::new(pipeline(
        r#"[{"name": "summarize_column_values",
             "parameters": {"summary_name": "values",
                            "skip_columns": ["onset", "duration"],
                            "value_columns": ["response_time"]}}]"#,
    ));

    let outcome = executor.run(vec![
        (make_events_table(), "sub-01_events.tsv".to_string()),
        (make_events_table(), "sub-02_events.tsv".to_string()),
    ]);
    assert!(outcome.is_success());

    let content = &executor.reports()["values"].content;
    assert_eq!(content["dataset"]["total_events"], 8);
    assert_eq!(content["dataset"]["categorical"]["trial_type"]["go"], 4);
    assert_eq!(content["dataset"]["categorical"]["trial_type"]["stop"], 4);
    assert_eq!(content["dataset"]["value_counts"]["response_time"], 8);
    assert!(content["dataset"]["categorical"].get("onset").is_none());

    let individual = &content["individual"]["sub-01_events.tsv"];
    assert_eq!(individual["total_events"], 4);
    assert_eq!(individual["categorical"]["trial_type"]["go"], 2);
}

#[test]
fn report_filenames_default_from_the_summary_name() {
    let executor = Executor::new(pipeline(
        r#"[
            {"name": "summarize_column_names",
             "parameters": {"summary_name": "cols",
                            "summary_filename": "column_report.json"}},
            {"name": "summarize_column_values",
             "parameters": {"summary_name": "values"}}
        ]"#,
    ));
    let reports = executor.reports();
    assert_eq!(reports["cols"].filename, "column_report.json");
    assert_eq!(reports["values"].filename, "values.json");
}
