//! Parameter schema validation tests.

mod test_data_gen;

use retab_ops::registry::OperationKind;
use serde_json::json;
use test_data_gen::params;

#[test]
fn all_violations_are_accumulated() {
    // Missing required key, an unrecognized key, and a type mismatch must all
    // be reported in one pass.
    let candidate = params(json!({
        "ignore_missing": "yes",
        "extra": 1,
    }));
    let violations = OperationKind::RenameColumns.schema().validate(&candidate);
    assert_eq!(violations.len(), 3, "violations: {:?}", violations);
    assert_eq!(violations[0].key, "column_mapping");
    assert!(violations[0].reason.contains("required"));
    assert_eq!(violations[1].key, "extra");
    assert!(violations[1].reason.contains("unrecognized"));
    assert_eq!(violations[2].key, "ignore_missing");
    assert!(violations[2].reason.contains("boolean"));
}

#[test]
fn clean_parameters_produce_no_violations() {
    let candidate = params(json!({
        "column_mapping": {"stim_file": "stimulus"},
        "ignore_missing": false,
    }));
    let violations = OperationKind::RenameColumns.schema().validate(&candidate);
    assert!(violations.is_empty(), "violations: {:?}", violations);
}

#[test]
fn factor_names_require_factor_values() {
    let candidate = params(json!({
        "column_name": "trial_type",
        "factor_names": ["is_go"],
    }));
    let violations = OperationKind::FactorColumn.schema().validate(&candidate);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].key, "factor_names");
    assert!(violations[0].reason.contains("factor_values"));
}

#[test]
fn factor_names_must_match_factor_values_length() {
    let candidate = params(json!({
        "column_name": "trial_type",
        "factor_values": ["go", "stop"],
        "factor_names": ["is_go"],
    }));
    let violations = OperationKind::FactorColumn.schema().validate(&candidate);
    assert_eq!(violations.len(), 1);
    assert!(violations[0].reason.contains("same length"));
}

#[test]
fn remap_entries_must_have_source_plus_destination_cells() {
    let candidate = params(json!({
        "source_columns": ["trial_type", "response"],
        "destination_columns": ["code"],
        "map_list": [["go", "left", 1], ["stop", "right"]],
        "ignore_missing": false,
    }));
    let violations = OperationKind::RemapColumns.schema().validate(&candidate);
    assert_eq!(violations.len(), 1, "violations: {:?}", violations);
    assert_eq!(violations[0].key, "map_list");
    assert!(violations[0].reason.contains("entry 1"));
}

#[test]
fn list_shapes_are_enforced() {
    let candidate = params(json!({
        "column_names": ["a", 3],
        "ignore_missing": true,
    }));
    let violations = OperationKind::RemoveColumns.schema().validate(&candidate);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].key, "column_names");
    assert!(violations[0].reason.contains("list of strings"));
}

#[test]
fn exactly_one_of_constraints_are_checked() {
    use retab_ops::{CrossCheck, FieldSpec, ParamKind, ParamSchema};

    static SCHEMA: ParamSchema = ParamSchema {
        operation: "example",
        fields: &[
            FieldSpec::optional("column_name", ParamKind::String),
            FieldSpec::optional("column_names", ParamKind::StringList),
        ],
        checks: &[CrossCheck::ExactlyOneOf {
            keys: &["column_name", "column_names"],
        }],
    };

    let neither = params(json!({}));
    assert_eq!(SCHEMA.validate(&neither).len(), 1);

    let both = params(json!({"column_name": "a", "column_names": ["b"]}));
    assert_eq!(SCHEMA.validate(&both).len(), 1);

    let one = params(json!({"column_name": "a"}));
    assert!(SCHEMA.validate(&one).is_empty());
}

#[test]
fn duplicate_reorder_entries_are_rejected() {
    let candidate = params(json!({
        "column_order": ["onset", "duration", "onset"],
        "ignore_missing": false,
        "keep_others": true,
    }));
    let violations = OperationKind::ReorderColumns.schema().validate(&candidate);
    assert_eq!(violations.len(), 1);
    assert!(violations[0].reason.contains("more than once"));
}
