//! Shared helpers for the integration tests.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use retab_core::types::{Column, Scalar, Table};
use serde_json::{Map, Value};

/// A small event table: four trials with onset/duration/trial_type and a
/// numeric response_time column.
pub fn make_events_table() -> Table {
    Table {
        columns: vec![
            Column::new(
                "onset",
                vec![
                    Scalar::F64(0.5),
                    Scalar::F64(5.0),
                    Scalar::F64(9.0),
                    Scalar::F64(13.0),
                ],
            ),
            Column::new(
                "duration",
                vec![
                    Scalar::F64(0.5),
                    Scalar::F64(0.5),
                    Scalar::F64(0.5),
                    Scalar::F64(0.5),
                ],
            ),
            Column::new(
                "trial_type",
                vec![
                    Scalar::Str("go".into()),
                    Scalar::Str("stop".into()),
                    Scalar::Str("go".into()),
                    Scalar::Str("stop".into()),
                ],
            ),
            Column::new(
                "response_time",
                vec![
                    Scalar::F64(0.32),
                    Scalar::F64(0.41),
                    Scalar::F64(0.28),
                    Scalar::F64(0.44),
                ],
            ),
        ],
    }
}

/// An event table missing the `response_time` column.
pub fn make_sparse_table() -> Table {
    Table {
        columns: vec![
            Column::new("onset", vec![Scalar::F64(1.0), Scalar::F64(2.0)]),
            Column::new("duration", vec![Scalar::F64(0.5), Scalar::F64(0.5)]),
            Column::new(
                "trial_type",
                vec![Scalar::Str("go".into()), Scalar::Str("stop".into())],
            ),
        ],
    }
}

/// Turn a `json!` object literal into the parameter map form operations take.
pub fn params(value: Value) -> Map<String, Value> {
    value
        .as_object()
        .expect("parameter literal must be a JSON object")
        .clone()
}

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Fresh temp directory per call so tests never share files.
pub fn create_temp_dir(label: &str) -> PathBuf {
    let n = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "retab-test-{}-{}-{}",
        label,
        std::process::id(),
        n
    ));
    std::fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}
