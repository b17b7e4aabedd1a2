//! TSV reading/writing and dataset discovery tests.

mod test_data_gen;

use std::fs;

use retab_core::types::Scalar;
use retab_io::{find_data_files, read_tsv, relative_id, write_tsv, DatasetSource};
use test_data_gen::{create_temp_dir, make_events_table};

#[test]
fn columns_are_type_inferred_on_read() {
    let dir = create_temp_dir("tsv-read");
    let path = dir.join("sub-01_events.tsv");
    fs::write(
        &path,
        "onset\tduration\ttrial_type\tsample\n\
         0.5\t0.5\tgo\t25\n\
         5.0\tn/a\tstop\t250\n\
         9.25\t0.5\tn/a\t450\n",
    )
    .expect("write fixture");

    let table = read_tsv(&path).expect("read should succeed");
    assert_eq!(table.num_rows(), 3);
    assert_eq!(
        table.column_names(),
        vec!["onset", "duration", "trial_type", "sample"]
    );
    // Whole-number cells in a fractional column stay floats; pure-integer
    // columns become integers; n/a becomes null.
    assert_eq!(table.column("onset").unwrap().values[0], Scalar::F64(0.5));
    assert_eq!(table.column("duration").unwrap().values[1], Scalar::Null);
    assert_eq!(table.column("sample").unwrap().values[2], Scalar::I64(450));
    assert_eq!(table.column("trial_type").unwrap().values[2], Scalar::Null);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn tables_round_trip_through_tsv() {
    let dir = create_temp_dir("tsv-roundtrip");
    let path = dir.join("sub-01_events.tsv");

    let table = make_events_table();
    write_tsv(&table, &path).expect("write should succeed");
    let back = read_tsv(&path).expect("read should succeed");

    assert_eq!(back.column_names(), table.column_names());
    assert_eq!(back.num_rows(), table.num_rows());
    assert_eq!(back.column("onset").unwrap().values[0], Scalar::F64(0.5));
    assert_eq!(
        back.column("trial_type").unwrap().values[1],
        Scalar::Str("stop".into())
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn discovery_filters_by_suffix_and_skips_excluded_dirs() {
    let dir = create_temp_dir("discovery");
    fs::create_dir_all(dir.join("sub-01")).expect("mkdir");
    fs::create_dir_all(dir.join("derivatives")).expect("mkdir");
    fs::write(
        dir.join("sub-01").join("sub-01_events.tsv"),
        "onset\tduration\n1.0\t0.5\n",
    )
    .expect("write");
    fs::write(dir.join("sub-02_events.tsv"), "onset\tduration\n2.0\t0.5\n").expect("write");
    fs::write(dir.join("README.md"), "not data\n").expect("write");
    fs::write(
        dir.join("derivatives").join("sub-03_events.tsv"),
        "onset\tduration\n3.0\t0.5\n",
    )
    .expect("write");

    let files = find_data_files(&dir, "_events.tsv", &["derivatives".to_string()])
        .expect("discovery should succeed");
    let ids: Vec<String> = files.iter().map(|f| relative_id(&dir, f)).collect();
    assert_eq!(ids, vec!["sub-01/sub-01_events.tsv", "sub-02_events.tsv"]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn dataset_source_yields_tables_with_relative_identifiers() {
    let dir = create_temp_dir("dataset-source");
    fs::write(dir.join("sub-01_events.tsv"), "onset\tduration\n1.0\t0.5\n").expect("write");
    fs::write(dir.join("sub-02_events.tsv"), "onset\tduration\n2.0\t0.5\n").expect("write");

    let source = DatasetSource::new(&dir, "_events.tsv", &[]).expect("source should open");
    let pairs: Vec<_> = source
        .collect::<Result<Vec<_>, _>>()
        .expect("all files should read");
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].1, "sub-01_events.tsv");
    assert_eq!(pairs[0].0.num_rows(), 1);

    let _ = fs::remove_dir_all(&dir);
}
