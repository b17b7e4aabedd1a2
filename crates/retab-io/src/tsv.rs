//! Tab-separated event files in and out of the core table model.
//!
//! Cells holding `n/a` (or nothing) are null. After reading, each column is
//! inferred as integer, float, or text: a column is numeric only when every
//! non-null cell parses.

use std::fs::File;
use std::path::Path;

use retab_core::types::{Column, Scalar, Table};

use crate::IoError;

fn path_str(path: &Path) -> String {
    path.display().to_string()
}

/// Read one tab-separated file (header row required) into a table.
pub fn read_tsv(path: &Path) -> Result<Table, IoError> {
    let file = File::open(path).map_err(|source| IoError::Io {
        path: path_str(path),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| IoError::Csv {
            path: path_str(path),
            source,
        })?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.map_err(|source| IoError::Csv {
            path: path_str(path),
            source,
        })?;
        if record.len() != headers.len() {
            return Err(IoError::Format {
                path: path_str(path),
                reason: format!(
                    "row {} has {} cells, expected {}",
                    record.position().map(|p| p.line()).unwrap_or(0),
                    record.len(),
                    headers.len()
                ),
            });
        }
        for (col, cell) in record.iter().enumerate() {
            raw[col].push(cell.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| infer_column(name, cells))
        .collect();
    let table = Table::new(columns).map_err(|e| IoError::Format {
        path: path_str(path),
        reason: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), rows = table.num_rows(), "read table");
    Ok(table)
}

/// Write a table as a tab-separated file (nulls render as `n/a`).
pub fn write_tsv(table: &Table, path: &Path) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| IoError::Io {
            path: path_str(path),
            source,
        })?;
    }
    let file = File::create(path).map_err(|source| IoError::Io {
        path: path_str(path),
        source,
    })?;
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(file);

    let map_csv = |source: csv::Error| IoError::Csv {
        path: path_str(path),
        source,
    };
    writer
        .write_record(table.column_names())
        .map_err(map_csv)?;
    for row in 0..table.num_rows() {
        let cells: Vec<String> = table
            .columns
            .iter()
            .map(|col| col.values[row].to_string())
            .collect();
        writer.write_record(&cells).map_err(map_csv)?;
    }
    writer.flush().map_err(|source| IoError::Io {
        path: path_str(path),
        source,
    })?;
    Ok(())
}

fn is_null_cell(cell: &str) -> bool {
    cell.is_empty() || cell == "n/a"
}

fn infer_column(name: String, cells: Vec<String>) -> Column {
    let non_null: Vec<&String> = cells.iter().filter(|c| !is_null_cell(c)).collect();

    if !non_null.is_empty() && non_null.iter().all(|c| c.parse::<i64>().is_ok()) {
        let values = cells
            .iter()
            .map(|c| {
                if is_null_cell(c) {
                    Scalar::Null
                } else {
                    c.parse::<i64>().map(Scalar::I64).unwrap_or(Scalar::Null)
                }
            })
            .collect();
        return Column::new(name, values);
    }

    if !non_null.is_empty() && non_null.iter().all(|c| c.parse::<f64>().is_ok()) {
        let values = cells
            .iter()
            .map(|c| {
                if is_null_cell(c) {
                    Scalar::Null
                } else {
                    c.parse::<f64>().map(Scalar::F64).unwrap_or(Scalar::Null)
                }
            })
            .collect();
        return Column::new(name, values);
    }

    let values = cells
        .into_iter()
        .map(|c| {
            if is_null_cell(&c) {
                Scalar::Null
            } else {
                Scalar::Str(c)
            }
        })
        .collect();
    Column::new(name, values)
}
