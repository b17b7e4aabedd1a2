//! Dataset discovery: turn a directory tree into `(table, identifier)` pairs.

use std::path::{Path, PathBuf};

use retab_core::types::Table;

use crate::{tsv, IoError};

/// Recursively collect the data files under `root` whose names end in
/// `suffix`, skipping hidden directories and any directory named in
/// `exclude_dirs`. The result is sorted for deterministic runs.
pub fn find_data_files(
    root: &Path,
    suffix: &str,
    exclude_dirs: &[String],
) -> Result<Vec<PathBuf>, IoError> {
    let mut files = Vec::new();
    walk(root, suffix, exclude_dirs, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(
    dir: &Path,
    suffix: &str,
    exclude_dirs: &[String],
    files: &mut Vec<PathBuf>,
) -> Result<(), IoError> {
    let entries = std::fs::read_dir(dir).map_err(|source| IoError::Io {
        path: dir.display().to_string(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| IoError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if path.is_dir() {
            if name.starts_with('.') || exclude_dirs.iter().any(|d| *d == name) {
                continue;
            }
            walk(&path, suffix, exclude_dirs, files)?;
        } else if name.ends_with(suffix) {
            files.push(path);
        }
    }
    Ok(())
}

/// Dataset-relative identifier of a file (stable across machines; always
/// `/`-separated).
pub fn relative_id(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lazily reads the discovered files of a dataset as `(table, identifier)`
/// pairs, in deterministic order.
pub struct DatasetSource {
    root: PathBuf,
    files: std::vec::IntoIter<PathBuf>,
}

impl DatasetSource {
    pub fn new(root: &Path, suffix: &str, exclude_dirs: &[String]) -> Result<Self, IoError> {
        let files = find_data_files(root, suffix, exclude_dirs)?;
        tracing::info!(root = %root.display(), files = files.len(), "dataset discovered");
        Ok(Self {
            root: root.to_path_buf(),
            files: files.into_iter(),
        })
    }
}

impl Iterator for DatasetSource {
    type Item = Result<(Table, String), IoError>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.files.next()?;
        let id = relative_id(&self.root, &path);
        Some(tsv::read_tsv(&path).map(|table| (table, id)))
    }
}
