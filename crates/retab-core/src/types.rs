//! In-memory table representation shared by every operation.
//!
//! Event files are small (thousands of rows, tens of columns), so a plain
//! column-of-scalars layout is enough; no columnar interchange format here.
//! Operations take a `Table` by value and hand back a new one.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    Str(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Numeric view of the scalar, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::I64(v) => Some(*v as f64),
            Scalar::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view that also parses numeric strings. Columns that mix kinds
    /// keep their cells textual, so `"2.5"` still counts as a number here.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            Scalar::I64(v) => Some(*v as f64),
            Scalar::F64(v) => Some(*v),
            Scalar::Str(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Canonical rendering used to key maps and reports: whole-number floats
    /// render without a fractional part so `5`, `5.0`, and `"5"` share a key.
    pub fn key_render(&self) -> String {
        if let Some(f) = self.as_f64() {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.2e18 {
                return format!("{}", f as i64);
            }
        }
        self.to_string()
    }

    /// Convert a JSON value into a scalar. Arrays and objects have no scalar
    /// form and yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Scalar> {
        use serde_json::Value;
        match value {
            Value::Null => Some(Scalar::Null),
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Scalar::I64(i))
                } else {
                    n.as_f64().map(Scalar::F64)
                }
            }
            Value::String(s) => Some(Scalar::Str(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::I64(v) => Value::from(*v),
            Scalar::F64(v) => serde_json::Number::from_f64(*v)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Scalar::Str(s) => Value::String(s.clone()),
        }
    }

    /// Loose equality between a cell value and a user-supplied value.
    ///
    /// Integer and float renderings of the same number compare equal, and a
    /// string falls back to its textual rendering, so `5`, `5.0`, and `"5"`
    /// all match one another. Null only matches Null.
    pub fn matches(&self, other: &Scalar) -> bool {
        use Scalar::*;
        match (self, other) {
            (Null, Null) => true,
            (Null, _) | (_, Null) => false,
            (Bool(a), Bool(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            _ => match (self.numeric(), other.numeric()) {
                (Some(a), Some(b)) => a == b,
                _ => self.to_string() == other.to_string(),
            },
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Null => write!(f, "n/a"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::I64(v) => write!(f, "{}", v),
            Scalar::F64(v) => write!(f, "{}", v),
            Scalar::Str(s) => write!(f, "{}", s),
        }
    }
}

/// One named column; all columns of a table hold the same number of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Scalar>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered collection of equal-length columns.
///
/// Column order is stable within a table but operations are free to change
/// both the row count and the column set of the table they return.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    /// Build a table, checking that every column has the same length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let rows = first.len();
            for col in &columns {
                if col.len() != rows {
                    return Err(Error::Table(format!(
                        "column '{}' has {} values, expected {}",
                        col.name,
                        col.len(),
                        rows
                    )));
                }
            }
        }
        Ok(Self { columns })
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn value(&self, row: usize, col: usize) -> &Scalar {
        &self.columns[col].values[row]
    }

    /// Insert a column at `index` (clamped to the current column count).
    pub fn insert_column(&mut self, index: usize, column: Column) -> Result<()> {
        if !self.columns.is_empty() && column.len() != self.num_rows() {
            return Err(Error::Table(format!(
                "column '{}' has {} values, expected {}",
                column.name,
                column.len(),
                self.num_rows()
            )));
        }
        let index = index.min(self.columns.len());
        self.columns.insert(index, column);
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.column_index(name)?;
        Some(self.columns.remove(idx))
    }

    /// Keep exactly the rows whose mask entry is true.
    pub fn filter_rows(&self, keep: &[bool]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|col| Column {
                name: col.name.clone(),
                values: col
                    .values
                    .iter()
                    .zip(keep.iter())
                    .filter(|(_, k)| **k)
                    .map(|(v, _)| v.clone())
                    .collect(),
            })
            .collect();
        Table { columns }
    }

    /// Values of one row at the given column indices.
    pub fn row_values(&self, row: usize, col_indices: &[usize]) -> Vec<Scalar> {
        col_indices
            .iter()
            .map(|&c| self.columns[c].values[row].clone())
            .collect()
    }

    /// Stable sort of the rows by the specified columns (in order).
    ///
    /// Builds a (sort_key_tuple, original_index) vector, sorts it, then
    /// reorders all columns accordingly.
    pub fn sort_by_columns(&mut self, sort_keys: &[String]) -> Result<()> {
        let num_rows = self.num_rows();
        if num_rows == 0 {
            return Ok(());
        }

        let key_indices: Vec<usize> = sort_keys
            .iter()
            .map(|key| {
                self.column_index(key)
                    .ok_or_else(|| Error::Table(format!("sort key column '{}' not found", key)))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut indices: Vec<(Vec<Scalar>, usize)> = (0..num_rows)
            .map(|row_idx| (self.row_values(row_idx, &key_indices), row_idx))
            .collect();

        indices.sort_by(|(a, _), (b, _)| scalar_tuple_cmp(a, b));

        for col in &mut self.columns {
            let original = col.values.clone();
            col.values = indices
                .iter()
                .map(|(_, idx)| original[*idx].clone())
                .collect();
        }

        Ok(())
    }
}

/// Compare two scalar tuples lexicographically for sorting.
fn scalar_tuple_cmp(a: &[Scalar], b: &[Scalar]) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    for (x, y) in a.iter().zip(b.iter()) {
        match scalar_cmp(x, y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

/// Compare two scalars for sorting.
///
/// Nulls sort first, numbers compare numerically across integer/float, NaN
/// sorts last among numbers; otherwise values compare within their type and
/// mixed types fall back to a fixed variant order.
pub fn scalar_cmp(a: &Scalar, b: &Scalar) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    use Scalar::*;

    match (a, b) {
        (Null, Null) => Ordering::Equal,
        (Null, _) => Ordering::Less,
        (_, Null) => Ordering::Greater,
        (Bool(x), Bool(y)) => x.cmp(y),
        (Str(x), Str(y)) => x.cmp(y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => {
                if x.is_nan() && y.is_nan() {
                    Ordering::Equal
                } else if x.is_nan() {
                    Ordering::Greater
                } else if y.is_nan() {
                    Ordering::Less
                } else {
                    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                }
            }
            _ => scalar_type_order(a).cmp(&scalar_type_order(b)),
        },
    }
}

/// Assign a numeric order to scalar types for mixed-type comparisons.
fn scalar_type_order(s: &Scalar) -> u8 {
    use Scalar::*;
    match s {
        Null => 0,
        Bool(_) => 1,
        I64(_) => 2,
        F64(_) => 3,
        Str(_) => 4,
    }
}
