//! DataMatrix: a dense 2D matrix with named rows and columns.
//!
//! This is the container every other component consumes: expression ratios
//! come in as a DataMatrix, scoring engines hand results back as one, and
//! cluster submatrices are extracted from one by name.
//!
//! Storage is flat row-major `Vec<f64>`, so a row is a contiguous slice and
//! `(row, column)` access is a single multiply-add.
//!
//! # Example
//!
//! ```rust
//! use biclust::DataMatrix;
//!
//! let matrix = DataMatrix::from_rows(
//!     vec!["GENE1".into(), "GENE2".into()],
//!     vec!["COND1".into(), "COND2".into()],
//!     vec![vec![1.0, 2.0], vec![3.0, 4.0]],
//! ).unwrap();
//!
//! assert_eq!(matrix[(1, 0)], 3.0);
//! assert_eq!(matrix.column_means(), vec![2.0, 3.0]);
//! ```

use crate::dfile::DelimitedFile;
use crate::error::{BiclustError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::ops::{Index, IndexMut};

/// Dense numeric matrix with unique, order-significant row and column names.
///
/// Row and column name uniqueness is enforced by every public constructor;
/// lookups by unknown name return `None` rather than failing. Name → position
/// lookups go through hash maps kept in sync with the name vectors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "MatrixData", try_from = "MatrixData")]
pub struct DataMatrix {
    row_names: Vec<String>,
    column_names: Vec<String>,
    /// Flat row-major: num_rows rows × num_columns columns.
    values: Vec<f64>,
    row_lookup: HashMap<String, usize>,
    column_lookup: HashMap<String, usize>,
}

impl DataMatrix {
    /// Internal constructor for matrices whose names are already known to be
    /// unique (derived from an existing validated matrix or generated).
    pub(crate) fn new_unchecked(
        row_names: Vec<String>,
        column_names: Vec<String>,
        values: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(values.len(), row_names.len() * column_names.len());
        let row_lookup = index_lookup(&row_names);
        let column_lookup = index_lookup(&column_names);
        Self {
            row_names,
            column_names,
            values,
            row_lookup,
            column_lookup,
        }
    }

    /// Create a zero-filled matrix with the given names.
    ///
    /// Fails on duplicate row or column names.
    pub fn zeros(row_names: Vec<String>, column_names: Vec<String>) -> Result<Self> {
        check_unique("row", &row_names)?;
        check_unique("column", &column_names)?;
        let values = vec![0.0; row_names.len() * column_names.len()];
        Ok(Self::new_unchecked(row_names, column_names, values))
    }

    /// Create a matrix from nested row vectors.
    ///
    /// Fails on duplicate names, a row count that does not match
    /// `row_names`, or any row whose length does not match `column_names`.
    pub fn from_rows(
        row_names: Vec<String>,
        column_names: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self> {
        check_unique("row", &row_names)?;
        check_unique("column", &column_names)?;
        if rows.len() != row_names.len() {
            return Err(BiclustError::ShapeMismatch {
                expected: row_names.len(),
                got: rows.len(),
            });
        }
        let num_columns = column_names.len();
        let mut values = Vec::with_capacity(row_names.len() * num_columns);
        for row in &rows {
            if row.len() != num_columns {
                return Err(BiclustError::ShapeMismatch {
                    expected: num_columns,
                    got: row.len(),
                });
            }
            values.extend_from_slice(row);
        }
        Ok(Self::new_unchecked(row_names, column_names, values))
    }

    /// Build a matrix from a delimited file read with a header line.
    ///
    /// The first header field labels the row-name column and is ignored; the
    /// remaining header fields become the column names. Each record's first
    /// field is the row name, the rest are values. `NA` and empty fields
    /// parse to NaN; anything else unparsable is a construction error.
    pub fn from_delimited(dfile: &DelimitedFile) -> Result<Self> {
        let header = dfile.header().ok_or(BiclustError::MissingHeader)?;
        if header.is_empty() {
            return Err(BiclustError::MissingHeader);
        }
        let column_names: Vec<String> = header[1..].to_vec();
        let num_columns = column_names.len();

        let mut row_names = Vec::with_capacity(dfile.lines().len());
        let mut values = Vec::with_capacity(dfile.lines().len() * num_columns);
        for (lineno, fields) in dfile.lines().iter().enumerate() {
            if fields.len() != num_columns + 1 {
                return Err(BiclustError::ShapeMismatch {
                    expected: num_columns + 1,
                    got: fields.len(),
                });
            }
            row_names.push(fields[0].clone());
            for field in &fields[1..] {
                values.push(parse_value(field, lineno + 1)?);
            }
        }
        check_unique("row", &row_names)?;
        check_unique("column", &column_names)?;
        Ok(Self::new_unchecked(row_names, column_names, values))
    }

    // --- Accessors ---

    pub fn num_rows(&self) -> usize {
        self.row_names.len()
    }

    pub fn num_columns(&self) -> usize {
        self.column_names.len()
    }

    pub fn row_names(&self) -> &[String] {
        &self.row_names
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Position of the named row, or `None` if absent.
    pub fn row_index_of(&self, name: &str) -> Option<usize> {
        self.row_lookup.get(name).copied()
    }

    /// Position of the named column, or `None` if absent.
    pub fn column_index_of(&self, name: &str) -> Option<usize> {
        self.column_lookup.get(name).copied()
    }

    /// Flat row-major view of all values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// One row as a contiguous slice.
    ///
    /// # Panics
    /// Panics if `row >= num_rows`.
    pub fn row_values(&self, row: usize) -> &[f64] {
        assert!(
            row < self.num_rows(),
            "Row {} out of range ({} rows)",
            row,
            self.num_rows()
        );
        let base = row * self.num_columns();
        &self.values[base..base + self.num_columns()]
    }

    /// One column, copied out (columns are strided in row-major storage).
    ///
    /// # Panics
    /// Panics if `column >= num_columns`.
    pub fn column_values(&self, column: usize) -> Vec<f64> {
        assert!(
            column < self.num_columns(),
            "Column {} out of range ({} columns)",
            column,
            self.num_columns()
        );
        (0..self.num_rows())
            .map(|r| self.values[r * self.num_columns() + column])
            .collect()
    }

    /// Per-column arithmetic means. A matrix with zero rows yields NaN for
    /// every column.
    pub fn column_means(&self) -> Vec<f64> {
        let num_rows = self.num_rows();
        let num_columns = self.num_columns();
        (0..num_columns)
            .map(|c| {
                let sum: f64 = (0..num_rows).map(|r| self.values[r * num_columns + c]).sum();
                sum / num_rows as f64
            })
            .collect()
    }

    /// Extract a submatrix by name subsets.
    ///
    /// `None` selects every row (resp. column). Requested names keep their
    /// requested relative order; names the matrix does not contain are
    /// skipped.
    pub fn submatrix_by_name(
        &self,
        row_names: Option<&[String]>,
        column_names: Option<&[String]>,
    ) -> DataMatrix {
        let row_indexes: Vec<usize> = match row_names {
            Some(names) => names
                .iter()
                .filter_map(|name| self.row_index_of(name))
                .collect(),
            None => (0..self.num_rows()).collect(),
        };
        let column_indexes: Vec<usize> = match column_names {
            Some(names) => names
                .iter()
                .filter_map(|name| self.column_index_of(name))
                .collect(),
            None => (0..self.num_columns()).collect(),
        };

        let sub_row_names: Vec<String> = row_indexes
            .iter()
            .map(|&r| self.row_names[r].clone())
            .collect();
        let sub_column_names: Vec<String> = column_indexes
            .iter()
            .map(|&c| self.column_names[c].clone())
            .collect();
        let mut values = Vec::with_capacity(row_indexes.len() * column_indexes.len());
        for &r in &row_indexes {
            let base = r * self.num_columns();
            for &c in &column_indexes {
                values.push(self.values[base + c]);
            }
        }
        DataMatrix::new_unchecked(sub_row_names, sub_column_names, values)
    }
}

impl Index<(usize, usize)> for DataMatrix {
    type Output = f64;

    fn index(&self, (row, column): (usize, usize)) -> &f64 {
        assert!(
            row < self.num_rows() && column < self.num_columns(),
            "Index ({}, {}) out of range for {}x{} matrix",
            row,
            column,
            self.num_rows(),
            self.num_columns()
        );
        &self.values[row * self.num_columns() + column]
    }
}

impl IndexMut<(usize, usize)> for DataMatrix {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut f64 {
        assert!(
            row < self.num_rows() && column < self.num_columns(),
            "Index ({}, {}) out of range for {}x{} matrix",
            row,
            column,
            self.num_rows(),
            self.num_columns()
        );
        let num_columns = self.num_columns();
        &mut self.values[row * num_columns + column]
    }
}

fn check_unique(axis: &'static str, names: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(BiclustError::DuplicateName {
                axis,
                name: name.clone(),
            });
        }
    }
    Ok(())
}

fn index_lookup(names: &[String]) -> HashMap<String, usize> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| (name.clone(), index))
        .collect()
}

/// Serialized form of [`DataMatrix`]: names and values only. The lookup maps
/// are rebuilt, and the matrix invariants revalidated, on the way back in.
#[derive(Clone, Serialize, Deserialize)]
struct MatrixData {
    row_names: Vec<String>,
    column_names: Vec<String>,
    values: Vec<f64>,
}

impl From<DataMatrix> for MatrixData {
    fn from(matrix: DataMatrix) -> Self {
        Self {
            row_names: matrix.row_names,
            column_names: matrix.column_names,
            values: matrix.values,
        }
    }
}

impl TryFrom<MatrixData> for DataMatrix {
    type Error = BiclustError;

    fn try_from(data: MatrixData) -> Result<Self> {
        check_unique("row", &data.row_names)?;
        check_unique("column", &data.column_names)?;
        let expected = data.row_names.len() * data.column_names.len();
        if data.values.len() != expected {
            return Err(BiclustError::ShapeMismatch {
                expected,
                got: data.values.len(),
            });
        }
        Ok(Self::new_unchecked(
            data.row_names,
            data.column_names,
            data.values,
        ))
    }
}

fn parse_value(field: &str, line: usize) -> Result<f64> {
    if field.is_empty() || field == "NA" {
        return Ok(f64::NAN);
    }
    field.parse::<f64>().map_err(|_| BiclustError::NumericField {
        field: field.to_string(),
        line,
    })
}

// =============================================================================
// Tests
// =============================================================================
