//! Dense row-major interaction matrix shared by binary likes/citations and
//! real-valued prediction scores.

use crate::error::{Axis, CitevalError, Result};

/// Dense `rows x cols` matrix of `f64`.
///
/// The same type carries two meanings: a binary matrix (entries 0 or 1, where
/// 1 means the row entity likes or cites the column entity) and a score
/// matrix (arbitrary real relevance scores). Dimensions are fixed at
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl InteractionMatrix {
    /// Zero-initialised matrix of the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build from nested rows. Every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let n_rows = rows.len();
        let mut data = Vec::with_capacity(n_rows * cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(CitevalError::InvalidInput(format!(
                    "row {} has {} values, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            data.extend(row);
        }
        Ok(Self {
            rows: n_rows,
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Value at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Overwrite the value at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let idx = self.offset(row, col)?;
        self.data[idx] = value;
        Ok(())
    }

    /// Set `(row, col)` to 1. Marking an already-marked cell is a no-op.
    pub fn mark(&mut self, row: usize, col: usize) -> Result<()> {
        self.set(row, col, 1.0)
    }

    /// Borrow one row as a slice. Panics if `row >= rows()`.
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Iterate rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks_exact panics on 0; a zero-column matrix has no data to chunk
        self.data.chunks_exact(self.cols.max(1))
    }

    /// Number of entries equal to 1 in `row`.
    pub fn count_ones_in_row(&self, row: usize) -> usize {
        self.row(row).iter().filter(|&&v| is_positive(v)).count()
    }

    /// Number of entries equal to 1 in the whole matrix.
    pub fn count_ones(&self) -> usize {
        self.data.iter().filter(|&&v| is_positive(v)).count()
    }

    fn offset(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows {
            return Err(CitevalError::IndexOutOfRange {
                axis: Axis::Row,
                index: row,
                bound: self.rows,
                line: row,
            });
        }
        if col >= self.cols {
            return Err(CitevalError::IndexOutOfRange {
                axis: Axis::Column,
                index: col,
                bound: self.cols,
                line: row,
            });
        }
        Ok(row * self.cols + col)
    }
}

/// A ground-truth cell counts as positive only when it is exactly 1.
#[inline]
pub(crate) fn is_positive(value: f64) -> bool {
    value == 1.0
}
