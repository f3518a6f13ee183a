use std::fmt;
use thiserror::Error;

/// Which dimension of a matrix an out-of-range index was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

/// Main error type for Citeval
#[derive(Error, Debug)]
pub enum CitevalError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A token that should be a number is not one (line is 0-indexed)
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A parsed index falls outside the declared matrix dimensions
    #[error("{axis} index {index} out of range (bound {bound}) on line {line}")]
    IndexOutOfRange {
        axis: Axis,
        index: usize,
        bound: usize,
        line: usize,
    },

    /// Ground truth and predictions do not have the same (rows, cols)
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// No row of the ground truth has a single positive
    #[error("No eligible rows: ground truth has no row with positives")]
    NoEligibleRows,

    /// Report serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An observer asked the evaluation to stop
    #[error("Evaluation cancelled before row {row}")]
    Cancelled { row: usize },
}

/// Convenient Result type using CitevalError
pub type Result<T> = std::result::Result<T, CitevalError>;
