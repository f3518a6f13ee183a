use crate::error::{Axis, CitevalError, Result};
use crate::matrix::InteractionMatrix;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Load a dense score matrix: one row per line, `cols` whitespace-separated
/// real values per row (the layout `numpy.savetxt` writes).
///
/// Blank lines after the last row are ignored. A row with the wrong number of
/// values or a non-numeric token is a parse error; fewer rows than declared is
/// a shape mismatch.
pub fn load_dense_matrix<R: BufRead>(source: R, rows: usize, cols: usize) -> Result<InteractionMatrix> {
    let mut matrix = InteractionMatrix::zeros(rows, cols);
    let mut seen = 0usize;

    for (line_no, line) in source.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if seen >= rows {
            return Err(CitevalError::IndexOutOfRange {
                axis: Axis::Row,
                index: seen,
                bound: rows,
                line: line_no,
            });
        }

        let mut count = 0usize;
        for token in line.split_whitespace() {
            let value: f64 = token.parse().map_err(|_| CitevalError::Parse {
                line: line_no,
                message: format!("invalid score '{}'", token),
            })?;
            if count < cols {
                matrix.set(seen, count, value)?;
            }
            count += 1;
        }
        if count != cols {
            return Err(CitevalError::Parse {
                line: line_no,
                message: format!("expected {} scores, found {}", cols, count),
            });
        }
        seen += 1;
    }

    if seen < rows {
        return Err(CitevalError::ShapeMismatch {
            expected: (rows, cols),
            actual: (seen, cols),
        });
    }
    log::debug!("Loaded dense matrix {}x{}", rows, cols);
    Ok(matrix)
}

/// File wrapper around [`load_dense_matrix`].
pub fn load_dense_matrix_file(path: &Path, rows: usize, cols: usize) -> Result<InteractionMatrix> {
    let file = File::open(path)?;
    log::debug!("Reading dense matrix from {}", path.display());
    load_dense_matrix(BufReader::new(file), rows, cols)
}
