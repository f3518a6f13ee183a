use crate::error::{Axis, CitevalError, Result};
use crate::matrix::InteractionMatrix;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse one adjacency-list line.
///
/// The first whitespace-separated token is an identifier (in the CiteULike
/// dumps it is the entry count) and is ignored. Every remaining token must be
/// a non-negative integer column index. A blank line yields no indices.
pub fn parse_adjacency_line(line: &str, line_no: usize) -> Result<Vec<usize>> {
    line.split_whitespace()
        .skip(1)
        .map(|token| {
            token.parse::<usize>().map_err(|_| CitevalError::Parse {
                line: line_no,
                message: format!("invalid column index '{}'", token),
            })
        })
        .collect()
}

/// Load a sparse adjacency file into a dense binary matrix of the declared
/// shape.
///
/// Line `i` (0-indexed) becomes row `i`; its column tokens are set to 1 and
/// duplicates collapse. Lines past the declared row count are an error unless
/// they are blank.
pub fn load_sparse_matrix<R: BufRead>(
    source: R,
    rows: usize,
    cols: usize,
) -> Result<InteractionMatrix> {
    let mut matrix = InteractionMatrix::zeros(rows, cols);
    let mut trailing_blank = 0usize;

    for (line_no, line) in source.lines().enumerate() {
        let line = line?;
        if line_no >= rows {
            if line.trim().is_empty() {
                trailing_blank += 1;
                continue;
            }
            return Err(CitevalError::IndexOutOfRange {
                axis: Axis::Row,
                index: line_no,
                bound: rows,
                line: line_no,
            });
        }
        for col in parse_adjacency_line(&line, line_no)? {
            if col >= cols {
                return Err(CitevalError::IndexOutOfRange {
                    axis: Axis::Column,
                    index: col,
                    bound: cols,
                    line: line_no,
                });
            }
            matrix.mark(line_no, col)?;
        }
    }

    if trailing_blank > 0 {
        log::warn!(
            "Ignored {} blank line(s) past the declared {} rows",
            trailing_blank,
            rows
        );
    }
    log::debug!(
        "Loaded sparse matrix {}x{} with {} interactions",
        rows,
        cols,
        matrix.count_ones()
    );
    Ok(matrix)
}

/// File wrapper around [`load_sparse_matrix`].
pub fn load_sparse_matrix_file(path: &Path, rows: usize, cols: usize) -> Result<InteractionMatrix> {
    let file = File::open(path)?;
    log::debug!("Reading sparse matrix from {}", path.display());
    load_sparse_matrix(BufReader::new(file), rows, cols)
}

/// Read the same line format without any bounds, keeping each line's indices
/// in file order (duplicates kept). Used for per-article tag lists.
pub fn load_adjacency<R: BufRead>(source: R) -> Result<Vec<Vec<usize>>> {
    let mut out = Vec::new();
    for (line_no, line) in source.lines().enumerate() {
        out.push(parse_adjacency_line(&line?, line_no)?);
    }
    Ok(out)
}
