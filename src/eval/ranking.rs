use std::cmp::Ordering;

/// Order two column indices by descending score, falling back to ascending
/// column index. NaN scores sort after every real score.
///
/// This is a total order, so any sort using it produces exactly the result a
/// stable descending sort by score would.
fn descending(scores: &[f64], a: usize, b: usize) -> Ordering {
    let (x, y) = (scores[a], scores[b]);
    let by_score = match (x.is_nan(), y.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
    };
    by_score.then(a.cmp(&b))
}

/// Column indices of the `m` highest scores, best first.
///
/// Equal scores keep their original column order. When `m` exceeds the number
/// of columns every column is returned.
pub fn rank_top_m(scores: &[f64], m: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    let m = m.min(indices.len());
    if m == 0 {
        return Vec::new();
    }
    if m < indices.len() {
        indices.select_nth_unstable_by(m - 1, |&a, &b| descending(scores, a, b));
        indices.truncate(m);
    }
    indices.sort_unstable_by(|&a, &b| descending(scores, a, b));
    indices
}
