use crate::error::{Axis, CitevalError, Result};
use std::io::BufRead;

/// Load the tag vocabulary: one tag name per line, surrounding whitespace
/// trimmed. The position of a tag in the returned list is its id.
pub fn load_tags<R: BufRead>(source: R) -> Result<Vec<String>> {
    let mut tags = Vec::new();
    for line in source.lines() {
        tags.push(line?.trim().to_string());
    }
    Ok(tags)
}

/// Check every tag id in `article_tags` against the vocabulary size.
pub fn check_tag_ids(article_tags: &[Vec<usize>], num_tags: usize) -> Result<()> {
    for (line, ids) in article_tags.iter().enumerate() {
        if let Some(&bad) = ids.iter().find(|&&id| id >= num_tags) {
            return Err(CitevalError::IndexOutOfRange {
                axis: Axis::Column,
                index: bad,
                bound: num_tags,
                line,
            });
        }
    }
    Ok(())
}
