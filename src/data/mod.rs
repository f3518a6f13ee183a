//! Readers for the line-oriented dataset files: sparse adjacency lists (likes,
//! citations, article tags), the tag vocabulary, and dense score matrices.

pub mod dataset;
pub mod dense;
pub mod sparse;
pub mod tags;

pub use dataset::Dataset;
pub use dense::{load_dense_matrix, load_dense_matrix_file};
pub use sparse::{load_adjacency, load_sparse_matrix, load_sparse_matrix_file, parse_adjacency_line};
pub use tags::{check_tag_ids, load_tags};
