pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod matrix;

pub use config::Config;
pub use data::{load_sparse_matrix, load_sparse_matrix_file};
pub use error::{CitevalError, Result};
pub use eval::{recall_at_m, RecallEvaluator};
pub use matrix::InteractionMatrix;
