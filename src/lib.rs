//! Random-label baseline for clustering benchmarks.
//!
//! The number of clusters is taken from a ground-truth label file, the data
//! matrix is only checked for a matching row count, and every sample gets a
//! uniformly random cluster drawn from a seeded generator.

pub mod baseline;
pub mod data;
pub mod error;
pub mod io;

pub use baseline::{generate, sample_labels, BaselineConfig, BaselineRun, OutputLayout};
pub use data::{count_distinct, count_rows, load_labels, LabelTable};
pub use error::{BaselineError, LoadFailure};
