use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while producing a random baseline.
#[derive(Debug, Error)]
pub enum BaselineError {
    #[error("could not load {}: {source}", .path.display())]
    DataLoad {
        path: PathBuf,
        #[source]
        source: LoadFailure,
    },

    #[error(
        "row count mismatch between data.matrix ({matrix_rows}) and data.true_labels ({label_rows})"
    )]
    Validation { matrix_rows: usize, label_rows: usize },

    #[error("could not write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why an input file could not be turned into rows.
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("line {line}: {value:?} is not a valid number")]
    BadNumber { line: u64, value: String },

    #[error("line {line}: expected {expected} columns, found {found}")]
    Ragged {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    #[error("no data lines found")]
    Empty,
}

impl BaselineError {
    pub(crate) fn data_load(path: impl Into<PathBuf>, source: impl Into<LoadFailure>) -> Self {
        Self::DataLoad {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn output(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Output {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BaselineError>;
