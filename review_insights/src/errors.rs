use std::path::PathBuf;

use polars::prelude::PolarsError;
use review_ingestor::io::sink::SinkError;
use thiserror::Error;

/// Analysis failures. Input problems are structural and never retried.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Input dataset is empty; nothing to analyze")]
    EmptyInput,

    #[error("Input dataset has no '{column}' column")]
    MissingColumn { column: String },

    #[error("Input file {} does not exist", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Failed to write analysis output: {0}")]
    Write(#[from] SinkError),

    #[error("DataFrame operation failed: {0}")]
    Polars(#[from] PolarsError),
}
