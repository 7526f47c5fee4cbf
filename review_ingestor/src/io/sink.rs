use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// An error occurred while trying to write the data (e.g., file I/O error).
    #[snafu(display("Failed to write data to {path}: {source}"))]
    Write {
        path: String,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// An error occurred while converting records into the destination format (e.g. building a DataFrame).
    #[snafu(display("Data conversion error: {source}"))]
    Conversion {
        source: polars::error::PolarsError,
        backtrace: Backtrace,
    },

    /// Refused to write an empty dataset.
    #[snafu(display("Nothing to write to {path}"))]
    Empty { path: String, backtrace: Backtrace },
}

#[async_trait]
pub trait DataSink<T: Sync> {
    /// The type of output returned after a successful write operation.
    ///
    /// This makes the trait flexible. For example:
    /// - A file sink might return `PathBuf`, the path of the created file.
    /// - A database sink might return `usize`, the number of rows inserted.
    type Output;

    /// Writes a slice of records to the destination.
    ///
    /// # Arguments
    /// * `data` - The records to be written, in output order.
    async fn write(&self, data: &[T]) -> Result<Self::Output, SinkError>;
}
