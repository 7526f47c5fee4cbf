//! CSV sinks for collected reviews and app listings.

use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use polars::prelude::*;
use snafu::{ResultExt, ensure};
use tracing::info;

use crate::{
    io::{
        dataframe::{app_info_to_dataframe, reviews_to_dataframe},
        sink::{ConversionSnafu, DataSink, EmptySnafu, SinkError, WriteSnafu},
    },
    models::{app_info::AppMetadata, review::ReviewRecord},
};

/// Writes a frame as CSV with a header row, creating parent directories.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), SinkError> {
    let display = path.display().to_string();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context(WriteSnafu {
            path: parent.display().to_string(),
        })?;
    }

    let mut file = File::create(path).context(WriteSnafu { path: display })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .context(ConversionSnafu)?;
    Ok(())
}

/// Persists canonical review records to a single CSV file.
pub struct CsvReviewSink {
    path: PathBuf,
}

impl CsvReviewSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DataSink<ReviewRecord> for CsvReviewSink {
    type Output = PathBuf;

    async fn write(&self, data: &[ReviewRecord]) -> Result<PathBuf, SinkError> {
        ensure!(
            !data.is_empty(),
            EmptySnafu {
                path: self.path.display().to_string()
            }
        );
        let mut df = reviews_to_dataframe(data).context(ConversionSnafu)?;
        write_csv(&mut df, &self.path)?;
        info!(rows = data.len(), path = %self.path.display(), "wrote reviews");
        Ok(self.path.clone())
    }
}

/// Persists app listing metadata to a CSV file.
pub struct AppInfoCsvSink {
    path: PathBuf,
}

impl AppInfoCsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataSink<AppMetadata> for AppInfoCsvSink {
    type Output = PathBuf;

    async fn write(&self, data: &[AppMetadata]) -> Result<PathBuf, SinkError> {
        ensure!(
            !data.is_empty(),
            EmptySnafu {
                path: self.path.display().to_string()
            }
        );
        let mut df = app_info_to_dataframe(data).context(ConversionSnafu)?;
        write_csv(&mut df, &self.path)?;
        info!(rows = data.len(), path = %self.path.display(), "wrote app info");
        Ok(self.path.clone())
    }
}
