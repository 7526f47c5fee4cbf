//! CSV in, CSV out.
//!
//! Every column is read as text so the original values are written back
//! exactly as they came in; the four enrichment columns are appended.

use std::path::{Path, PathBuf};

use polars::prelude::*;
use review_ingestor::io::csv::write_csv;
use tracing::{info, warn};

use crate::{
    analysis::{AnalysisOptions, ENRICHMENT_COLUMNS, enrich},
    errors::AnalysisError,
};

pub const REVIEW_TEXT_COLUMN: &str = "review_text";
pub const GROUP_COLUMN: &str = "entity_code";

/// Reads a CSV file with a header row, all columns as strings.
pub fn read_reviews_csv(path: &Path) -> Result<DataFrame, AnalysisError> {
    if !path.is_file() {
        return Err(AnalysisError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .map_err(|err| match err {
            PolarsError::NoData(_) => AnalysisError::EmptyInput,
            other => AnalysisError::Polars(other),
        })?;
    Ok(df)
}

/// Column values as owned strings, nulls read as empty text.
fn text_column(df: &DataFrame, name: &str) -> Result<Option<Vec<String>>, AnalysisError> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    let series = column.as_materialized_series().cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect();
    Ok(Some(values))
}

/// Appends sentiment, keyword and theme columns to `df`.
///
/// Rows are grouped by `entity_code`; without that column the whole table is
/// one group.
pub fn enrich_frame(mut df: DataFrame, options: &AnalysisOptions) -> Result<DataFrame, AnalysisError> {
    if df.height() == 0 {
        return Err(AnalysisError::EmptyInput);
    }

    let texts = text_column(&df, REVIEW_TEXT_COLUMN)?.ok_or_else(|| {
        AnalysisError::MissingColumn {
            column: REVIEW_TEXT_COLUMN.to_string(),
        }
    })?;
    let groups = match text_column(&df, GROUP_COLUMN)? {
        Some(groups) => groups,
        None => {
            warn!(
                column = GROUP_COLUMN,
                "group column missing; extracting keywords over the whole table"
            );
            vec![String::new(); df.height()]
        }
    };

    let rows: Vec<(&str, &str)> = groups
        .iter()
        .zip(&texts)
        .map(|(g, t)| (g.as_str(), t.as_str()))
        .collect();
    let enrichments = enrich(&rows, options);

    let [label_col, score_col, keywords_col, theme_col] = ENRICHMENT_COLUMNS;
    let columns = [
        Series::new(
            label_col.into(),
            enrichments
                .iter()
                .map(|e| e.sentiment.label.as_str())
                .collect::<Vec<_>>(),
        ),
        Series::new(
            score_col.into(),
            enrichments
                .iter()
                .map(|e| e.sentiment.score)
                .collect::<Vec<f64>>(),
        ),
        Series::new(
            keywords_col.into(),
            enrichments
                .iter()
                .map(|e| e.keywords_field())
                .collect::<Vec<String>>(),
        ),
        Series::new(
            theme_col.into(),
            enrichments
                .iter()
                .map(|e| e.identified_theme())
                .collect::<Vec<String>>(),
        ),
    ];

    for series in columns {
        if df.get_column_index(series.name()).is_some() {
            warn!(column = %series.name(), "replacing existing column");
        }
        df.with_column(series)?;
    }
    Ok(df)
}

/// Outcome of [`analyze_csv`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSummary {
    pub rows: usize,
    pub output: PathBuf,
}

/// Reads `input`, enriches it and writes the result to `output`.
pub fn analyze_csv(
    input: &Path,
    output: &Path,
    options: &AnalysisOptions,
) -> Result<AnalysisSummary, AnalysisError> {
    let df = read_reviews_csv(input)?;
    info!(input = %input.display(), rows = df.height(), "loaded reviews");

    let mut enriched = enrich_frame(df, options)?;
    write_csv(&mut enriched, output)?;
    info!(output = %output.display(), rows = enriched.height(), "wrote analyzed reviews");

    Ok(AnalysisSummary {
        rows: enriched.height(),
        output: output.to_path_buf(),
    })
}
