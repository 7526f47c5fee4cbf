//! Bodies of the `collect` and `analyze` commands.

use std::path::{Path, PathBuf};

use anyhow::Context;
use indexmap::IndexMap;
use review_ingestor::{
    EntityFailure, ReviewSource, collect, collect_app_metadata,
    io::{
        csv::{AppInfoCsvSink, CsvReviewSink},
        sink::DataSink,
    },
};
use review_insights::{AnalysisSummary, analyze_csv};
use tracing::{info, warn};

use crate::config::PipelineConfig;

/// What a `collect` run wrote.
#[derive(Debug)]
pub struct CollectSummary {
    pub reviews: usize,
    pub per_entity: IndexMap<String, usize>,
    pub failures: Vec<EntityFailure>,
    pub reviews_path: PathBuf,
    /// `None` when no app listing could be fetched.
    pub app_info_path: Option<PathBuf>,
}

/// Fetches app listings, then reviews, and writes both as CSV.
///
/// App listing failures never stop review collection. The run fails when no
/// entity yielded a single review.
pub async fn run_collect<S>(source: &S, cfg: &PipelineConfig) -> anyhow::Result<CollectSummary>
where
    S: ReviewSource + ?Sized,
{
    let entities = cfg.entities();
    std::fs::create_dir_all(&cfg.paths.raw_dir)
        .with_context(|| format!("create data dir {}", cfg.paths.raw_dir.display()))?;

    info!(entities = entities.len(), "fetching app info");
    let infos = collect_app_metadata(source, &entities, &cfg.collection).await;
    let app_info_path = if infos.is_empty() {
        warn!("no app info could be fetched; skipping app info file");
        None
    } else {
        let path = AppInfoCsvSink::new(&cfg.paths.app_info)
            .write(&infos)
            .await
            .context("write app info")?;
        info!(path = %path.display(), apps = infos.len(), "saved app info");
        Some(path)
    };

    info!(
        entities = entities.len(),
        per_entity = cfg.collection.reviews_per_bank,
        "collecting reviews"
    );
    let collection = collect(source, &entities, &cfg.collection)
        .await
        .context("review collection failed")?;

    let reviews_path = CsvReviewSink::new(&cfg.paths.raw_reviews)
        .write(&collection.records)
        .await
        .context("write reviews")?;
    info!(
        path = %reviews_path.display(),
        reviews = collection.records.len(),
        "saved reviews"
    );

    Ok(CollectSummary {
        reviews: collection.records.len(),
        per_entity: collection.per_entity,
        failures: collection.failures,
        reviews_path,
        app_info_path,
    })
}

/// Enriches a review CSV. `input` and `output` default to the configured paths.
pub fn run_analyze(
    cfg: &PipelineConfig,
    input: Option<&Path>,
    output: Option<&Path>,
) -> anyhow::Result<AnalysisSummary> {
    let input = input.unwrap_or_else(|| cfg.paths.analysis_input());
    let output = output.unwrap_or(&cfg.paths.sentiment_output);

    analyze_csv(input, output, &cfg.analysis_options())
        .with_context(|| format!("analysis of {} failed", input.display()))
}
