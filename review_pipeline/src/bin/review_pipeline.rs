use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use review_ingestor::providers::http_json::HttpReviewSource;
use review_pipeline::{load_config_path, run_analyze, run_collect};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "App review collection and analysis")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Fetch app info and reviews for every configured entity.
    Collect {
        #[arg(long, value_name = "FILE", default_value = "pipeline.toml")]
        config: PathBuf,
    },
    /// Append sentiment, keywords and themes to a review CSV.
    Analyze {
        #[arg(long, value_name = "FILE", default_value = "pipeline.toml")]
        config: PathBuf,
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Collect { config } => {
            let cfg = load_config_path(&config)?;
            let source = HttpReviewSource::from_env().context("configure review source")?;

            let summary = run_collect(&source, &cfg).await?;
            for (code, count) in &summary.per_entity {
                info!(entity = %code, reviews = count, "entity summary");
            }
            for failure in &summary.failures {
                warn!(
                    entity = %failure.entity_code,
                    attempts = failure.attempts,
                    error = %failure.message,
                    "entity failed"
                );
            }
            info!(
                reviews = summary.reviews,
                path = %summary.reviews_path.display(),
                "collection complete"
            );
        }
        Cmd::Analyze {
            config,
            input,
            output,
        } => {
            let cfg = load_config_path(&config)?;
            let summary = run_analyze(&cfg, input.as_deref(), output.as_deref())?;
            info!(
                rows = summary.rows,
                path = %summary.output.display(),
                "analysis complete"
            );
        }
    }

    Ok(())
}
