use std::path::Path;

use async_trait::async_trait;
use review_ingestor::{
    ReviewSource, SourceError,
    models::{
        raw_review::{RawRecord, RawReview},
        request_params::{AppMetadataRequest, ReviewsRequest},
    },
    providers::UnavailableSnafu,
};
use review_pipeline::{PipelineConfig, load_config_str, run_analyze, run_collect};
use tempfile::TempDir;

/// Serves canned reviews for CBE and BOA; the Dashen listing is always down.
struct CannedSource;

fn canned_reviews(source_id: &str) -> Option<Vec<(&'static str, i64)>> {
    match source_id {
        "com.combanketh.mobilebanking" => Some(vec![
            ("Login keeps failing with OTP error", 1),
            ("OTP never arrives, login impossible", 2),
            ("Great app, very easy to use", 5),
        ]),
        "com.boa.boaMobileBanking" => Some(vec![
            ("Transfer is slow and failed twice", 2),
            ("Customer service did not answer my call", 1),
        ]),
        _ => None,
    }
}

#[async_trait]
impl ReviewSource for CannedSource {
    async fn fetch_reviews(&self, request: &ReviewsRequest) -> Result<Vec<RawReview>, SourceError> {
        match canned_reviews(&request.source_id) {
            Some(reviews) => Ok(reviews
                .into_iter()
                .enumerate()
                .map(|(i, (text, score))| {
                    RawRecord::new()
                        .with("reviewId", format!("{}-{i}", request.source_id))
                        .with("content", text)
                        .with("score", score)
                        .with("at", "2025-05-30T08:15:00Z")
                        .with("userName", "Test User")
                })
                .collect()),
            None => UnavailableSnafu {
                message: format!("{} unavailable", request.source_id),
            }
            .fail(),
        }
    }

    async fn fetch_app_metadata(
        &self,
        request: &AppMetadataRequest,
    ) -> Result<RawRecord, SourceError> {
        match canned_reviews(&request.source_id) {
            Some(reviews) => Ok(RawRecord::new()
                .with("title", format!("{} app", request.source_id))
                .with("score", 4.2)
                .with("reviews", reviews.len() as i64)),
            None => UnavailableSnafu { message: "listing down" }.fail(),
        }
    }
}

fn config(dir: &Path) -> PipelineConfig {
    let d = dir.display();
    load_config_str(&format!(
        r#"
        [entities.CBE]
        name = "Commercial Bank of Ethiopia"
        source_id = "com.combanketh.mobilebanking"

        [entities.BOA]
        name = "Bank of Abyssinia"
        source_id = "com.boa.boaMobileBanking"

        [entities.Dashen]
        name = "Dashen Bank"
        source_id = "com.dashen.dashensuperapp"

        [collection]
        reviews_per_bank = 10
        max_retries = 2
        retry_delay_secs = 0.0
        inter_entity_delay_secs = 0.0

        [paths]
        raw_dir = '{d}/raw'
        raw_reviews = '{d}/raw/reviews.csv'
        app_info = '{d}/raw/app_info.csv'
        processed_reviews = '{d}/processed/reviews.csv'
        sentiment_output = '{d}/processed/sentiment.csv'
        "#
    ))
    .expect("valid config")
}

fn header_and_rows(path: &Path) -> (String, Vec<String>) {
    let text = std::fs::read_to_string(path).expect("read csv");
    let mut lines = text.lines().map(str::to_string);
    let header = lines.next().expect("header row");
    (header, lines.collect())
}

#[tokio::test]
async fn collect_then_analyze_end_to_end() {
    let dir = TempDir::new().unwrap();
    let cfg = config(dir.path());

    let summary = run_collect(&CannedSource, &cfg).await.unwrap();
    assert_eq!(summary.reviews, 5);
    assert_eq!(summary.per_entity["CBE"], 3);
    assert_eq!(summary.per_entity["BOA"], 2);
    assert_eq!(summary.per_entity["Dashen"], 0);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].entity_code, "Dashen");
    assert_eq!(summary.failures[0].attempts, 2);

    let app_info = summary.app_info_path.expect("app info written");
    let (_, apps) = header_and_rows(&app_info);
    assert_eq!(apps.len(), 2);

    let (raw_header, raw_rows) = header_and_rows(&summary.reviews_path);
    assert_eq!(raw_rows.len(), 5);

    // No processed file: analysis reads the raw collection output.
    let analysis = run_analyze(&cfg, None, None).unwrap();
    assert_eq!(analysis.rows, 5);
    assert_eq!(analysis.output, cfg.paths.sentiment_output);

    let (header, _) = header_and_rows(&analysis.output);
    assert_eq!(
        header,
        format!("{raw_header},sentiment_label,sentiment_score,keywords,identified_theme")
    );
}

#[tokio::test]
async fn analysis_output_is_enriched_per_row() {
    let dir = TempDir::new().unwrap();
    let cfg = config(dir.path());
    run_collect(&CannedSource, &cfg).await.unwrap();

    let output = dir.path().join("custom.csv");
    run_analyze(&cfg, Some(cfg.paths.raw_reviews.as_path()), Some(output.as_path())).unwrap();

    let df = review_insights::table::read_reviews_csv(&output).unwrap();
    let column = |name: &str| -> Vec<String> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect()
    };

    let ids = column("review_id");
    assert_eq!(ids[0], "com.combanketh.mobilebanking-0");
    assert_eq!(ids[3], "com.boa.boaMobileBanking-0");

    let labels = column("sentiment_label");
    assert_eq!(labels[0], "negative");
    assert_eq!(labels[2], "positive");

    let themes = column("identified_theme");
    assert!(themes[0].contains("Account Access Issues"));
    assert!(themes[3].contains("Transaction Performance"));
    // Rows of one entity share the entity's keywords.
    let keywords = column("keywords");
    assert_eq!(keywords[3], keywords[4]);
    assert!(!keywords[0].is_empty());
}

#[tokio::test]
async fn collection_with_no_reviews_fails_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(dir.path());
    cfg.entities.retain(|code, _| code == "Dashen");

    let err = run_collect(&CannedSource, &cfg).await.unwrap_err();
    assert!(format!("{err:#}").contains("No reviews were collected"));
    assert!(!cfg.paths.raw_reviews.exists());
    assert!(!cfg.paths.app_info.exists());
}

#[test]
fn analysis_of_a_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let cfg = config(dir.path());
    let err = run_analyze(&cfg, None, None).unwrap_err();
    assert!(format!("{err:#}").contains("does not exist"));
}
