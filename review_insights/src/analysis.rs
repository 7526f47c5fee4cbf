//! Analysis orchestrator: sentiment, then grouped keywords, then themes.

use serde::{Deserialize, Serialize, Serializer};
use tracing::info;

use review_ingestor::ReviewRecord;

use crate::{
    errors::AnalysisError,
    keywords::{KeywordConfig, extract_top_keywords},
    sentiment::{Sentiment, SentimentLabel, classify},
    themes::{ThemeDictionary, render_themes},
};

/// Columns appended to every analyzed row, in this order.
pub const ENRICHMENT_COLUMNS: [&str; 4] = [
    "sentiment_label",
    "sentiment_score",
    "keywords",
    "identified_theme",
];

/// Separator used when a keyword list is rendered as a single field.
pub const KEYWORD_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub keywords: KeywordConfig,
    pub themes: ThemeDictionary,
}

/// What the analysis adds to one review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enrichment {
    pub sentiment: Sentiment,
    /// The review's group keywords, best first.
    pub keywords: Vec<String>,
    /// Sorted theme labels, never empty.
    pub themes: Vec<String>,
}

impl Enrichment {
    pub fn keywords_field(&self) -> String {
        self.keywords.join(KEYWORD_SEPARATOR)
    }

    pub fn identified_theme(&self) -> String {
        render_themes(&self.themes)
    }
}

/// A review record with its enrichment. The original record is kept as is.
///
/// Serializes to the same fields as an analyzed CSV row: `keywords` and
/// `identified_theme` are comma-joined text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedReviewRecord {
    #[serde(flatten)]
    pub review: ReviewRecord,
    pub sentiment_label: SentimentLabel,
    pub sentiment_score: f64,
    #[serde(serialize_with = "joined_keywords")]
    pub keywords: Vec<String>,
    #[serde(rename = "identified_theme", serialize_with = "joined_themes")]
    pub themes: Vec<String>,
}

fn joined_keywords<S: Serializer>(keywords: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&keywords.join(KEYWORD_SEPARATOR))
}

fn joined_themes<S: Serializer>(themes: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&render_themes(themes))
}

impl EnrichedReviewRecord {
    fn new(review: ReviewRecord, enrichment: Enrichment) -> Self {
        Self {
            review,
            sentiment_label: enrichment.sentiment.label,
            sentiment_score: enrichment.sentiment.score,
            keywords: enrichment.keywords,
            themes: enrichment.themes,
        }
    }

    pub fn identified_theme(&self) -> String {
        render_themes(&self.themes)
    }
}

/// Enriches `(group, text)` rows. Output is index-aligned with `rows`.
pub fn enrich(rows: &[(&str, &str)], options: &AnalysisOptions) -> Vec<Enrichment> {
    let sentiments: Vec<Sentiment> = rows.iter().map(|(_, text)| classify(text)).collect();
    let keywords = extract_top_keywords(rows.iter().copied(), &options.keywords);

    let enrichments: Vec<Enrichment> = rows
        .iter()
        .zip(sentiments)
        .map(|((group, text), sentiment)| {
            let keywords = keywords.get(*group).cloned().unwrap_or_default();
            let themes = options.themes.assign_with_text(&keywords, text);
            Enrichment {
                sentiment,
                keywords,
                themes,
            }
        })
        .collect();

    log_summary(&enrichments, keywords.len());
    enrichments
}

/// Runs the full analysis over canonical records, grouping by `entity_code`.
pub fn analyze(
    records: &[ReviewRecord],
    options: &AnalysisOptions,
) -> Result<Vec<EnrichedReviewRecord>, AnalysisError> {
    if records.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let rows: Vec<(&str, &str)> = records
        .iter()
        .map(|r| (r.entity_code.as_str(), r.review_text.as_str()))
        .collect();

    Ok(records
        .iter()
        .cloned()
        .zip(enrich(&rows, options))
        .map(|(review, enrichment)| EnrichedReviewRecord::new(review, enrichment))
        .collect())
}

fn log_summary(enrichments: &[Enrichment], groups: usize) {
    let count = |label: SentimentLabel| {
        enrichments
            .iter()
            .filter(|e| e.sentiment.label == label)
            .count()
    };
    info!(
        reviews = enrichments.len(),
        groups,
        positive = count(SentimentLabel::Positive),
        neutral = count(SentimentLabel::Neutral),
        negative = count(SentimentLabel::Negative),
        "analysis complete"
    );
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn record(id: &str, code: &str, text: &str) -> ReviewRecord {
        ReviewRecord {
            review_id: id.to_string(),
            review_text: text.to_string(),
            rating: 1,
            review_date: Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap(),
            user_name: "Anonymous".to_string(),
            thumbs_up: 0,
            reply_content: None,
            entity_code: code.to_string(),
            entity_name: format!("{code} Bank"),
            app_version: "N/A".to_string(),
            source: "Google Play".to_string(),
        }
    }

    #[test]
    fn empty_input_is_fatal() {
        assert!(matches!(
            analyze(&[], &AnalysisOptions::default()),
            Err(AnalysisError::EmptyInput)
        ));
    }

    #[test]
    fn login_otp_reviews_are_negative_account_access() {
        let records = vec![
            record("1", "CBE", "Login keeps failing with OTP error"),
            record("2", "BOA", "Great app, very easy to use"),
            record("3", "CBE", "OTP never arrives, login impossible"),
        ];

        let out = analyze(&records, &AnalysisOptions::default()).unwrap();

        let ids: Vec<&str> = out.iter().map(|r| r.review.review_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        for (enriched, original) in out.iter().zip(&records) {
            assert_eq!(&enriched.review, original);
        }

        let first = &out[0];
        assert_eq!(first.sentiment_label, SentimentLabel::Negative);
        assert_eq!(&first.keywords[..2], &["login", "otp"]);
        assert!(first.themes.contains(&"Account Access Issues".to_string()));

        // Keywords belong to the group, not to the row.
        assert_eq!(out[2].keywords, first.keywords);
        assert_eq!(out[2].themes, first.themes);

        assert_eq!(out[1].sentiment_label, SentimentLabel::Positive);
    }

    #[test]
    fn reviews_without_keywords_fall_back_to_text() {
        let dict = ThemeDictionary::new([("Fees", vec!["charge"])]);
        let options = AnalysisOptions {
            keywords: KeywordConfig {
                top_n: 0,
                max_features: 50,
            },
            themes: dict,
        };
        let rows = [("CBE", "Hidden charge on every transfer"), ("CBE", "fine")];

        let out = enrich(&rows, &options);

        assert!(out.iter().all(|e| e.keywords.is_empty()));
        assert_eq!(out[0].identified_theme(), "Fees");
        assert_eq!(out[1].identified_theme(), "Other");
        assert_eq!(out[1].keywords_field(), "");
    }

    #[test]
    fn enriched_record_serializes_like_a_csv_row() {
        let records = vec![
            record("1", "CBE", "Login keeps failing with OTP error"),
            record("2", "CBE", "OTP never arrives, login impossible"),
        ];
        let out = analyze(&records, &AnalysisOptions::default()).unwrap();

        let value = serde_json::to_value(&out[0]).unwrap();
        assert_eq!(value["review_id"], "1");
        assert_eq!(value["entity_code"], "CBE");
        assert_eq!(value["sentiment_label"], "negative");
        assert_eq!(value["keywords"], out[0].keywords.join(", ").as_str());
        assert_eq!(value["identified_theme"], out[0].identified_theme().as_str());
        assert!(value.get("themes").is_none());
    }

    #[test]
    fn rendered_fields_are_comma_joined() {
        let enrichment = Enrichment {
            sentiment: Sentiment::NEUTRAL,
            keywords: vec!["otp".into(), "login".into()],
            themes: vec!["Account Access Issues".into(), "Customer Support".into()],
        };
        assert_eq!(enrichment.keywords_field(), "otp, login");
        assert_eq!(
            enrichment.identified_theme(),
            "Account Access Issues, Customer Support"
        );
    }
}
