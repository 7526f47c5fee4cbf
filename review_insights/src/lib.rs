//! Text analytics over collected reviews: lexicon sentiment, grouped TF-IDF
//! keywords and dictionary themes.

pub mod analysis;
pub mod errors;
pub mod keywords;
pub mod sentiment;
pub mod table;
pub mod themes;

pub use analysis::{AnalysisOptions, EnrichedReviewRecord, Enrichment, analyze, enrich};
pub use errors::AnalysisError;
pub use keywords::{KeywordConfig, extract_top_keywords};
pub use sentiment::{Sentiment, SentimentLabel, classify};
pub use table::{AnalysisSummary, analyze_csv};
pub use themes::{OTHER_THEME, ThemeDictionary};
