use serde::{Deserialize, Serialize};

/// Ordering requested from the review source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    MostRelevant,
    Rating,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::MostRelevant => "most_relevant",
            SortOrder::Rating => "rating",
        }
    }
}

/// Source-agnostic parameters for one review batch request.
///
/// `count` is a cap, not a promise: sources may return fewer reviews.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewsRequest {
    /// Opaque application identifier understood by the source.
    pub source_id: String,
    /// Review language, e.g. `"en"`.
    pub lang: String,
    /// Store country, e.g. `"us"`.
    pub country: String,
    #[serde(default)]
    pub sort: SortOrder,
    /// Maximum number of reviews wanted.
    pub count: usize,
}

/// Parameters for fetching store metadata of one application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppMetadataRequest {
    pub source_id: String,
    pub lang: String,
    pub country: String,
}
