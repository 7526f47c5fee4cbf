//! Canonical review record.
//!
//! This is the schema every review is normalized into, regardless of which
//! source produced it. The analysis stage only ever appends fields to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Constant origin label stamped on every record.
pub const REVIEW_SOURCE_LABEL: &str = "Google Play";

/// Default for a missing author name.
pub const ANONYMOUS_USER: &str = "Anonymous";

/// Default for a missing app version.
pub const UNKNOWN_VERSION: &str = "N/A";

/// Column order used whenever records are written as a table.
pub const REVIEW_COLUMNS: [&str; 11] = [
    "review_id",
    "review_text",
    "rating",
    "review_date",
    "user_name",
    "thumbs_up",
    "reply_content",
    "entity_code",
    "entity_name",
    "app_version",
    "source",
];

/// One normalized review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Source identifier; empty when the source omitted it.
    pub review_id: String,
    /// Review body; empty when absent.
    pub review_text: String,
    /// Star rating in `1..=5`, or `0` when unknown.
    pub rating: u8,
    /// When the review was written, or the collection time if unknown.
    pub review_date: DateTime<Utc>,
    pub user_name: String,
    pub thumbs_up: u32,
    /// Developer reply, if any.
    pub reply_content: Option<String>,
    /// Code of the configured entity this review belongs to.
    pub entity_code: String,
    /// Display name of that entity, denormalized for reporting.
    pub entity_name: String,
    pub app_version: String,
    pub source: String,
}
