//! Raw review → canonical [`ReviewRecord`] mapping.
//!
//! Normalization never fails. Every canonical field is taken from the
//! corresponding raw key when it is present and well formed, otherwise it
//! degrades to its default:
//!
//! | field           | raw key                | default                |
//! |-----------------|------------------------|------------------------|
//! | `review_id`     | `reviewId`             | `""`                   |
//! | `review_text`   | `content`              | `""`                   |
//! | `rating`        | `score`                | `0` (also if not 0..=5)|
//! | `review_date`   | `at`                   | collection time        |
//! | `user_name`     | `userName`             | `"Anonymous"`          |
//! | `thumbs_up`     | `thumbsUpCount`        | `0` (also if negative) |
//! | `reply_content` | `replyContent`         | `None` (also if blank) |
//! | `app_version`   | `reviewCreatedVersion` | `"N/A"`                |

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::models::{
    entity::EntityDescriptor,
    raw_review::RawReview,
    review::{ANONYMOUS_USER, REVIEW_SOURCE_LABEL, ReviewRecord, UNKNOWN_VERSION},
};

/// Raw keys as emitted by Google Play listings.
pub mod keys {
    pub const REVIEW_ID: &str = "reviewId";
    pub const CONTENT: &str = "content";
    pub const SCORE: &str = "score";
    pub const AT: &str = "at";
    pub const USER_NAME: &str = "userName";
    pub const THUMBS_UP: &str = "thumbsUpCount";
    pub const REPLY: &str = "replyContent";
    pub const APP_VERSION: &str = "reviewCreatedVersion";
}

/// Unix timestamps above this are taken to be in milliseconds.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Maps one raw review onto the canonical schema, tagging it with `entity`.
///
/// `collected_at` stands in for a missing or unparseable review date.
pub fn normalize(
    raw: &RawReview,
    entity: &EntityDescriptor,
    collected_at: DateTime<Utc>,
) -> ReviewRecord {
    ReviewRecord {
        review_id: raw.text(keys::REVIEW_ID).unwrap_or_default(),
        review_text: raw.text(keys::CONTENT).unwrap_or_default(),
        rating: raw
            .integer(keys::SCORE)
            .filter(|r| (0..=5).contains(r))
            .map_or(0, |r| r as u8),
        review_date: raw
            .get(keys::AT)
            .and_then(parse_timestamp)
            .unwrap_or(collected_at),
        user_name: raw
            .non_blank_text(keys::USER_NAME)
            .unwrap_or_else(|| ANONYMOUS_USER.to_string()),
        thumbs_up: raw
            .integer(keys::THUMBS_UP)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
        reply_content: raw.non_blank_text(keys::REPLY),
        entity_code: entity.code.clone(),
        entity_name: entity.display_name.clone(),
        app_version: raw
            .non_blank_text(keys::APP_VERSION)
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
        source: REVIEW_SOURCE_LABEL.to_string(),
    }
}

/// Normalizes a batch, preserving source order.
pub fn normalize_all(
    raws: &[RawReview],
    entity: &EntityDescriptor,
    collected_at: DateTime<Utc>,
) -> Vec<ReviewRecord> {
    raws.iter()
        .map(|raw| normalize(raw, entity, collected_at))
        .collect()
}

/// Accepts RFC 3339, naive `YYYY-MM-DD HH:MM:SS` (read as UTC) and unix
/// seconds or milliseconds.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
                        .iter()
                        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                        .map(|naive| naive.and_utc())
                })
        }
        Value::Number(n) => {
            let ts = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            if ts.abs() >= MILLIS_THRESHOLD {
                DateTime::from_timestamp_millis(ts)
            } else {
                DateTime::from_timestamp(ts, 0)
            }
        }
        _ => None,
    }
}
