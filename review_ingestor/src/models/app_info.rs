//! Store listing metadata for a monitored application.

use serde::{Deserialize, Serialize};

use crate::models::{entity::EntityDescriptor, raw_review::RawRecord};

pub const APP_INFO_COLUMNS: [&str; 8] = [
    "app_id",
    "title",
    "score",
    "ratings",
    "reviews",
    "installs",
    "entity_code",
    "entity_name",
];

/// Summary of an application's store listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppMetadata {
    pub app_id: String,
    pub title: String,
    /// Average star rating shown on the listing.
    pub score: f64,
    /// Number of ratings.
    pub ratings: u64,
    /// Number of written reviews.
    pub reviews: u64,
    /// Install bucket as displayed, e.g. `"1,000,000+"`.
    pub installs: String,
    pub entity_code: String,
    pub entity_name: String,
}

impl AppMetadata {
    /// Builds metadata from a raw listing, using `"N/A"`/`0` for missing fields.
    pub fn from_raw(raw: &RawRecord, entity: &EntityDescriptor) -> Self {
        let count = |key: &str| raw.integer(key).and_then(|v| u64::try_from(v).ok()).unwrap_or(0);
        Self {
            app_id: entity.source_id.clone(),
            title: raw.non_blank_text("title").unwrap_or_else(|| "N/A".to_string()),
            score: raw.float("score").unwrap_or(0.0),
            ratings: count("ratings"),
            reviews: count("reviews"),
            installs: raw.non_blank_text("installs").unwrap_or_else(|| "N/A".to_string()),
            entity_code: entity.code.clone(),
            entity_name: entity.display_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_listing_fields_fall_back() {
        let entity = EntityDescriptor::new("BOA", "Bank of Abyssinia", "com.boa.boaMobileBanking");
        let raw = RawRecord::new().with("score", "4.2").with("ratings", -3);
        let info = AppMetadata::from_raw(&raw, &entity);

        assert_eq!(info.app_id, "com.boa.boaMobileBanking");
        assert_eq!(info.title, "N/A");
        assert_eq!(info.score, 4.2);
        assert_eq!(info.ratings, 0);
        assert_eq!(info.installs, "N/A");
        assert_eq!(info.entity_name, "Bank of Abyssinia");
    }
}
