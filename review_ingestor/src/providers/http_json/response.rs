use serde::Deserialize;

use crate::models::raw_review::RawRecord;

/// One page of reviews as served by the listing service.
#[derive(Deserialize, Debug)]
pub struct ReviewPage {
    #[serde(default)]
    pub reviews: Vec<RawRecord>,
    #[serde(default, alias = "continuation_token", alias = "nextPageToken")]
    pub next_token: Option<String>,
}
