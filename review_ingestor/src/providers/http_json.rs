//! Review source backed by a JSON review-listing service over HTTP.
//!
//! The service is expected to expose
//! - `GET {base}/apps/{source_id}/reviews` returning a page of reviews plus an
//!   optional continuation token, and
//! - `GET {base}/apps/{source_id}` returning the store listing.

pub mod params;
pub mod provider;
pub mod response;

pub use provider::HttpReviewSource;
