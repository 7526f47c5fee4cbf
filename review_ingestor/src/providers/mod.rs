//! Review source abstraction.
//!
//! This module defines the [`ReviewSource`] trait, the single seam between the
//! pipeline and whatever actually lists app-store reviews (a scraping sidecar,
//! a vendor API, or an in-memory fixture in tests).
//!
//! Implementations return reviews as loosely typed [`RawReview`]s; the
//! [`normalize`](crate::normalize) module turns them into canonical records.
//! The trait is async and object safe, so callers can hold a
//! `Box<dyn ReviewSource + Send + Sync>` chosen at runtime.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use review_ingestor::models::{
//!     raw_review::{RawRecord, RawReview},
//!     request_params::{AppMetadataRequest, ReviewsRequest},
//! };
//! use review_ingestor::providers::{ReviewSource, SourceError};
//!
//! struct EmptySource;
//!
//! #[async_trait]
//! impl ReviewSource for EmptySource {
//!     async fn fetch_reviews(&self, _request: &ReviewsRequest) -> Result<Vec<RawReview>, SourceError> {
//!         Ok(vec![])
//!     }
//!
//!     async fn fetch_app_metadata(&self, _request: &AppMetadataRequest) -> Result<RawRecord, SourceError> {
//!         Ok(RawRecord::new())
//!     }
//! }
//! ```

pub mod http_json;

use async_trait::async_trait;
use shared_utils::env::MissingEnvVarError;
use snafu::{Backtrace, Snafu};

use crate::models::{
    raw_review::{RawRecord, RawReview},
    request_params::{AppMetadataRequest, ReviewsRequest},
};

/// Lists reviews and store metadata for one application at a time.
#[async_trait]
pub trait ReviewSource {
    /// Fetches up to `request.count` reviews, in the source's native order
    /// (newest first when `request.sort` is `Newest`).
    ///
    /// Returning fewer reviews than requested is not an error.
    async fn fetch_reviews(&self, request: &ReviewsRequest) -> Result<Vec<RawReview>, SourceError>;

    /// Fetches the store listing (title, score, install bucket, ...).
    async fn fetch_app_metadata(&self, request: &AppMetadataRequest)
    -> Result<RawRecord, SourceError>;
}

/// Errors that can occur while constructing a review source.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SourceInitError {
    /// missed environment variable.
    #[snafu(display("Missing environment variable: {source}"))]
    MissingEnvVar {
        source: MissingEnvVarError,
        backtrace: Backtrace,
    },

    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// Access token contains characters that cannot go into a header.
    #[snafu(display("Invalid access token format: {source}"))]
    InvalidToken {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },

    /// Base URL is empty or not http(s).
    #[snafu(display("Invalid review source URL '{url}'"))]
    InvalidBaseUrl { url: String, backtrace: Backtrace },
}

/// Errors a single fetch attempt can raise. All of them are treated as
/// transient by the retry controller.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SourceError {
    /// Transport failure (connection refused, timeout, bad body).
    #[snafu(display("Review request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The source answered with an error status.
    #[snafu(display("Review source error: {message}"))]
    Api {
        message: String,
        backtrace: Backtrace,
    },

    /// The request parameters were rejected before being sent.
    #[snafu(display("Invalid review request: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// The source is temporarily unable to serve the request.
    #[snafu(display("Review source unavailable: {message}"))]
    Unavailable {
        message: String,
        backtrace: Backtrace,
    },
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct StaticSource;
    struct DownSource;

    #[async_trait]
    impl ReviewSource for StaticSource {
        async fn fetch_reviews(
            &self,
            request: &ReviewsRequest,
        ) -> Result<Vec<RawReview>, SourceError> {
            Ok((0..request.count)
                .map(|i| RawRecord::new().with("reviewId", format!("r{i}")))
                .collect())
        }

        async fn fetch_app_metadata(
            &self,
            _request: &AppMetadataRequest,
        ) -> Result<RawRecord, SourceError> {
            Ok(RawRecord::new().with("title", "Static"))
        }
    }

    #[async_trait]
    impl ReviewSource for DownSource {
        async fn fetch_reviews(
            &self,
            _request: &ReviewsRequest,
        ) -> Result<Vec<RawReview>, SourceError> {
            UnavailableSnafu { message: "maintenance" }.fail()
        }

        async fn fetch_app_metadata(
            &self,
            _request: &AppMetadataRequest,
        ) -> Result<RawRecord, SourceError> {
            UnavailableSnafu { message: "maintenance" }.fail()
        }
    }

    // Picked at runtime, which is only possible through `Box<dyn ReviewSource>`.
    fn get_source(name: &str) -> Box<dyn ReviewSource + Send + Sync> {
        if name == "static" {
            Box::new(StaticSource)
        } else {
            Box::new(DownSource)
        }
    }

    fn request(count: usize) -> ReviewsRequest {
        ReviewsRequest {
            source_id: "com.example.bank".into(),
            lang: "en".into(),
            country: "us".into(),
            sort: Default::default(),
            count,
        }
    }

    #[tokio::test]
    async fn dynamic_source_dispatch() {
        let reviews = get_source("static").fetch_reviews(&request(3)).await.unwrap();
        assert_eq!(reviews.len(), 3);

        let err = get_source("down").fetch_reviews(&request(3)).await.unwrap_err();
        assert_eq!(err.to_string(), "Review source unavailable: maintenance");
    }
}
