use crate::{
    models::request_params::{AppMetadataRequest, ReviewsRequest},
    providers::{SourceError, ValidationSnafu},
};

/// Upper bound the service accepts for a single page.
pub const MAX_PAGE_SIZE: usize = 200;

/// Rejects requests that can never succeed, before any network call.
pub fn validate_request(request: &ReviewsRequest) -> Result<(), SourceError> {
    if request.source_id.trim().is_empty() {
        return ValidationSnafu {
            message: "source_id must not be empty",
        }
        .fail();
    }
    if request.count == 0 {
        return ValidationSnafu {
            message: "count must be at least 1",
        }
        .fail();
    }
    Ok(())
}

/// Builds the query string for one page of reviews.
///
/// `remaining` is how many reviews are still wanted; the page size is capped at
/// [`MAX_PAGE_SIZE`].
pub fn construct_review_query(
    request: &ReviewsRequest,
    remaining: usize,
    continuation_token: Option<&str>,
) -> Vec<(String, String)> {
    let mut query = vec![
        ("lang".to_string(), request.lang.clone()),
        ("country".to_string(), request.country.clone()),
        ("sort".to_string(), request.sort.as_str().to_string()),
        (
            "count".to_string(),
            remaining.min(MAX_PAGE_SIZE).to_string(),
        ),
    ];
    if let Some(token) = continuation_token {
        query.push(("continuation_token".to_string(), token.to_string()));
    }
    query
}

pub fn construct_metadata_query(request: &AppMetadataRequest) -> Vec<(String, String)> {
    vec![
        ("lang".to_string(), request.lang.clone()),
        ("country".to_string(), request.country.clone()),
    ]
}
