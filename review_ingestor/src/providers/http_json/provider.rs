use async_trait::async_trait;
use reqwest::{Client, header};
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::{get_env_var, get_optional_env_var};
use snafu::{ResultExt, ensure};
use tracing::debug;

use crate::{
    models::{
        raw_review::{RawRecord, RawReview},
        request_params::{AppMetadataRequest, ReviewsRequest},
    },
    providers::{
        ApiSnafu, ClientBuildSnafu, InvalidBaseUrlSnafu, InvalidTokenSnafu, MissingEnvVarSnafu,
        ReqwestSnafu, ReviewSource, SourceError, SourceInitError,
        http_json::{
            params::{construct_metadata_query, construct_review_query, validate_request},
            response::ReviewPage,
        },
    },
};

/// Environment variable holding the service base URL.
pub const BASE_URL_ENV: &str = "REVIEW_SOURCE_URL";
/// Environment variable holding an optional bearer token.
pub const TOKEN_ENV: &str = "REVIEW_SOURCE_TOKEN";

pub struct HttpReviewSource {
    client: Client,
    base_url: String,
}

impl HttpReviewSource {
    /// Creates a source talking to `base_url`, optionally authenticating with a
    /// bearer token.
    pub fn new(
        base_url: impl Into<String>,
        token: Option<SecretString>,
    ) -> Result<Self, SourceInitError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        ensure!(
            base_url.starts_with("http://") || base_url.starts_with("https://"),
            InvalidBaseUrlSnafu { url: base_url }
        );

        let mut headers = header::HeaderMap::new();
        if let Some(token) = &token {
            let mut value =
                header::HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                    .context(InvalidTokenSnafu)?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self { client, base_url })
    }

    /// Creates a source from `REVIEW_SOURCE_URL` and, if set, `REVIEW_SOURCE_TOKEN`.
    pub fn from_env() -> Result<Self, SourceInitError> {
        let base_url = get_env_var(BASE_URL_ENV).context(MissingEnvVarSnafu)?;
        let token = get_optional_env_var(TOKEN_ENV).map(|t| SecretString::new(t.into()));
        Self::new(base_url, token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn app_url(&self, source_id: &str) -> String {
        format!("{}/apps/{}", self.base_url, source_id)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<T, SourceError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .context(ReqwestSnafu)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown review source error".to_string());
            return ApiSnafu {
                message: format!("{status}: {body}"),
            }
            .fail();
        }

        response.json::<T>().await.context(ReqwestSnafu)
    }
}

#[async_trait]
impl ReviewSource for HttpReviewSource {
    async fn fetch_reviews(&self, request: &ReviewsRequest) -> Result<Vec<RawReview>, SourceError> {
        validate_request(request)?;

        let url = format!("{}/reviews", self.app_url(&request.source_id));
        let mut collected: Vec<RawReview> = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let remaining = request.count.saturating_sub(collected.len());
            if remaining == 0 {
                break;
            }

            let query = construct_review_query(request, remaining, continuation_token.as_deref());
            let page: ReviewPage = self.get_json(&url, &query).await?;
            let page_len = page.reviews.len();
            collected.extend(page.reviews);
            debug!(
                source_id = %request.source_id,
                page_len,
                total = collected.len(),
                "fetched review page"
            );

            // Stop on an empty page even when a token came back.
            match page.next_token {
                Some(token) if page_len > 0 => continuation_token = Some(token),
                _ => break,
            }
        }

        collected.truncate(request.count);
        Ok(collected)
    }

    async fn fetch_app_metadata(
        &self,
        request: &AppMetadataRequest,
    ) -> Result<RawRecord, SourceError> {
        let url = self.app_url(&request.source_id);
        self.get_json(&url, &construct_metadata_query(request)).await
    }
}
