//! Collection orchestrator.
//!
//! Walks the configured entities in order, fetches each entity's reviews
//! through the retry controller, normalizes them and accumulates the result.
//! Entities are processed one after another with a pacing pause in between so
//! the source never sees parallel traffic from us.

use std::time::Duration;

use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    errors::Error,
    models::{
        app_info::AppMetadata,
        entity::EntityDescriptor,
        request_params::{AppMetadataRequest, ReviewsRequest, SortOrder},
        review::ReviewRecord,
    },
    normalize::normalize_all,
    providers::ReviewSource,
    retry::{EntityFailure, RetryPolicy, fetch_with_retry},
};

/// Collection settings, usually read from the `[collection]` config table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectConfig {
    /// Cap on reviews requested (and kept) per entity.
    pub reviews_per_bank: usize,
    pub lang: String,
    pub country: String,
    /// Total fetch attempts per entity.
    pub max_retries: u32,
    /// Pause between failed attempts, in seconds.
    pub retry_delay_secs: f64,
    /// Pause between two entities, in seconds.
    pub inter_entity_delay_secs: f64,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            reviews_per_bank: 400,
            lang: "en".to_string(),
            country: "us".to_string(),
            max_retries: 3,
            retry_delay_secs: 5.0,
            inter_entity_delay_secs: 2.0,
        }
    }
}

impl CollectConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, secs(self.retry_delay_secs))
    }

    pub fn inter_entity_delay(&self) -> Duration {
        secs(self.inter_entity_delay_secs)
    }

    fn reviews_request(&self, entity: &EntityDescriptor) -> ReviewsRequest {
        ReviewsRequest {
            source_id: entity.source_id.clone(),
            lang: self.lang.clone(),
            country: self.country.clone(),
            sort: SortOrder::Newest,
            count: self.reviews_per_bank,
        }
    }

    fn metadata_request(&self, entity: &EntityDescriptor) -> AppMetadataRequest {
        AppMetadataRequest {
            source_id: entity.source_id.clone(),
            lang: self.lang.clone(),
            country: self.country.clone(),
        }
    }
}

/// Negative, NaN or overflowing values collapse to zero.
fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_default()
}

/// Everything a collection run produced.
#[derive(Debug, Default)]
pub struct Collection {
    /// Canonical records in configuration order, source order within an entity.
    pub records: Vec<ReviewRecord>,
    /// One entry per entity whose retries were exhausted.
    pub failures: Vec<EntityFailure>,
    /// Review count per entity code, in configuration order.
    pub per_entity: IndexMap<String, usize>,
}

impl Collection {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Collects reviews for every entity.
///
/// One entity coming back empty (or failing) is logged and recorded in
/// [`Collection::failures`]; the run only fails with [`Error::NoReviews`] when
/// no entity yielded anything at all.
pub async fn collect<S>(
    source: &S,
    entities: &[EntityDescriptor],
    config: &CollectConfig,
) -> Result<Collection, Error>
where
    S: ReviewSource + ?Sized,
{
    if entities.is_empty() {
        return Err(Error::NoEntities);
    }

    let policy = config.retry_policy();
    let mut collection = Collection::default();

    for (idx, entity) in entities.iter().enumerate() {
        let request = config.reviews_request(entity);
        let outcome = fetch_with_retry(source, entity, &request, &policy).await;
        let (mut raws, failure) = outcome.into_parts();
        raws.truncate(config.reviews_per_bank);

        let records = normalize_all(&raws, entity, Utc::now());
        if records.is_empty() && failure.is_none() {
            warn!(entity = %entity.code, "source returned no reviews");
        }
        info!(
            entity = %entity.code,
            name = %entity.display_name,
            reviews = records.len(),
            "collected reviews"
        );

        collection
            .per_entity
            .insert(entity.code.clone(), records.len());
        collection.records.extend(records);
        if let Some(failure) = failure {
            collection.failures.push(failure);
        }

        if idx + 1 < entities.len() {
            tokio::time::sleep(config.inter_entity_delay()).await;
        }
    }

    if collection.records.is_empty() {
        return Err(Error::NoReviews {
            entities: entities.len(),
            failures: collection.failures,
        });
    }

    info!(
        total = collection.records.len(),
        failed_entities = collection.failures.len(),
        "collection complete"
    );
    Ok(collection)
}

/// Fetches store listing metadata for every entity.
///
/// Failures are logged and skipped; a missing listing never blocks review
/// collection.
pub async fn collect_app_metadata<S>(
    source: &S,
    entities: &[EntityDescriptor],
    config: &CollectConfig,
) -> Vec<AppMetadata>
where
    S: ReviewSource + ?Sized,
{
    let mut infos = Vec::with_capacity(entities.len());
    for entity in entities {
        match source
            .fetch_app_metadata(&config.metadata_request(entity))
            .await
        {
            Ok(raw) => infos.push(AppMetadata::from_raw(&raw, entity)),
            Err(err) => warn!(
                entity = %entity.code,
                error = %err,
                "failed to fetch app info"
            ),
        }
    }
    infos
}
