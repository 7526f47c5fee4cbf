//! Bounded retry around [`ReviewSource::fetch_reviews`].
//!
//! The controller is an explicit state machine:
//!
//! ```text
//! Attempting(n) --ok--------------------------> Succeeded
//! Attempting(n) --err, n <  max--sleep(delay)--> Attempting(n + 1)
//! Attempting(n) --err, n == max---------------> Exhausted
//! ```
//!
//! Attempts are strictly sequential. Exhaustion is not an error for the
//! caller: it yields an empty review list and exactly one failure record.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    models::{entity::EntityDescriptor, raw_review::RawReview, request_params::ReviewsRequest},
    providers::{ReviewSource, SourceError},
};

/// How many attempts to make and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. `0` is treated as `1`.
    pub max_retries: u32,
    /// Fixed pause between a failed attempt and the next one.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Number of attempts that will actually be made.
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(5),
        }
    }
}

/// States of one retry run.
#[derive(Debug)]
pub enum RetryState {
    /// About to make attempt number `attempt` (1-based).
    Attempting { attempt: u32 },
    /// Attempt `attempt` returned reviews.
    Succeeded { attempt: u32, reviews: Vec<RawReview> },
    /// Every allowed attempt failed; `last_error` is the final one.
    Exhausted { attempts: u32, last_error: SourceError },
}

impl RetryState {
    /// Pure transition taken after attempt `attempt` finished with `result`.
    pub fn advance(
        attempt: u32,
        result: Result<Vec<RawReview>, SourceError>,
        policy: &RetryPolicy,
    ) -> RetryState {
        match result {
            Ok(reviews) => RetryState::Succeeded { attempt, reviews },
            Err(last_error) if attempt >= policy.attempts() => RetryState::Exhausted {
                attempts: attempt,
                last_error,
            },
            Err(_) => RetryState::Attempting {
                attempt: attempt + 1,
            },
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RetryState::Attempting { .. })
    }
}

/// A fetch that could not be recovered by retrying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityFailure {
    pub entity_code: String,
    pub attempts: u32,
    pub message: String,
}

/// Terminal result of [`fetch_with_retry`].
#[derive(Debug)]
pub enum RetryOutcome {
    Succeeded {
        reviews: Vec<RawReview>,
        attempts: u32,
    },
    Exhausted(EntityFailure),
}

impl RetryOutcome {
    /// Reviews fetched, empty when retries were exhausted.
    pub fn into_parts(self) -> (Vec<RawReview>, Option<EntityFailure>) {
        match self {
            RetryOutcome::Succeeded { reviews, .. } => (reviews, None),
            RetryOutcome::Exhausted(failure) => (Vec::new(), Some(failure)),
        }
    }

    pub fn failure(&self) -> Option<&EntityFailure> {
        match self {
            RetryOutcome::Exhausted(failure) => Some(failure),
            RetryOutcome::Succeeded { .. } => None,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            RetryOutcome::Succeeded { attempts, .. } => *attempts,
            RetryOutcome::Exhausted(failure) => failure.attempts,
        }
    }
}

/// Fetches reviews for `entity`, retrying failed attempts per `policy`.
pub async fn fetch_with_retry<S>(
    source: &S,
    entity: &EntityDescriptor,
    request: &ReviewsRequest,
    policy: &RetryPolicy,
) -> RetryOutcome
where
    S: ReviewSource + ?Sized,
{
    let mut state = RetryState::Attempting { attempt: 1 };

    loop {
        state = match state {
            RetryState::Attempting { attempt } => {
                let result = source.fetch_reviews(request).await;
                if let Err(err) = &result {
                    warn!(
                        entity = %entity.code,
                        attempt,
                        max_attempts = policy.attempts(),
                        error = %err,
                        "review fetch attempt failed"
                    );
                }

                let next = RetryState::advance(attempt, result, policy);
                if !next.is_terminal() {
                    tokio::time::sleep(policy.delay).await;
                }
                next
            }
            RetryState::Succeeded { attempt, reviews } => {
                return RetryOutcome::Succeeded {
                    reviews,
                    attempts: attempt,
                };
            }
            RetryState::Exhausted {
                attempts,
                last_error,
            } => {
                warn!(
                    entity = %entity.code,
                    attempts,
                    error = %last_error,
                    "giving up on entity after max retries"
                );
                return RetryOutcome::Exhausted(EntityFailure {
                    entity_code: entity.code.clone(),
                    attempts,
                    message: last_error.to_string(),
                });
            }
        };
    }
}
