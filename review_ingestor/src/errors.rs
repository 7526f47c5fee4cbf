use thiserror::Error;

use crate::retry::EntityFailure;

/// The unified error type for the `review_ingestor` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// No entity produced a single review; the run has nothing to hand on.
    #[error("No reviews were collected from any of the {entities} configured entities")]
    NoReviews {
        entities: usize,
        failures: Vec<EntityFailure>,
    },

    /// Collection was started without any configured entity.
    #[error("No entities are configured")]
    NoEntities,
}
