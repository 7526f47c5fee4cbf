//! Review collection: source abstraction, retry, normalization and persistence.

pub mod collect;
pub mod errors;
pub mod io;
pub mod models;
pub mod normalize;
pub mod providers;
pub mod retry;

pub use collect::{CollectConfig, Collection, collect, collect_app_metadata};
pub use errors::Error;
pub use models::{entity::EntityDescriptor, review::ReviewRecord};
pub use providers::{ReviewSource, SourceError};
pub use retry::{EntityFailure, RetryPolicy, fetch_with_retry};
