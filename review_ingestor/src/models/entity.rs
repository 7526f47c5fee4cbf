//! Monitored applications.

use serde::{Deserialize, Serialize};

/// One monitored application, loaded once from configuration.
///
/// `code` is the short unique key carried on every collected record;
/// `source_id` is the opaque identifier handed to the review source
/// (for Google Play this is the package name).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Short unique key, e.g. `"CBE"`.
    pub code: String,
    /// Human-readable name, e.g. `"Commercial Bank of Ethiopia"`.
    pub display_name: String,
    /// Identifier understood by the review source.
    pub source_id: String,
}

impl EntityDescriptor {
    pub fn new(
        code: impl Into<String>,
        display_name: impl Into<String>,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            display_name: display_name.into(),
            source_id: source_id.into(),
        }
    }
}
