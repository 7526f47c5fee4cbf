//! Loosely typed records as produced by a review source.
//!
//! Review sources hand back heterogeneous JSON objects where any field may be
//! missing or carry an unexpected type. [`RawRecord`] keeps that shape at the
//! boundary and offers lenient accessors; everything past the normalizer works
//! on [`ReviewRecord`](crate::models::review::ReviewRecord) instead.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A raw key/value record straight from the source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

/// Raw review as returned by [`ReviewSource::fetch_reviews`](crate::providers::ReviewSource::fetch_reviews).
pub type RawReview = RawRecord;

impl RawRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert, mostly useful in tests and fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns the value for `key`, treating JSON `null` as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Renders scalar values as text. Strings are returned as-is, numbers and
    /// booleans are stringified, arrays and objects are rejected.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Like [`RawRecord::text`] but blank strings count as absent.
    pub fn non_blank_text(&self, key: &str) -> Option<String> {
        self.text(key).filter(|s| !s.trim().is_empty())
    }

    /// Reads an integer, accepting floats (rounded) and numeric strings.
    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.round() as i64)
                })
            }
            _ => None,
        }
    }

    /// Reads a float, accepting numeric strings.
    pub fn float(&self, key: &str) -> Option<f64> {
        let value = match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|f| f.is_finite())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
