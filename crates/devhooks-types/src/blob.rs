//! Opaque key-value documents attached to events.
//!
//! The schema of a [`DataBlob`] belongs to whichever resource produced it
//! (a disk drive records nothing, a server rack records which slot the
//! accessed server sits in). The event layer passes blobs through without
//! interpreting them; the typed getters here are conveniences for the few
//! callers that know the schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// A schema-free key-value document. Serializes as a plain JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DataBlob(#[ts(type = "Record<string, unknown>")] BTreeMap<String, Value>);

impl DataBlob {
    /// Create an empty blob.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert, for constructing a blob inline.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up the raw value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Look up an unsigned integer that fits in a `u8` (slot numbers).
    ///
    /// Returns `None` when the key is missing, not an integer, or out of range.
    pub fn get_u8(&self, key: &str) -> Option<u8> {
        self.get(key)
            .and_then(Value::as_u64)
            .and_then(|n| u8::try_from(n).ok())
    }

    /// Whether the blob has a value for the key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the blob has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
