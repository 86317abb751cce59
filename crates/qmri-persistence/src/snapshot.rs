//! Versioned model snapshots.
//!
//! A snapshot is a flat, ordered property map with a reserved `version`
//! key. The byte encoding is JSON so saved models stay diffable; the
//! reconciliation logic in [`crate::store`] never depends on the encoding.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PersistenceError, Result};
use crate::value::PropertyValue;

/// Reserved property name carrying the schema version tag.
pub const VERSION_KEY: &str = "version";

/// A flattened, versioned record of a model's properties.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelSnapshot {
    /// Property name to persisted value, version tag included.
    pub properties: BTreeMap<String, PropertyValue>,
}

impl ModelSnapshot {
    /// Create an empty snapshot tagged with `version`.
    pub fn new(version: impl Into<String>) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert(VERSION_KEY.to_string(), PropertyValue::Text(version.into()));
        Self { properties }
    }

    /// Insert or replace a property slot.
    pub fn insert(&mut self, name: impl Into<String>, value: PropertyValue) {
        self.properties.insert(name.into(), value);
    }

    /// Look up a property slot by name.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// The version tag, if present and non-empty.
    pub fn version(&self) -> Option<&str> {
        self.properties
            .get(VERSION_KEY)
            .and_then(PropertyValue::as_text)
            .filter(|text| !text.is_empty())
    }

    /// Encode this snapshot as JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|err| PersistenceError::Encode {
            reason: err.to_string(),
        })
    }

    /// Decode a snapshot from JSON bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|err| PersistenceError::Decode {
            reason: err.to_string(),
        })
    }
}

/// Write a snapshot to `path` as a named JSON artifact.
pub fn write_snapshot(snapshot: &ModelSnapshot, path: &Path) -> Result<()> {
    let bytes = snapshot.to_bytes()?;
    fs::write(path, bytes).map_err(|err| PersistenceError::io("write", path, err))
}

/// Read a snapshot artifact from `path`.
pub fn read_snapshot(path: &Path) -> Result<ModelSnapshot> {
    let bytes = fs::read(path).map_err(|err| PersistenceError::io("read", path, err))?;
    ModelSnapshot::from_bytes(&bytes)
}
