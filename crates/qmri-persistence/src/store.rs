//! Save and patch-load reconciliation.
//!
//! `save` flattens every declared property of a model into a
//! [`ModelSnapshot`]. `load` reconciles an arbitrary snapshot back into a
//! live model field-by-field: the *current* schema drives the walk, so an
//! older snapshot loads into a newer schema (new properties keep their
//! defaults) and snapshot fields the schema no longer declares are
//! dropped. No per-version migration table is needed.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{PersistenceError, Result};
use crate::snapshot::{ModelSnapshot, VERSION_KEY, read_snapshot};
use crate::value::PropertyValue;

/// The seam between the snapshot store and any model object.
///
/// Implementors expose their property set as named, typed slots. The
/// declared name order is the model's current schema.
pub trait ModelProperties {
    /// Every declared property name, `version` included, in declaration
    /// order.
    fn property_names(&self) -> Vec<String>;

    /// Read a declared property. `None` means the property exists in the
    /// schema but has no representable value.
    fn property(&self, name: &str) -> Option<PropertyValue>;

    /// Overwrite a declared property with a persisted value.
    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<()>;
}

/// Where a snapshot to load comes from.
#[derive(Debug)]
pub enum SnapshotSource<'a> {
    /// An in-memory snapshot.
    Memory(&'a ModelSnapshot),
    /// Raw snapshot bytes, decoded before reconciliation.
    Bytes(&'a [u8]),
    /// A snapshot artifact on disk.
    File(&'a Path),
}

/// What `load` did with each side of the reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOutcome {
    /// Schema properties overwritten from the snapshot.
    pub applied: Vec<String>,
    /// Schema properties absent from the snapshot, left at their defaults.
    pub defaulted: Vec<String>,
    /// Snapshot properties unknown to the current schema, dropped.
    pub dropped: Vec<String>,
}

/// Flatten every declared property of `model` into a snapshot.
///
/// No filtering is applied: the version tag and all other declared
/// properties land in the snapshot. Fails if a declared property yields
/// no representable value, or if the version tag is empty.
pub fn save(model: &impl ModelProperties) -> Result<ModelSnapshot> {
    let mut snapshot = ModelSnapshot::default();
    for name in model.property_names() {
        let value = model
            .property(&name)
            .ok_or_else(|| PersistenceError::Serialization {
                property: name.clone(),
            })?;
        snapshot.insert(name, value);
    }
    if snapshot.version().is_none() {
        return Err(PersistenceError::Serialization {
            property: VERSION_KEY.to_string(),
        });
    }
    Ok(snapshot)
}

/// Reconcile a snapshot into `model` and report what happened.
///
/// The snapshot is never mutated. Fails with
/// [`PersistenceError::SchemaMismatch`] when the snapshot carries no
/// version tag; decode and I/O failures surface before any property is
/// touched.
pub fn load(model: &mut impl ModelProperties, source: SnapshotSource<'_>) -> Result<LoadOutcome> {
    let owned;
    let snapshot = match source {
        SnapshotSource::Memory(snapshot) => snapshot,
        SnapshotSource::Bytes(bytes) => {
            owned = ModelSnapshot::from_bytes(bytes)?;
            &owned
        }
        SnapshotSource::File(path) => {
            owned = read_snapshot(path)?;
            &owned
        }
    };

    if snapshot.version().is_none() {
        return Err(PersistenceError::SchemaMismatch);
    }

    let schema = model.property_names();
    let mut outcome = LoadOutcome::default();

    for name in &schema {
        match snapshot.get(name) {
            Some(value) => {
                model.set_property(name, value.clone())?;
                outcome.applied.push(name.clone());
            }
            None => {
                debug!(property = %name, "snapshot has no value; keeping default");
                outcome.defaulted.push(name.clone());
            }
        }
    }

    for name in snapshot.properties.keys() {
        if !schema.iter().any(|declared| declared == name) {
            warn!(property = %name, "snapshot property not in current schema; dropped");
            outcome.dropped.push(name.clone());
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// Minimal in-test model: a declared name list plus a value map.
    struct MapModel {
        names: Vec<String>,
        values: BTreeMap<String, PropertyValue>,
    }

    impl MapModel {
        fn new(version: &str) -> Self {
            let mut values = BTreeMap::new();
            values.insert(
                VERSION_KEY.to_string(),
                PropertyValue::Text(version.to_string()),
            );
            Self {
                names: vec![VERSION_KEY.to_string()],
                values,
            }
        }

        fn declare(&mut self, name: &str, value: PropertyValue) {
            self.names.push(name.to_string());
            self.values.insert(name.to_string(), value);
        }
    }

    impl ModelProperties for MapModel {
        fn property_names(&self) -> Vec<String> {
            self.names.clone()
        }

        fn property(&self, name: &str) -> Option<PropertyValue> {
            self.values.get(name).cloned()
        }

        fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<()> {
            if !self.names.iter().any(|declared| declared == name) {
                return Err(PersistenceError::UnknownProperty {
                    name: name.to_string(),
                });
            }
            self.values.insert(name.to_string(), value);
            Ok(())
        }
    }

    #[test]
    fn save_includes_every_declared_property() {
        let mut model = MapModel::new("1.2.0");
        model.declare("lambda", PropertyValue::Scalar(0.05));
        model.declare("use_l1", PropertyValue::Bool(true));

        let snapshot = save(&model).expect("save");
        assert_eq!(snapshot.version(), Some("1.2.0"));
        assert_eq!(snapshot.get("lambda"), Some(&PropertyValue::Scalar(0.05)));
        assert_eq!(snapshot.get("use_l1"), Some(&PropertyValue::Bool(true)));
    }

    #[test]
    fn save_rejects_empty_version() {
        let model = MapModel::new("");
        let err = save(&model).unwrap_err();
        assert!(matches!(err, PersistenceError::Serialization { .. }));
    }

    #[test]
    fn load_requires_a_version_tag() {
        let mut model = MapModel::new("1.0.0");
        let snapshot = ModelSnapshot::default();
        let err = load(&mut model, SnapshotSource::Memory(&snapshot)).unwrap_err();
        assert!(matches!(err, PersistenceError::SchemaMismatch));
    }

    #[test]
    fn load_patches_only_shared_properties() {
        let mut model = MapModel::new("2.0.0");
        model.declare("lambda", PropertyValue::Scalar(0.05));
        model.declare("new_knob", PropertyValue::Scalar(1.0));

        let mut snapshot = ModelSnapshot::new("1.0.0");
        snapshot.insert("lambda", PropertyValue::Scalar(0.2));
        snapshot.insert("retired_knob", PropertyValue::Bool(false));

        let outcome = load(&mut model, SnapshotSource::Memory(&snapshot)).expect("load");

        assert_eq!(model.property("lambda"), Some(PropertyValue::Scalar(0.2)));
        assert_eq!(model.property("new_knob"), Some(PropertyValue::Scalar(1.0)));
        assert_eq!(model.property("retired_knob"), None);
        assert_eq!(outcome.defaulted, vec!["new_knob".to_string()]);
        assert_eq!(outcome.dropped, vec!["retired_knob".to_string()]);
        assert!(outcome.applied.contains(&"lambda".to_string()));
    }
}
