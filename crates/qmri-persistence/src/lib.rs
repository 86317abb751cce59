//! Versioned model snapshots and schema-tolerant save/load.
//!
//! A model exposes its property set through [`ModelProperties`]; `save`
//! flattens it into a [`ModelSnapshot`] and `load` reconciles any
//! snapshot — older or newer — back into a live model. Reconciliation is
//! driven by the model's *current* schema, so snapshots survive schema
//! evolution in both directions without migration tables:
//!
//! - properties added since the snapshot keep their defaults,
//! - snapshot properties the schema no longer declares are dropped.

#![deny(unsafe_code)]

mod error;
mod snapshot;
mod store;
mod value;

pub use error::{PersistenceError, Result};
pub use snapshot::{ModelSnapshot, VERSION_KEY, read_snapshot, write_snapshot};
pub use store::{LoadOutcome, ModelProperties, SnapshotSource, load, save};
pub use value::PropertyValue;
