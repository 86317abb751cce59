//! Shared base behavior for quantitative MRI model objects.
//!
//! Three pieces of machinery every model carries:
//!
//! - **Unit scaling**: protocol tables convert between original and
//!   user-facing units through a registered scale-factor lookup; a
//!   single per-model flag guarantees no conversion is applied twice.
//! - **Control graph**: a flat ordered list of controls and panels,
//!   driven by declarative checkbox dependency rules.
//! - **Persistence**: the whole property set round-trips through
//!   `qmri-persistence` snapshots, tolerant of schema drift in both
//!   directions.
//!
//! Rendering is out of scope: the control graph computes what state a
//! control should be in, never how it is drawn.

#![deny(unsafe_code)]

pub mod controls;
pub mod dependency;
pub mod error;
pub mod model;
pub mod protocol;
pub mod provenance;
pub mod units;
pub mod value;

pub use controls::{ControlEntry, ControlItem, ControlList, PanelHeader};
pub use dependency::{ActivePolarity, DependencyRule, EventKind, apply_rule, apply_rules};
pub use error::{ModelError, Result};
pub use model::{BaseModel, SanityCheck, UNITS_KEY};
pub use protocol::ProtocolField;
pub use provenance::{EnvironmentInfo, HostEnvironment, ProvenanceStamp};
pub use units::{ScaleDirection, UnitMapping, UnitRegistry, UnitState, convert};
pub use value::{ControlKind, ControlValue};
