//! The shared base behavior aggregate for model objects.
//!
//! A [`BaseModel`] owns the three pieces of per-model state the
//! machinery operates on: the control descriptor list, the acquisition
//! protocol tables, and the single unit-state flag. Persistence flows
//! through the [`ModelProperties`] seam: every control value, every
//! protocol table, the unit flag, and the version tag are declared
//! properties, so saved models reconcile across schema changes without
//! migration tables.

use serde::{Deserialize, Serialize};

use qmri_persistence::{ModelProperties, PersistenceError, PropertyValue, VERSION_KEY};

use crate::controls::ControlList;
use crate::dependency::{DependencyRule, apply_rules};
use crate::error::Result;
use crate::protocol::ProtocolField;
use crate::provenance::{EnvironmentInfo, ProvenanceStamp};
use crate::units::{ScaleDirection, UnitRegistry, UnitState, convert};
use crate::value::ControlValue;

/// Property name carrying the unit-state flag.
pub const UNITS_KEY: &str = "original_units_active";

/// Shared base state of a scientific model object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseModel {
    /// Schema version tag, persisted with every snapshot.
    pub version: String,
    /// Declarative control list, mutated only by dependency rules and
    /// forced assignments.
    pub controls: ControlList,
    /// Acquisition protocol tables, mutated only by unit scaling.
    pub protocol: Vec<ProtocolField>,
    /// Which unit system the protocol tables currently hold.
    pub unit_state: UnitState,
}

impl BaseModel {
    /// Create a model with the given schema version and no state.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            controls: ControlList::new(),
            protocol: Vec::new(),
            unit_state: UnitState::Original,
        }
    }

    /// Add a protocol table.
    pub fn with_protocol(mut self, field: ProtocolField) -> Self {
        self.protocol.push(field);
        self
    }

    /// Convert the protocol set to user-facing units. Safe to call
    /// repeatedly: the owned flag prevents double scaling.
    pub fn to_user_units(&mut self, registry: &UnitRegistry) -> Result<()> {
        self.unit_state = convert(
            &mut self.protocol,
            registry,
            ScaleDirection::ToUserUnits,
            self.unit_state,
        )?;
        Ok(())
    }

    /// Convert the protocol set back to original units.
    pub fn to_original_units(&mut self, registry: &UnitRegistry) -> Result<()> {
        self.unit_state = convert(
            &mut self.protocol,
            registry,
            ScaleDirection::ToOriginalUnits,
            self.unit_state,
        )?;
        Ok(())
    }

    /// Apply the model's dependency rules in declaration order.
    pub fn apply_rules(&mut self, rules: &[DependencyRule]) -> Result<()> {
        apply_rules(&mut self.controls, rules)
    }

    /// Stamp a provenance record for this model.
    pub fn provenance(&self, env: &dyn EnvironmentInfo) -> ProvenanceStamp {
        ProvenanceStamp::collect(env, self.version.clone())
    }

    fn protocol_field(&self, name: &str) -> Option<&ProtocolField> {
        self.protocol.iter().find(|field| field.name == name)
    }

    fn protocol_field_mut(&mut self, name: &str) -> Option<&mut ProtocolField> {
        self.protocol.iter_mut().find(|field| field.name == name)
    }
}

fn control_to_property(value: &ControlValue) -> PropertyValue {
    match value {
        ControlValue::Flag(flag) => PropertyValue::Bool(*flag),
        ControlValue::Scalar(scalar) => PropertyValue::Scalar(*scalar),
        ControlValue::Vector(vector) => PropertyValue::Vector(vector.clone()),
        ControlValue::Choices(choices) => PropertyValue::TextList(choices.clone()),
    }
}

fn property_to_control(value: &PropertyValue) -> Option<ControlValue> {
    match value {
        PropertyValue::Bool(flag) => Some(ControlValue::Flag(*flag)),
        PropertyValue::Scalar(scalar) => Some(ControlValue::Scalar(*scalar)),
        PropertyValue::Vector(vector) => Some(ControlValue::Vector(vector.clone())),
        PropertyValue::TextList(choices) => Some(ControlValue::Choices(choices.clone())),
        PropertyValue::Text(_) | PropertyValue::Table { .. } => None,
    }
}

impl ModelProperties for BaseModel {
    fn property_names(&self) -> Vec<String> {
        let mut names = vec![VERSION_KEY.to_string(), UNITS_KEY.to_string()];
        names.extend(self.controls.entries().map(|entry| entry.name.clone()));
        names.extend(self.protocol.iter().map(|field| field.name.clone()));
        names
    }

    fn property(&self, name: &str) -> Option<PropertyValue> {
        if name == VERSION_KEY {
            return Some(PropertyValue::Text(self.version.clone()));
        }
        if name == UNITS_KEY {
            return Some(PropertyValue::Bool(self.unit_state == UnitState::Original));
        }
        if let Ok(value) = self.controls.value_of(name) {
            return Some(control_to_property(value));
        }
        self.protocol_field(name).map(|field| PropertyValue::Table {
            format: field.format.clone(),
            rows: field.mat.clone(),
        })
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> qmri_persistence::Result<()> {
        let mismatch = || PersistenceError::Serialization {
            property: name.to_string(),
        };

        if name == VERSION_KEY {
            let version = value.as_text().ok_or_else(mismatch)?;
            self.version = version.to_string();
            return Ok(());
        }
        if name == UNITS_KEY {
            let original = value.as_bool().ok_or_else(mismatch)?;
            self.unit_state = if original {
                UnitState::Original
            } else {
                UnitState::UserFacing
            };
            return Ok(());
        }
        if self.controls.find_entry(name).is_ok() {
            let control = property_to_control(&value).ok_or_else(mismatch)?;
            return self.controls.set_value(name, control).map_err(|_| mismatch());
        }
        if let Some(field) = self.protocol_field_mut(name) {
            let PropertyValue::Table { format, rows } = value else {
                return Err(mismatch());
            };
            let replacement =
                ProtocolField::new(field.name.clone(), format, rows).map_err(|_| mismatch())?;
            *field = replacement;
            return Ok(());
        }
        Err(PersistenceError::UnknownProperty {
            name: name.to_string(),
        })
    }
}

/// Consumed validation collaborator: checks raw acquisition input before
/// fitting-related flows run. Interface only; implementations live with
/// the concrete models.
pub trait SanityCheck {
    /// Returns an error message when `input` is malformed for `model`,
    /// `None` when it passes.
    fn check(&self, model: &BaseModel, input: &serde_json::Value) -> Option<String>;
}
