//! Bidirectional unit scaling for protocol tables.
//!
//! Scale factors are defined against a model's *original* units. Showing
//! a protocol to a user divides each column by its registered factor and
//! annotates the label with the unit symbol; returning to original units
//! multiplies back and strips the annotation. The per-model
//! [`UnitState`] flag is the single source of truth preventing a
//! conversion from ever being applied twice.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModelError, Result};
use crate::protocol::ProtocolField;

/// A registered unit annotation for one protocol column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitMapping {
    /// Display symbol appended to the column label, e.g. `"(s)"`.
    pub symbol: String,
    /// Original-unit value = user-unit value * `scale_factor`.
    pub scale_factor: f64,
}

/// Read-only lookup from `(protocol, column label)` to unit mapping.
///
/// Populated by the model registry at definition time; a lookup miss is a
/// model/registry definition bug, never a transient condition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitRegistry {
    /// Protocol name -> column label -> mapping.
    mappings: BTreeMap<String, BTreeMap<String, UnitMapping>>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the unit mapping for one protocol column.
    pub fn register(
        &mut self,
        protocol: impl Into<String>,
        label: impl Into<String>,
        symbol: impl Into<String>,
        scale_factor: f64,
    ) {
        self.mappings.entry(protocol.into()).or_default().insert(
            label.into(),
            UnitMapping {
                symbol: symbol.into(),
                scale_factor,
            },
        );
    }

    /// Look up the mapping for `(protocol, label)`.
    pub fn lookup(&self, protocol: &str, label: &str) -> Result<&UnitMapping> {
        self.mappings
            .get(protocol)
            .and_then(|columns| columns.get(label))
            .ok_or_else(|| ModelError::UnknownUnitMapping {
                protocol: protocol.to_string(),
                label: label.to_string(),
            })
    }
}

/// Which unit system the protocol set currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitState {
    /// Values are in the units the scale factors are defined against.
    #[default]
    Original,
    /// Values are divided down for display; labels carry unit symbols.
    UserFacing,
}

/// Conversion direction requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleDirection {
    ToUserUnits,
    ToOriginalUnits,
}

/// Planned mutation for one column: resolved before anything is touched.
struct ColumnPlan {
    column: usize,
    scale_factor: f64,
    new_label: String,
}

/// Convert the protocol set between original and user-facing units.
///
/// Returns the new mode. When `state` already matches the requested
/// direction the call performs zero numeric work and only confirms the
/// mode, so repeated calls cannot accumulate scaling or rounding error.
///
/// Every registry lookup for the whole set is resolved before any value
/// is mutated; a [`ModelError::UnknownUnitMapping`] therefore leaves the
/// protocol set untouched.
pub fn convert(
    fields: &mut [ProtocolField],
    registry: &UnitRegistry,
    direction: ScaleDirection,
    state: UnitState,
) -> Result<UnitState> {
    match (direction, state) {
        (ScaleDirection::ToUserUnits, UnitState::UserFacing) => Ok(UnitState::UserFacing),
        (ScaleDirection::ToOriginalUnits, UnitState::Original) => Ok(UnitState::Original),
        (ScaleDirection::ToUserUnits, UnitState::Original) => {
            let plans = plan(fields, registry, direction)?;
            apply(fields, plans, direction);
            Ok(UnitState::UserFacing)
        }
        (ScaleDirection::ToOriginalUnits, UnitState::UserFacing) => {
            let plans = plan(fields, registry, direction)?;
            apply(fields, plans, direction);
            Ok(UnitState::Original)
        }
    }
}

fn plan(
    fields: &[ProtocolField],
    registry: &UnitRegistry,
    direction: ScaleDirection,
) -> Result<Vec<Vec<ColumnPlan>>> {
    let mut all = Vec::with_capacity(fields.len());
    for field in fields {
        let mut plans = Vec::with_capacity(field.format.len());
        for (column, label) in field.format.iter().enumerate() {
            let plan = match direction {
                ScaleDirection::ToUserUnits => {
                    let mapping = registry.lookup(&field.name, label)?;
                    ColumnPlan {
                        column,
                        scale_factor: mapping.scale_factor,
                        new_label: format!("{label}{}", mapping.symbol),
                    }
                }
                ScaleDirection::ToOriginalUnits => {
                    let raw = strip_unit_annotation(label);
                    let mapping = registry.lookup(&field.name, raw)?;
                    ColumnPlan {
                        column,
                        scale_factor: mapping.scale_factor,
                        new_label: raw.to_string(),
                    }
                }
            };
            plans.push(plan);
        }
        all.push(plans);
    }
    Ok(all)
}

fn apply(fields: &mut [ProtocolField], all: Vec<Vec<ColumnPlan>>, direction: ScaleDirection) {
    for (field, plans) in fields.iter_mut().zip(all) {
        for plan in plans {
            debug!(
                protocol = %field.name,
                label = %plan.new_label,
                factor = plan.scale_factor,
                "rescaling protocol column"
            );
            // Divide once going to user units, multiply once coming back.
            match direction {
                ScaleDirection::ToUserUnits => {
                    for row in &mut field.mat {
                        row[plan.column] /= plan.scale_factor;
                    }
                }
                ScaleDirection::ToOriginalUnits => {
                    field.scale_column(plan.column, plan.scale_factor);
                }
            }
            field.format[plan.column] = plan.new_label;
        }
    }
}

/// Recover the raw label from a unit-annotated one: everything before the
/// first `(`. A label without an annotation is returned unchanged.
fn strip_unit_annotation(label: &str) -> &str {
    match label.find('(') {
        Some(open) => &label[..open],
        None => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_takes_the_substring_before_the_first_paren() {
        assert_eq!(strip_unit_annotation("TE(s)"), "TE");
        assert_eq!(strip_unit_annotation("Angle(deg)(x)"), "Angle");
        assert_eq!(strip_unit_annotation("TE"), "TE");
    }

    #[test]
    fn lookup_miss_names_protocol_and_label() {
        let registry = UnitRegistry::new();
        let err = registry.lookup("qData", "TE").unwrap_err();
        assert!(matches!(err, ModelError::UnknownUnitMapping { .. }));
    }
}
