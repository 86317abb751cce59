//! Declarative checkbox-to-control dependency rules.
//!
//! A rule maps one checkbox's state to a single transition on one target:
//! enable/disable, show/hide, or show/hide a whole panel. Rules are
//! applied in declaration order; each rule reads the checkbox and writes
//! the target independently, so the only cascading available to a model
//! author is the order the rules are declared in. Within one pass the
//! last writer for a given target wins.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::controls::ControlList;
use crate::error::{ModelError, Result};
use crate::value::ControlValue;

/// Which transition a rule drives on its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// Toggle the target's enabled/disabled axis.
    EnableDisable,
    /// Toggle the target's visible/hidden axis.
    ShowHideControl,
    /// Toggle a whole panel's visibility via its header.
    ShowHidePanel,
}

/// How the checkbox state maps onto the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivePolarity {
    /// Checked applies the negative state (hide / disable).
    OnTriggersNegative,
    /// Checked applies the positive state (show / enable).
    OnTriggersPositive,
}

/// One declared dependency between a checkbox and a target control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyRule {
    /// Name of the checkbox driving the transition.
    pub source_checkbox: String,
    /// Name of the control (or panel) the transition applies to.
    pub target: String,
    pub event: EventKind,
    pub polarity: ActivePolarity,
    /// Value forced onto the target just before it is disabled.
    /// Only meaningful for [`EventKind::EnableDisable`].
    pub assign_before_disable: Option<ControlValue>,
}

impl DependencyRule {
    pub fn new(
        source_checkbox: impl Into<String>,
        target: impl Into<String>,
        event: EventKind,
        polarity: ActivePolarity,
    ) -> Self {
        Self {
            source_checkbox: source_checkbox.into(),
            target: target.into(),
            event,
            polarity,
            assign_before_disable: None,
        }
    }

    /// Force `value` onto the target before disabling it.
    pub fn with_assignment(mut self, value: ControlValue) -> Self {
        self.assign_before_disable = Some(value);
        self
    }

    /// True when `checked` maps to the negative (hide/disable) state
    /// under this rule's polarity.
    fn negative_for(&self, checked: bool) -> bool {
        match self.polarity {
            ActivePolarity::OnTriggersNegative => checked,
            ActivePolarity::OnTriggersPositive => !checked,
        }
    }
}

/// Apply one rule given the source checkbox's current value.
///
/// All preconditions — target resolution, assignment shape, panel
/// validity — are checked before any mutation, so a failed rule leaves
/// the list unchanged.
pub fn apply_rule(list: &mut ControlList, rule: &DependencyRule, checked: bool) -> Result<()> {
    let negative = rule.negative_for(checked);
    debug!(
        source = %rule.source_checkbox,
        target = %rule.target,
        event = ?rule.event,
        negative,
        "applying dependency rule"
    );

    match rule.event {
        EventKind::EnableDisable => {
            if negative {
                // Validate the forced value against the target's shape
                // before touching anything.
                if let Some(value) = &rule.assign_before_disable {
                    let target = list.entry(&rule.target)?;
                    if !target.value.shape_matches(value) {
                        return Err(ModelError::InvalidAssignment {
                            control: target.name.clone(),
                            expected: target.kind().as_str(),
                            got: value.kind().as_str(),
                        });
                    }
                }
                let entry = list.entry_mut(&rule.target)?;
                if let Some(value) = &rule.assign_before_disable {
                    entry.value = value.clone();
                }
                entry.disabled = true;
            } else {
                let entry = list.entry_mut(&rule.target)?;
                if entry.disabled {
                    entry.disabled = false;
                }
            }
        }
        EventKind::ShowHideControl => {
            let entry = list.entry_mut(&rule.target)?;
            entry.hidden = negative;
        }
        EventKind::ShowHidePanel => {
            // Only the panel header carries group visibility.
            let header = list.panel_mut(&rule.target)?;
            header.hidden = negative;
        }
    }
    Ok(())
}

/// Apply a rule set in declaration order, reading each source checkbox's
/// current value from the list itself.
pub fn apply_rules(list: &mut ControlList, rules: &[DependencyRule]) -> Result<()> {
    for rule in rules {
        let checked = list
            .value_of(&rule.source_checkbox)?
            .as_flag()
            .ok_or_else(|| ModelError::ExpectedCheckbox {
                name: rule.source_checkbox.clone(),
            })?;
        apply_rule(list, rule, checked)?;
    }
    Ok(())
}
