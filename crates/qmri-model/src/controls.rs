//! The declarative control descriptor list.
//!
//! Controls are declared once, in display order, as a single flat list.
//! A panel is a contiguous run of controls introduced by a typed panel
//! header item (the list-level rendition of a `PANEL` sentinel entry).
//! A control's identity is its canonical name; visibility and enablement
//! are separate state fields and never leak into the name, so lookup is
//! marker-invariant by construction.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::value::{ControlKind, ControlValue};

/// One interactive control: identity, default, current value, and
/// presentation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlEntry {
    /// Canonical name; never carries marker prefixes.
    pub name: String,
    /// Declared default; fixes the control's kind.
    pub default: ControlValue,
    /// Current value, initialized from the default.
    pub value: ControlValue,
    /// Hidden by a dependency rule.
    pub hidden: bool,
    /// Disabled by a dependency rule.
    pub disabled: bool,
}

impl ControlEntry {
    fn new(name: impl Into<String>, default: ControlValue) -> Self {
        Self {
            name: name.into(),
            value: default.clone(),
            default,
            hidden: false,
            disabled: false,
        }
    }

    /// Derived classification of this control.
    pub fn kind(&self) -> ControlKind {
        self.default.kind()
    }
}

/// The typed panel sentinel preceding a panel's first member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelHeader {
    /// Panel name; addresses the whole run for show/hide rules.
    pub name: String,
    /// Hidden state of the panel as a group.
    pub hidden: bool,
}

/// One slot of the flat ordered list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControlItem {
    Panel(PanelHeader),
    Control(ControlEntry),
}

/// Flat ordered list of panels and controls, built at model-definition
/// time and mutated only through dependency rules.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlList {
    items: Vec<ControlItem>,
}

impl ControlList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a panel; controls pushed afterwards belong to it until the
    /// next panel is declared.
    pub fn push_panel(&mut self, name: impl Into<String>) {
        self.items.push(ControlItem::Panel(PanelHeader {
            name: name.into(),
            hidden: false,
        }));
    }

    /// Declare a control with its default value.
    pub fn push_control(&mut self, name: impl Into<String>, default: ControlValue) {
        self.items
            .push(ControlItem::Control(ControlEntry::new(name, default)));
    }

    /// All items in declaration order.
    pub fn items(&self) -> &[ControlItem] {
        &self.items
    }

    /// Every control entry, panels skipped, in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = &ControlEntry> {
        self.items.iter().filter_map(|item| match item {
            ControlItem::Control(entry) => Some(entry),
            ControlItem::Panel(_) => None,
        })
    }

    /// Index of the control named `name` in the flat list.
    ///
    /// Lookup is by canonical name only; hidden/disabled state never
    /// affects resolution.
    pub fn find_entry(&self, name: &str) -> Result<usize> {
        self.items
            .iter()
            .position(|item| matches!(item, ControlItem::Control(entry) if entry.name == name))
            .ok_or_else(|| ModelError::unknown_control(name))
    }

    /// Index of the panel header named `name`.
    ///
    /// A name that resolves to an ordinary control is [`ModelError::NotAPanel`];
    /// a name that resolves to nothing is [`ModelError::UnknownControl`].
    pub fn panel_bounds_of(&self, name: &str) -> Result<usize> {
        if let Some(idx) = self
            .items
            .iter()
            .position(|item| matches!(item, ControlItem::Panel(header) if header.name == name))
        {
            return Ok(idx);
        }
        if self.find_entry(name).is_ok() {
            return Err(ModelError::NotAPanel {
                name: name.to_string(),
            });
        }
        Err(ModelError::unknown_control(name))
    }

    /// Borrow the control named `name`.
    pub fn entry(&self, name: &str) -> Result<&ControlEntry> {
        self.items
            .iter()
            .find_map(|item| match item {
                ControlItem::Control(entry) if entry.name == name => Some(entry),
                _ => None,
            })
            .ok_or_else(|| ModelError::unknown_control(name))
    }

    pub(crate) fn entry_mut(&mut self, name: &str) -> Result<&mut ControlEntry> {
        self.items
            .iter_mut()
            .find_map(|item| match item {
                ControlItem::Control(entry) if entry.name == name => Some(entry),
                _ => None,
            })
            .ok_or_else(|| ModelError::unknown_control(name))
    }

    pub(crate) fn panel_mut(&mut self, name: &str) -> Result<&mut PanelHeader> {
        let idx = self.panel_bounds_of(name)?;
        match &mut self.items[idx] {
            ControlItem::Panel(header) => Ok(header),
            ControlItem::Control(_) => Err(ModelError::NotAPanel {
                name: name.to_string(),
            }),
        }
    }

    /// Current value of the control named `name`.
    pub fn value_of(&self, name: &str) -> Result<&ControlValue> {
        self.entry(name).map(|entry| &entry.value)
    }

    /// Overwrite the current value of a control; the default (and thus
    /// the kind) is untouched.
    pub fn set_value(&mut self, name: &str, value: ControlValue) -> Result<()> {
        let entry = self.entry_mut(name)?;
        if !entry.value.shape_matches(&value) {
            return Err(ModelError::InvalidAssignment {
                control: entry.name.clone(),
                expected: entry.kind().as_str(),
                got: value.kind().as_str(),
            });
        }
        entry.value = value;
        Ok(())
    }

    /// Whether the control is hidden (directly or through its panel).
    pub fn is_hidden(&self, name: &str) -> Result<bool> {
        let idx = self.find_entry(name)?;
        if self.entry(name)?.hidden {
            return Ok(true);
        }
        // Walk back to the owning panel header, if any.
        for item in self.items[..idx].iter().rev() {
            if let ControlItem::Panel(header) = item {
                return Ok(header.hidden);
            }
        }
        Ok(false)
    }

    /// Whether the control is disabled.
    pub fn is_disabled(&self, name: &str) -> Result<bool> {
        self.entry(name).map(|entry| entry.disabled)
    }

    /// The contiguous run of controls belonging to panel `name`.
    pub fn panel_members(&self, name: &str) -> Result<Vec<&ControlEntry>> {
        let start = self.panel_bounds_of(name)?;
        let mut members = Vec::new();
        for item in &self.items[start + 1..] {
            match item {
                ControlItem::Control(entry) => members.push(entry),
                ControlItem::Panel(_) => break,
            }
        }
        Ok(members)
    }
}
