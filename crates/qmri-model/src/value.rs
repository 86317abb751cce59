//! Typed control values and kind classification.

use serde::{Deserialize, Serialize};

/// The value a control currently holds (and its default shape).
///
/// The tag is fixed when the control is declared; a one-element vector is
/// still a vector, never reinterpreted as a scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum ControlValue {
    /// On/off toggle.
    Flag(bool),
    /// Single numeric value.
    Scalar(f64),
    /// Numeric vector edited as a small table.
    Vector(Vec<f64>),
    /// Ordered list of selectable text choices.
    Choices(Vec<String>),
}

/// Derived control classification, recomputed from the value tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlKind {
    Checkbox,
    SingleValue,
    Table,
    ChoiceList,
}

impl ControlKind {
    /// Human-readable kind name, used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checkbox => "checkbox",
            Self::SingleValue => "single-value",
            Self::Table => "table",
            Self::ChoiceList => "choice-list",
        }
    }
}

impl ControlValue {
    /// Classify this value: boolean is a checkbox, numeric scalar a
    /// single-value field, numeric vector a table, string list a choice
    /// list.
    pub fn kind(&self) -> ControlKind {
        match self {
            Self::Flag(_) => ControlKind::Checkbox,
            Self::Scalar(_) => ControlKind::SingleValue,
            Self::Vector(_) => ControlKind::Table,
            Self::Choices(_) => ControlKind::ChoiceList,
        }
    }

    /// True when `other` can legally overwrite this value.
    pub fn shape_matches(&self, other: &ControlValue) -> bool {
        self.kind() == other.kind()
    }

    /// Borrow the flag payload, if this is a checkbox value.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}
