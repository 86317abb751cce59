//! Persisted property slots.
//!
//! Every model property is stored as a [`PropertyValue`], a tagged union
//! covering the value shapes a model declares. The tag is fixed at
//! construction; nothing re-derives it from runtime shape, so a
//! one-element vector and a scalar stay distinct through a save/load
//! round trip.

use serde::{Deserialize, Serialize};

/// A single persisted property slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum PropertyValue {
    /// Boolean toggle.
    Bool(bool),
    /// Single numeric value.
    Scalar(f64),
    /// Numeric vector.
    Vector(Vec<f64>),
    /// Free text (also carries the version tag).
    Text(String),
    /// Ordered list of text choices.
    TextList(Vec<String>),
    /// A labelled numeric table: one label per column.
    Table {
        format: Vec<String>,
        rows: Vec<Vec<f64>>,
    },
}

impl PropertyValue {
    /// Short tag name, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Scalar(_) => "scalar",
            Self::Vector(_) => "vector",
            Self::Text(_) => "text",
            Self::TextList(_) => "text-list",
            Self::Table { .. } => "table",
        }
    }

    /// Borrow the text payload, if this is a text slot.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Borrow the boolean payload, if this is a bool slot.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// True when `other` carries the same tag as `self`.
    pub fn same_kind(&self, other: &PropertyValue) -> bool {
        self.kind_name() == other.kind_name()
    }
}
