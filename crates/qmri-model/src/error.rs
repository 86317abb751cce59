//! Error types for model configuration and state machinery.
//!
//! Every variant is a structural or model-authoring defect: none is
//! transient, none is retried, and a failed operation leaves prior state
//! unchanged.

use thiserror::Error;

/// Errors raised by protocol scaling and control-graph operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The unit registry has no mapping for a declared protocol column.
    #[error("no unit mapping registered for column '{label}' of protocol '{protocol}'")]
    UnknownUnitMapping { protocol: String, label: String },

    /// A rule or query referenced a control name that does not exist.
    #[error("unknown control '{name}'")]
    UnknownControl { name: String },

    /// A panel operation targeted a name that is not a panel.
    #[error("control '{name}' is not a panel")]
    NotAPanel { name: String },

    /// A forced pre-disable assignment did not match the target's shape.
    #[error("cannot assign {got} value to {expected} control '{control}'")]
    InvalidAssignment {
        control: String,
        expected: &'static str,
        got: &'static str,
    },

    /// A dependency rule named a source control that is not a checkbox.
    #[error("rule source '{name}' is not a checkbox control")]
    ExpectedCheckbox { name: String },

    /// A protocol field's matrix width disagrees with its column labels.
    #[error("protocol '{field}' has {columns} matrix column(s) but {labels} label(s)")]
    ShapeMismatch {
        field: String,
        columns: usize,
        labels: usize,
    },
}

impl ModelError {
    pub(crate) fn unknown_control(name: impl Into<String>) -> Self {
        Self::UnknownControl { name: name.into() }
    }
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_both_lookup_keys() {
        let err = ModelError::UnknownUnitMapping {
            protocol: "qData".to_string(),
            label: "TE".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no unit mapping registered for column 'TE' of protocol 'qData'"
        );
    }
}
