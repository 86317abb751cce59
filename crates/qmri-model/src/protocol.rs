//! Acquisition protocol tables.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// A named acquisition protocol table: one label per column, one row per
/// measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolField {
    /// Protocol name, the first registry lookup key (e.g. "qData").
    pub name: String,
    /// Ordered column labels. Always materialized as a sequence, even for
    /// a single-column protocol.
    pub format: Vec<String>,
    /// Numeric matrix, `rows x format.len()`.
    pub mat: Vec<Vec<f64>>,
}

impl ProtocolField {
    /// Build a protocol field, enforcing that every row is as wide as the
    /// label list.
    pub fn new(
        name: impl Into<String>,
        format: Vec<String>,
        mat: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let name = name.into();
        let labels = format.len();
        if let Some(row) = mat.iter().find(|row| row.len() != labels) {
            return Err(ModelError::ShapeMismatch {
                field: name,
                columns: row.len(),
                labels,
            });
        }
        Ok(Self { name, format, mat })
    }

    /// Build a single-column protocol from a scalar label.
    pub fn single_column(
        name: impl Into<String>,
        label: impl Into<String>,
        values: Vec<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            format: vec![label.into()],
            mat: values.into_iter().map(|v| vec![v]).collect(),
        }
    }

    /// Number of measurement rows.
    pub fn row_count(&self) -> usize {
        self.mat.len()
    }

    /// Number of columns; equals the label count by construction.
    pub fn column_count(&self) -> usize {
        self.format.len()
    }

    /// Multiply every value in column `idx` by `factor`.
    pub(crate) fn scale_column(&mut self, idx: usize, factor: f64) {
        for row in &mut self.mat {
            row[idx] *= factor;
        }
    }
}
