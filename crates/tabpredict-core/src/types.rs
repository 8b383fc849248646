//! Core types for tabpredict

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// A single input row as received: column name to scalar value.
///
/// Key order follows the request body.
pub type RawRow = Map<String, Value>;

/// Compute the effective column set of a batch.
///
/// This is the union of keys across all rows, in first-seen order. Rows may be
/// sparse, so a column counts as present if any row supplies it.
pub fn effective_columns(rows: &[RawRow]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if seen.insert(key.as_str()) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Column-ordered batch handed to the classifier.
///
/// Every row has exactly one cell per column. Cells are JSON scalars: numbers
/// for coerced numeric columns, the original value otherwise, and `Null` where
/// the input was absent or could not be coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Frame {
    /// Create a frame, checking that every row matches the column count
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(Error::internal(format!(
                "row {} has {} cells, expected {}",
                i,
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    /// Column names in model input order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row-major cells
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the frame has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at (row, column name)
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }
}

/// Prediction for a single input row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Zero-based position of the row in the request batch
    pub row_id: usize,

    /// Predicted class label
    pub label: i64,

    /// Positive-class probability, when the classifier supports it
    pub probability: Option<f64>,
}
