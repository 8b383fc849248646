//! Linear binary classifiers: logistic regression and linear SVM
//!
//! Both compute a decision value `intercept + sum(term(row))` per row and pick
//! the positive class when it is above zero. They differ only in how (and
//! whether) they turn the decision value into a probability.

use crate::classifier::{BinaryClassifier, ClassifierCapabilities};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tabpredict_core::{coerce_numeric, Error, Frame, Result};

/// Platt scaling parameters: `p = 1 / (1 + exp(a * f + b))`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlattScaling {
    pub a: f64,
    pub b: f64,
}

impl PlattScaling {
    fn apply(&self, decision: f64) -> f64 {
        1.0 / (1.0 + (self.a * decision + self.b).exp())
    }
}

/// Probability link of a linear model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinearKind {
    /// Logistic regression: probability is the sigmoid of the decision value
    LogisticRegression,

    /// Linear SVM: probability only when Platt parameters were fitted
    LinearSvm { platt: Option<PlattScaling> },
}

/// Contribution of a single input column to the decision value
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureTerm {
    /// `weight * (x - center) / scale`, with `impute` standing in for null
    Numeric {
        column: String,
        weight: f64,
        center: f64,
        scale: f64,
        impute: Option<f64>,
    },

    /// Per-category weight, `unknown` for unseen categories and null
    Categorical {
        column: String,
        weights: HashMap<String, f64>,
        unknown: f64,
    },
}

impl FeatureTerm {
    /// Input column this term reads
    pub fn column(&self) -> &str {
        match self {
            Self::Numeric { column, .. } | Self::Categorical { column, .. } => column,
        }
    }

    fn contribution(&self, cell: &Value, row: usize) -> Result<f64> {
        match self {
            Self::Numeric {
                column,
                weight,
                center,
                scale,
                impute,
            } => {
                let x = coerce_numeric(cell).as_f64().or(*impute).ok_or_else(|| {
                    Error::classifier(format!(
                        "row {row}: feature '{column}' has no numeric value and no impute value"
                    ))
                })?;
                Ok(weight * (x - center) / scale)
            }
            Self::Categorical {
                weights, unknown, ..
            } => {
                let key = match cell {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    Value::Bool(b) => Some(b.to_string()),
                    _ => None,
                };
                Ok(key
                    .and_then(|k| weights.get(&k).copied())
                    .unwrap_or(*unknown))
            }
        }
    }
}

/// A fitted linear binary classifier
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    name: String,
    kind: LinearKind,
    classes: [i64; 2],
    intercept: f64,
    terms: Vec<FeatureTerm>,
    thread_safe: bool,
}

impl LinearClassifier {
    /// Create a classifier; `classes[1]` is the positive class
    pub fn new(
        name: impl Into<String>,
        kind: LinearKind,
        classes: [i64; 2],
        intercept: f64,
        terms: Vec<FeatureTerm>,
    ) -> Result<Self> {
        for term in &terms {
            if let FeatureTerm::Numeric { column, scale, .. } = term {
                if *scale == 0.0 || !scale.is_finite() {
                    return Err(Error::classifier(format!(
                        "feature '{column}' has invalid scale {scale}"
                    )));
                }
            }
        }

        Ok(Self {
            name: name.into(),
            kind,
            classes,
            intercept,
            terms,
            thread_safe: true,
        })
    }

    /// Declare whether concurrent invocation is safe
    pub fn with_thread_safe(mut self, thread_safe: bool) -> Self {
        self.thread_safe = thread_safe;
        self
    }

    /// Probability link
    pub fn kind(&self) -> LinearKind {
        self.kind
    }

    /// Decision value per row
    pub fn decision_function(&self, frame: &Frame) -> Result<Vec<f64>> {
        let indices = self
            .terms
            .iter()
            .map(|term| {
                frame.column_index(term.column()).ok_or_else(|| {
                    Error::classifier(format!(
                        "input is missing feature '{}' required by {}",
                        term.column(),
                        self.name
                    ))
                })
            })
            .collect::<Result<Vec<usize>>>()?;

        frame
            .rows()
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                self.terms
                    .iter()
                    .zip(&indices)
                    .try_fold(self.intercept, |acc, (term, &col)| {
                        term.contribution(&cells[col], row).map(|c| acc + c)
                    })
            })
            .collect()
    }
}

impl BinaryClassifier for LinearClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> ClassifierCapabilities {
        let probability = match self.kind {
            LinearKind::LogisticRegression => true,
            LinearKind::LinearSvm { platt } => platt.is_some(),
        };
        ClassifierCapabilities {
            probability,
            thread_safe: self.thread_safe,
        }
    }

    fn predict_labels(&self, frame: &Frame) -> Result<Vec<i64>> {
        Ok(self
            .decision_function(frame)?
            .into_iter()
            .map(|d| if d > 0.0 { self.classes[1] } else { self.classes[0] })
            .collect())
    }

    fn predict_probabilities(&self, frame: &Frame) -> Result<Vec<f64>> {
        let link: Box<dyn Fn(f64) -> f64> = match self.kind {
            LinearKind::LogisticRegression => Box::new(sigmoid),
            LinearKind::LinearSvm { platt: Some(platt) } => Box::new(move |d| platt.apply(d)),
            LinearKind::LinearSvm { platt: None } => {
                return Err(Error::classifier(format!(
                    "{} was fitted without probability estimates",
                    self.name
                )))
            }
        };

        Ok(self
            .decision_function(frame)?
            .into_iter()
            .map(link)
            .collect())
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
