//! Classifier trait and capability descriptor

use tabpredict_core::{Error, Frame, Result};

/// A pre-fitted binary classifier over a column-ordered [`Frame`].
///
/// Implementations are opaque to the rest of the system: they receive the
/// coerced frame and return one value per row, in row order.
pub trait BinaryClassifier: Send + Sync {
    /// Display name reported alongside predictions
    fn name(&self) -> &str;

    /// Optional operations this classifier supports.
    ///
    /// Read once when the classifier is wrapped; it must not change afterwards.
    fn capabilities(&self) -> ClassifierCapabilities;

    /// Predict one class label per row
    fn predict_labels(&self, frame: &Frame) -> Result<Vec<i64>>;

    /// Predict the positive-class probability per row
    fn predict_probabilities(&self, _frame: &Frame) -> Result<Vec<f64>> {
        Err(Error::classifier(format!(
            "{} does not support probability estimates",
            self.name()
        )))
    }
}

/// Capabilities of a classifier, resolved once at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierCapabilities {
    /// Supports `predict_probabilities`
    pub probability: bool,

    /// Safe to invoke from several requests at once.
    ///
    /// When false, the adapter serialises every call.
    pub thread_safe: bool,
}

impl ClassifierCapabilities {
    /// Labels only, safe for concurrent use
    pub fn labels_only() -> Self {
        Self {
            probability: false,
            thread_safe: true,
        }
    }

    /// Labels and probabilities, safe for concurrent use
    pub fn with_probability() -> Self {
        Self {
            probability: true,
            thread_safe: true,
        }
    }

    /// Mark the classifier as unsafe for concurrent use
    pub fn serialized(mut self) -> Self {
        self.thread_safe = false;
        self
    }
}

impl Default for ClassifierCapabilities {
    fn default() -> Self {
        Self::labels_only()
    }
}
