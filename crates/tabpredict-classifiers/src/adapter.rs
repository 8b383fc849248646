//! Capability-gated wrapper around a loaded classifier

use crate::classifier::{BinaryClassifier, ClassifierCapabilities};
use parking_lot::Mutex;
use std::sync::Arc;
use tabpredict_core::{Error, Frame, Result};
use tracing::{debug, warn};

/// Wraps a [`BinaryClassifier`] for use by concurrent requests.
///
/// Capabilities are read once, at construction. Probability estimation
/// degrades to `None` per row instead of failing. Classifiers that are not
/// thread safe are invoked under a mutex, one call at a time.
pub struct ClassifierAdapter {
    classifier: Arc<dyn BinaryClassifier>,
    capabilities: ClassifierCapabilities,
    gate: Option<Mutex<()>>,
}

impl ClassifierAdapter {
    /// Wrap a classifier, resolving its capabilities
    pub fn new(classifier: Arc<dyn BinaryClassifier>) -> Self {
        let capabilities = classifier.capabilities();
        let gate = (!capabilities.thread_safe).then(|| Mutex::new(()));
        if gate.is_some() {
            debug!("Serializing calls to classifier '{}'", classifier.name());
        }

        Self {
            classifier,
            capabilities,
            gate,
        }
    }

    /// Display name of the wrapped classifier
    pub fn name(&self) -> &str {
        self.classifier.name()
    }

    /// Capabilities resolved at construction
    pub fn capabilities(&self) -> ClassifierCapabilities {
        self.capabilities
    }

    /// Whether calls are serialized behind a lock
    pub fn is_serialized(&self) -> bool {
        self.gate.is_some()
    }

    /// Predict one label per row. Errors propagate to the caller.
    pub fn predict_labels(&self, frame: &Frame) -> Result<Vec<i64>> {
        let labels = self.guarded(|| self.classifier.predict_labels(frame))?;
        if labels.len() != frame.len() {
            return Err(Error::classifier(format!(
                "{} returned {} labels for {} rows",
                self.name(),
                labels.len(),
                frame.len()
            )));
        }
        Ok(labels)
    }

    /// Predict the positive-class probability per row.
    ///
    /// Always returns one entry per row. Entries are `None` when the
    /// classifier lacks the capability, when the call fails, or when a value
    /// is not finite. Finite values are clamped to `[0, 1]`.
    pub fn predict_probabilities(&self, frame: &Frame) -> Vec<Option<f64>> {
        let unavailable = || vec![None; frame.len()];

        if !self.capabilities.probability {
            return unavailable();
        }

        match self.guarded(|| self.classifier.predict_probabilities(frame)) {
            Ok(probabilities) if probabilities.len() == frame.len() => probabilities
                .into_iter()
                .map(|p| p.is_finite().then(|| p.clamp(0.0, 1.0)))
                .collect(),
            Ok(probabilities) => {
                warn!(
                    "{} returned {} probabilities for {} rows, omitting them",
                    self.name(),
                    probabilities.len(),
                    frame.len()
                );
                metrics::counter!("tabpredict_probability_fallbacks_total").increment(1);
                unavailable()
            }
            Err(e) => {
                warn!("Probability estimation failed, omitting probabilities: {}", e);
                metrics::counter!("tabpredict_probability_fallbacks_total").increment(1);
                unavailable()
            }
        }
    }

    fn guarded<T>(&self, call: impl FnOnce() -> T) -> T {
        let _guard = self.gate.as_ref().map(|gate| gate.lock());
        call()
    }
}

impl std::fmt::Debug for ClassifierAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierAdapter")
            .field("name", &self.name())
            .field("capabilities", &self.capabilities)
            .finish()
    }
}
