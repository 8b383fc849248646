//! Serialized classifier artifacts and their loading

use crate::classifier::BinaryClassifier;
use crate::linear::{FeatureTerm, LinearClassifier, LinearKind, PlattScaling};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tabpredict_core::{Error, Result};
use tracing::{info, warn};

/// On-disk description of a fitted classifier (JSON or YAML)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    /// Model family and its probability parameters
    #[serde(flatten)]
    pub kind: ModelKindSpec,

    /// Name reported with every prediction
    #[serde(default = "default_display_name")]
    pub display_name: String,

    /// Negative and positive class labels
    #[serde(default = "default_classes")]
    pub classes: [i64; 2],

    /// Decision function intercept
    #[serde(default)]
    pub intercept: f64,

    /// Per-column terms of the decision function
    pub features: Vec<FeatureSpec>,

    /// Whether the classifier may be invoked concurrently
    #[serde(default = "default_true")]
    pub thread_safe: bool,
}

/// Model family specification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelKindSpec {
    LogisticRegression,
    LinearSvm {
        #[serde(default)]
        platt: Option<PlattScaling>,
    },
}

/// Feature term specification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FeatureSpec {
    Numeric {
        name: String,
        weight: f64,
        #[serde(default)]
        center: f64,
        #[serde(default = "default_scale")]
        scale: f64,
        #[serde(default)]
        impute: Option<f64>,
    },
    Categorical {
        name: String,
        #[serde(default)]
        weights: HashMap<String, f64>,
        #[serde(default)]
        unknown: f64,
    },
}

impl ClassifierArtifact {
    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::classifier(format!("invalid classifier artifact: {e}")))
    }

    /// Read from file; `.yaml`/`.yml` are parsed as YAML, anything else as JSON
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// Build the runtime classifier
    pub fn build(self) -> Result<LinearClassifier> {
        let kind = match self.kind {
            ModelKindSpec::LogisticRegression => LinearKind::LogisticRegression,
            ModelKindSpec::LinearSvm { platt } => LinearKind::LinearSvm { platt },
        };

        let terms = self
            .features
            .into_iter()
            .map(|spec| match spec {
                FeatureSpec::Numeric {
                    name,
                    weight,
                    center,
                    scale,
                    impute,
                } => FeatureTerm::Numeric {
                    column: name,
                    weight,
                    center,
                    scale,
                    impute,
                },
                FeatureSpec::Categorical {
                    name,
                    weights,
                    unknown,
                } => FeatureTerm::Categorical {
                    column: name,
                    weights,
                    unknown,
                },
            })
            .collect();

        Ok(
            LinearClassifier::new(self.display_name, kind, self.classes, self.intercept, terms)?
                .with_thread_safe(self.thread_safe),
        )
    }
}

/// Load the classifier artifact at `path`.
///
/// A missing file is not an error: it yields `None` and the service runs
/// without a model. A file that exists but cannot be parsed or built is an
/// error.
pub fn load_classifier(path: impl AsRef<Path>) -> Result<Option<Arc<dyn BinaryClassifier>>> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("Classifier artifact not found at {}", path.display());
        return Ok(None);
    }

    let classifier = ClassifierArtifact::from_file(path)?.build()?;
    let capabilities = classifier.capabilities();
    info!(
        "Loaded classifier '{}' from {} (probability: {}, thread_safe: {})",
        classifier.name(),
        path.display(),
        capabilities.probability,
        capabilities.thread_safe
    );

    Ok(Some(Arc::new(classifier)))
}

fn default_display_name() -> String {
    "Support Vector Machine".to_string()
}

fn default_classes() -> [i64; 2] {
    [0, 1]
}

fn default_scale() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}
