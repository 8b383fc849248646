//! Shared, read-only application state

use crate::config::{default_model_path, ServerConfig};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::Arc;
use tabpredict_classifiers::{load_classifier, BinaryClassifier, ClassifierAdapter};
use tabpredict_core::{FeatureSchema, Result};
use tracing::{info, warn};

/// Everything a prediction needs, loaded once at startup.
///
/// Immutable for the lifetime of the process and shared by every request.
#[derive(Debug)]
pub struct PredictionContext {
    schema: FeatureSchema,
    classifier: Option<ClassifierAdapter>,
    model_name: Option<String>,
    model_path: PathBuf,
}

impl PredictionContext {
    /// Create a context from an already loaded schema and classifier
    pub fn new(schema: FeatureSchema, classifier: Option<Arc<dyn BinaryClassifier>>) -> Self {
        Self {
            schema,
            classifier: classifier.map(ClassifierAdapter::new),
            model_name: None,
            model_path: default_model_path(),
        }
    }

    /// Override the display name reported with predictions
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }

    /// Record where the classifier artifact is expected
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    /// Load schema and classifier from the configured paths.
    ///
    /// Missing files leave the context degraded rather than failing.
    pub fn load(config: &ServerConfig) -> Result<Self> {
        let schema = FeatureSchema::load(&config.feature_names_path, &config.feature_dtypes_path)?;
        let classifier = load_classifier(&config.model_path)?;

        if classifier.is_none() {
            warn!("Starting without a classifier, /predict will be unavailable");
        }

        let mut context = Self::new(schema, classifier).with_model_path(&config.model_path);
        if let Some(name) = &config.model_name {
            context = context.with_model_name(name.clone());
        }

        info!(
            "Prediction context ready: model_loaded={}, n_features={}",
            context.model_loaded(),
            context.schema.len()
        );
        Ok(context)
    }

    /// Feature schema
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Wrapped classifier, if one was loaded
    pub fn classifier(&self) -> Option<&ClassifierAdapter> {
        self.classifier.as_ref()
    }

    /// Whether a classifier was loaded
    pub fn model_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    /// Name reported with predictions
    pub fn model_name(&self) -> &str {
        self.model_name
            .as_deref()
            .or_else(|| self.classifier.as_ref().map(ClassifierAdapter::name))
            .unwrap_or("unknown")
    }

    /// Expected location of the classifier artifact
    pub fn model_path(&self) -> &PathBuf {
        &self.model_path
    }
}

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Schema and classifier
    pub context: Arc<PredictionContext>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Initialize application state from configuration
    pub fn new(config: ServerConfig, metrics_handle: Option<PrometheusHandle>) -> Result<Self> {
        info!("Initializing application state");
        let context = PredictionContext::load(&config)?;

        Ok(Self {
            config: Arc::new(config),
            context: Arc::new(context),
            metrics_handle,
        })
    }

    /// Build state around an existing context
    pub fn from_context(config: ServerConfig, context: PredictionContext) -> Self {
        Self {
            config: Arc::new(config),
            context: Arc::new(context),
            metrics_handle: None,
        }
    }
}
