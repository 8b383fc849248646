//! Server configuration

use crate::cli::Cli;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Serialized classifier artifact
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// JSON list of feature names, in model input order
    #[serde(default = "default_feature_names_path")]
    pub feature_names_path: PathBuf,

    /// JSON mapping of feature name to dtype label
    #[serde(default = "default_feature_dtypes_path")]
    pub feature_dtypes_path: PathBuf,

    /// Display name reported with predictions, overriding the artifact's
    #[serde(default)]
    pub model_name: Option<String>,

    /// Cross-origin settings
    #[serde(default)]
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(model) = &cli.model {
            config.model_path = PathBuf::from(model);
        }

        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            feature_names_path: default_feature_names_path(),
            feature_dtypes_path: default_feature_dtypes_path(),
            model_name: None,
            cors: CorsConfig::default(),
        }
    }
}

/// Cross-origin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allow any origin (development)
    #[serde(default = "default_true")]
    pub allow_any_origin: bool,

    /// Allowed origins when `allow_any_origin` is off
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_any_origin: true,
            allowed_origins: Vec::new(),
        }
    }
}

pub(crate) fn default_model_path() -> PathBuf {
    PathBuf::from("models/classifier.json")
}

fn default_feature_names_path() -> PathBuf {
    PathBuf::from("feature_names.json")
}

fn default_feature_dtypes_path() -> PathBuf {
    PathBuf::from("feature_dtypes.json")
}

fn default_true() -> bool {
    true
}
