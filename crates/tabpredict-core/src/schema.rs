//! Feature schema: ordered column names plus per-column dtype labels

use crate::dtype::is_numeric_dtype;
use crate::error::{Error, Result};
use crate::types::RawRow;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// Dtype assumed for columns without an explicit entry
pub const DEFAULT_DTYPE: &str = "object";

/// The feature schema the classifier was fitted on.
///
/// Immutable once loaded. A schema without a names list is the degraded
/// schema: `names()` is empty, validation and coercion become no-ops.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSchema {
    names: Option<Vec<String>>,
    dtypes: Map<String, Value>,
}

impl FeatureSchema {
    /// Build a schema from its parts, rejecting duplicate column names
    pub fn new(names: Option<Vec<String>>, dtypes: Map<String, Value>) -> Result<Self> {
        if let Some(names) = &names {
            let mut seen = HashSet::with_capacity(names.len());
            for name in names {
                if !seen.insert(name.as_str()) {
                    return Err(Error::schema(format!("duplicate feature name: {name}")));
                }
            }
        }

        let dtypes = dtypes
            .into_iter()
            .map(|(name, dtype)| {
                let label = match dtype {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (name, Value::String(label))
            })
            .collect();

        Ok(Self { names, dtypes })
    }

    /// Load the schema from a JSON names list and a JSON dtype mapping.
    ///
    /// Either file may be absent; absence degrades instead of failing.
    /// A file that exists but does not parse is an error.
    pub fn load(names_path: impl AsRef<Path>, dtypes_path: impl AsRef<Path>) -> Result<Self> {
        let names_path = names_path.as_ref();
        let dtypes_path = dtypes_path.as_ref();

        let names: Option<Vec<String>> = if names_path.exists() {
            let content = std::fs::read_to_string(names_path)?;
            Some(serde_json::from_str(&content)?)
        } else {
            warn!(
                "Feature names not found at {}, schema checks disabled",
                names_path.display()
            );
            None
        };

        let dtypes: Map<String, Value> = if dtypes_path.exists() {
            let content = std::fs::read_to_string(dtypes_path)?;
            serde_json::from_str(&content)?
        } else {
            warn!(
                "Feature dtypes not found at {}, all columns treated as {}",
                dtypes_path.display(),
                DEFAULT_DTYPE
            );
            Map::new()
        };

        let schema = Self::new(names, dtypes)?;
        info!(
            "Loaded feature schema: {} features, {} dtypes",
            schema.len(),
            schema.dtypes.len()
        );
        Ok(schema)
    }

    /// Ordered feature names; empty when no names list was loaded
    pub fn names(&self) -> &[String] {
        self.names.as_deref().unwrap_or(&[])
    }

    /// Whether a names list was loaded
    pub fn is_loaded(&self) -> bool {
        self.names.is_some()
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.names().len()
    }

    /// Whether the schema has no features
    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }

    /// Dtype label for a column, `"object"` when unknown
    pub fn dtype(&self, name: &str) -> &str {
        self.dtypes
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_DTYPE)
    }

    /// Raw dtype mapping as loaded
    pub fn dtypes(&self) -> &Map<String, Value> {
        &self.dtypes
    }

    /// Whether a column is numeric according to its dtype label
    pub fn is_numeric(&self, name: &str) -> bool {
        is_numeric_dtype(self.dtype(name))
    }

    /// Example input row: `0` for numeric columns, `""` for everything else
    pub fn template_row(&self) -> RawRow {
        self.names()
            .iter()
            .map(|name| {
                let default = if self.is_numeric(name) {
                    Value::from(0)
                } else {
                    Value::from("")
                };
                (name.clone(), default)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn schema(names: &[&str], dtypes: Value) -> FeatureSchema {
        FeatureSchema::new(
            Some(names.iter().map(|s| s.to_string()).collect()),
            dtypes.as_object().cloned().unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_dtype_defaults_to_object() {
        let schema = schema(&["age", "city"], json!({"age": "int64"}));
        assert_eq!(schema.dtype("age"), "int64");
        assert_eq!(schema.dtype("city"), "object");
        assert_eq!(schema.dtype("unknown"), "object");
        assert!(schema.is_numeric("age"));
        assert!(!schema.is_numeric("city"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = FeatureSchema::new(
            Some(vec!["a".into(), "b".into(), "a".into()]),
            Map::new(),
        );
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[test]
    fn test_degraded_schema() {
        let schema = FeatureSchema::default();
        assert!(!schema.is_loaded());
        assert!(schema.names().is_empty());
        assert_eq!(schema.dtype("anything"), DEFAULT_DTYPE);
        assert!(schema.template_row().is_empty());
    }

    #[test]
    fn test_template_row() {
        let schema = schema(
            &["age", "city", "income"],
            json!({"age": "int64", "city": "object", "income": "float64"}),
        );
        let row = schema.template_row();
        assert_eq!(Value::Object(row), json!({"age": 0, "city": "", "income": 0}));
        let keys: Vec<_> = schema.template_row().keys().cloned().collect();
        assert_eq!(keys, vec!["age", "city", "income"]);
    }

    #[test]
    fn test_non_string_dtype_is_stringified() {
        let schema = schema(&["flag"], json!({"flag": 1}));
        assert_eq!(schema.dtype("flag"), "1");
    }

    #[test]
    fn test_load_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let schema = FeatureSchema::load(
            dir.path().join("feature_names.json"),
            dir.path().join("feature_dtypes.json"),
        )
        .unwrap();
        assert!(!schema.is_loaded());
        assert!(schema.dtypes().is_empty());
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let names_path = dir.path().join("feature_names.json");
        let dtypes_path = dir.path().join("feature_dtypes.json");
        std::fs::File::create(&names_path)
            .unwrap()
            .write_all(br#"["age", "city"]"#)
            .unwrap();
        std::fs::File::create(&dtypes_path)
            .unwrap()
            .write_all(br#"{"age": "int64", "city": "object"}"#)
            .unwrap();

        let schema = FeatureSchema::load(&names_path, &dtypes_path).unwrap();
        assert!(schema.is_loaded());
        assert_eq!(schema.names(), ["age", "city"]);
        assert_eq!(schema.len(), 2);
        assert!(schema.is_numeric("age"));
    }

    #[test]
    fn test_load_malformed_names() {
        let dir = tempfile::tempdir().unwrap();
        let names_path = dir.path().join("feature_names.json");
        std::fs::write(&names_path, "not json").unwrap();

        let result = FeatureSchema::load(&names_path, dir.path().join("missing.json"));
        assert!(matches!(result, Err(Error::Serialization(_))));
    }
}
