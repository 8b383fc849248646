//! Per-request prediction pipeline
//!
//! guard model → guard empty batch → validate → coerce → labels →
//! probabilities → assemble. Every stage is synchronous; a request either
//! yields one result per row or fails as a whole.

use std::path::PathBuf;
use std::time::Instant;
use tabpredict_core::{
    assemble, coerce, validate, Error, PredictionResult, RawRow, SchemaMismatch,
};
use tracing::{debug, error, info_span};

use crate::state::PredictionContext;

/// Reasons a prediction request fails
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// No classifier artifact was loaded at startup
    #[error("model not loaded (expected at {})", model_path.display())]
    ModelNotLoaded { model_path: PathBuf },

    /// The request carried no rows
    #[error("request contains no rows")]
    EmptyRequest,

    /// An element of `rows` was not a JSON object
    #[error("row {row_id} is not a JSON object")]
    InvalidRow { row_id: usize },

    /// The batch does not cover the feature schema
    #[error(transparent)]
    SchemaMismatch(#[from] SchemaMismatch),

    /// The classifier failed to produce labels
    #[error("label prediction failed: {0}")]
    LabelPrediction(#[source] Error),

    /// Any other unexpected failure
    #[error("internal error: {0}")]
    Internal(#[source] Error),
}

impl PredictError {
    /// Short outcome label for metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::ModelNotLoaded { .. } => "model_not_loaded",
            Self::EmptyRequest => "empty_request",
            Self::InvalidRow { .. } => "invalid_row",
            Self::SchemaMismatch(_) => "schema_mismatch",
            Self::LabelPrediction(_) => "label_failure",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Run the prediction pipeline over a batch.
///
/// `rows` is `None` when the request had no usable `rows` key.
pub fn run_pipeline(
    context: &PredictionContext,
    rows: Option<&[RawRow]>,
) -> Result<Vec<PredictionResult>, PredictError> {
    let request_id = uuid::Uuid::new_v4();
    let span = info_span!("predict", %request_id);
    let _enter = span.enter();

    let start = Instant::now();
    let result = execute(context, rows);

    let outcome = match &result {
        Ok(results) => {
            metrics::counter!("tabpredict_rows_total").increment(results.len() as u64);
            "success"
        }
        Err(e) => e.outcome(),
    };
    metrics::counter!("tabpredict_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("tabpredict_pipeline_latency_us")
        .record(start.elapsed().as_micros() as f64);

    result
}

fn execute(
    context: &PredictionContext,
    rows: Option<&[RawRow]>,
) -> Result<Vec<PredictionResult>, PredictError> {
    let classifier = context
        .classifier()
        .ok_or_else(|| PredictError::ModelNotLoaded {
            model_path: context.model_path().clone(),
        })?;

    let rows = match rows {
        Some(rows) if !rows.is_empty() => rows,
        _ => return Err(PredictError::EmptyRequest),
    };
    debug!("Received batch of {} rows", rows.len());

    validate(rows, context.schema())?;

    let frame = coerce(rows, context.schema()).map_err(PredictError::Internal)?;
    debug!("Coerced batch to {} columns", frame.columns().len());

    let labels = classifier.predict_labels(&frame).map_err(|e| {
        error!("Label prediction failed: {}", e);
        PredictError::LabelPrediction(e)
    })?;

    let probabilities = classifier.predict_probabilities(&frame);

    assemble(&frame, &labels, &probabilities).map_err(PredictError::Internal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};
    use std::sync::Arc;
    use tabpredict_classifiers::ClassifierArtifact;
    use tabpredict_core::FeatureSchema;

    fn schema() -> FeatureSchema {
        let dtypes = json!({"age": "int64", "city": "object"});
        FeatureSchema::new(
            Some(vec!["age".into(), "city".into()]),
            dtypes.as_object().cloned().unwrap(),
        )
        .unwrap()
    }

    fn context(artifact: &str) -> PredictionContext {
        let classifier = ClassifierArtifact::from_json(artifact).unwrap().build().unwrap();
        PredictionContext::new(schema(), Some(Arc::new(classifier)))
    }

    fn svm() -> PredictionContext {
        context(
            r#"{
                "kind": "linear_svm",
                "intercept": -3.0,
                "features": [
                    {"name": "age", "type": "numeric", "weight": 1.0, "impute": 0},
                    {"name": "city", "type": "categorical", "weights": {"x": 1.0}}
                ]
            }"#,
        )
    }

    fn rows(value: Value) -> Vec<RawRow> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_success_in_order() {
        let ctx = svm();
        let batch = rows(json!([
            {"age": "5", "city": "x"},
            {"city": "y", "age": 1},
            {"age": "junk", "city": "x", "extra": true}
        ]));

        let results = run_pipeline(&ctx, Some(batch.as_slice())).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(
            results.iter().map(|r| r.row_id).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(
            results.iter().map(|r| r.label).collect::<Vec<_>>(),
            vec![1, 0, 0]
        );
        assert!(results.iter().all(|r| r.probability.is_none()));
    }

    #[test]
    fn test_model_not_loaded_checked_first() {
        let ctx = PredictionContext::new(schema(), None);
        let result = run_pipeline(&ctx, None);
        assert!(matches!(result, Err(PredictError::ModelNotLoaded { .. })));
    }

    #[test]
    fn test_empty_and_absent_rows() {
        let ctx = svm();
        assert!(matches!(
            run_pipeline(&ctx, None),
            Err(PredictError::EmptyRequest)
        ));
        assert!(matches!(
            run_pipeline(&ctx, Some(&[][..])),
            Err(PredictError::EmptyRequest)
        ));
    }

    #[test]
    fn test_schema_mismatch() {
        let ctx = svm();
        let batch = rows(json!([{"city": "x", "zip": 1}]));
        match run_pipeline(&ctx, Some(batch.as_slice())) {
            Err(PredictError::SchemaMismatch(mismatch)) => {
                assert_eq!(mismatch.missing, vec!["age"]);
                assert_eq!(mismatch.extra, vec!["zip"]);
            }
            other => panic!("expected schema mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_label_failure_is_fatal() {
        let ctx = context(
            r#"{
                "kind": "logistic_regression",
                "features": [{"name": "age", "type": "numeric", "weight": 1.0}]
            }"#,
        );
        let batch = rows(json!([{"age": "not a number", "city": "x"}]));
        assert!(matches!(
            run_pipeline(&ctx, Some(batch.as_slice())),
            Err(PredictError::LabelPrediction(_))
        ));
    }

    #[test]
    fn test_probabilities_when_supported() {
        let ctx = context(
            r#"{
                "kind": "logistic_regression",
                "features": [{"name": "age", "type": "numeric", "weight": 1.0}]
            }"#,
        );
        let batch = rows(json!([{"age": 0, "city": "x"}]));
        let results = run_pipeline(&ctx, Some(batch.as_slice())).unwrap();
        let p = results[0].probability.unwrap();
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_degraded_schema_passes_raw_batch() {
        let classifier = ClassifierArtifact::from_json(
            r#"{"kind": "logistic_regression", "features": [{"name": "b", "type": "numeric", "weight": 1.0}]}"#,
        )
        .unwrap()
        .build()
        .unwrap();
        let ctx = PredictionContext::new(FeatureSchema::default(), Some(Arc::new(classifier)));

        let mut row = Map::new();
        row.insert("a".into(), json!("text"));
        row.insert("b".into(), json!("2"));
        let results = run_pipeline(&ctx, Some(std::slice::from_ref(&row))).unwrap();
        assert_eq!(results[0].label, 1);
    }
}
