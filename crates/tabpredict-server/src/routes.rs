//! HTTP routes and handlers

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tabpredict_core::{Error, PredictionResult, RawRow};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Span};

use crate::config::CorsConfig;
use crate::predict::{run_pipeline, PredictError};
use crate::state::AppState;
use crate::ui::render_form;

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/health", get(health_check))
        .route("/schema", get(schema))
        .route("/template", get(template))
        .route("/predict", post(predict))
        .route("/ui", get(ui))
        .route("/", get(ui))
        .route("/metrics", get(render_metrics))
        .fallback(fallback)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allow_any_origin {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub n_features: usize,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model_loaded: state.context.model_loaded(),
        n_features: state.context.schema().len(),
    })
}

async fn schema(State(state): State<AppState>) -> Json<Value> {
    let schema = state.context.schema();
    let feature_names = if schema.is_loaded() {
        json!(schema.names())
    } else {
        Value::Null
    };

    Json(json!({
        "feature_names": feature_names,
        "feature_dtypes": schema.dtypes(),
    }))
}

async fn template(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "rows": [state.context.schema().template_row()] }))
}

async fn ui(State(state): State<AppState>) -> Html<String> {
    Html(render_form(state.context.schema()))
}

async fn render_metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// One prediction in the response body
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionRow {
    pub row_id: usize,
    pub model_name: String,
    pub predicted_result: i64,
    pub predicted_probability: Option<f64>,
}

/// Prediction response body
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<PredictionRow>,
}

/// Prediction handler.
///
/// The body is parsed leniently: anything that is not a JSON object with a
/// `rows` array counts as a request without rows. A `rows` array holding
/// something other than objects is rejected with the offending position.
/// The pipeline itself runs on the blocking pool.
async fn predict(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let rows = parse_rows(&body).map_err(|row_id| {
        metrics::counter!("tabpredict_requests_total", "outcome" => "invalid_row").increment(1);
        PredictError::InvalidRow { row_id }
    })?;

    let context = Arc::clone(&state.context);
    let span = Span::current();
    let results = tokio::task::spawn_blocking(move || {
        span.in_scope(|| run_pipeline(&context, rows.as_deref()))
    })
    .await
    .map_err(|e| PredictError::Internal(Error::internal(format!("prediction task failed: {e}"))))??;
    info!("Predicted {} rows", results.len());

    let model_name = state.context.model_name();
    let predictions = results
        .into_iter()
        .map(|result: PredictionResult| PredictionRow {
            row_id: result.row_id,
            model_name: model_name.to_string(),
            predicted_result: result.label,
            predicted_probability: result.probability,
        })
        .collect();

    Ok(Json(PredictResponse { predictions }).into_response())
}

/// Extract the `rows` array from a request body.
///
/// `Ok(None)` when the body has no usable `rows` array, `Err(position)` for
/// the first element that is not an object.
fn parse_rows(body: &[u8]) -> Result<Option<Vec<RawRow>>, usize> {
    let Ok(Value::Object(mut request)) = serde_json::from_slice::<Value>(body) else {
        return Ok(None);
    };
    let Some(Value::Array(items)) = request.remove("rows") else {
        return Ok(None);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(row_id, item)| match item {
            Value::Object(row) => Ok(row),
            _ => Err(row_id),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

async fn fallback() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}

/// Error handling
#[derive(Debug)]
pub struct AppError(PredictError);

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            PredictError::ModelNotLoaded { model_path } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": format!(
                        "Model not loaded. Put {} and restart the server.",
                        model_path.display()
                    )
                }),
            ),
            PredictError::EmptyRequest => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Send JSON with key 'rows': [ {...}, {...} ]" }),
            ),
            PredictError::InvalidRow { row_id } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": format!("Row {} is not a JSON object", row_id) }),
            ),
            PredictError::SchemaMismatch(mismatch) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Missing columns",
                    "missing": mismatch.missing,
                    "extra": mismatch.extra,
                }),
            ),
            PredictError::LabelPrediction(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": format!("Prediction failed: {}", e) }),
            ),
            PredictError::Internal(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": format!("Internal error: {}", e) }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
