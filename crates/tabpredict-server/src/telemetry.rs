//! Logging and metrics initialization

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Initialize tracing/logging
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("tabpredict=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tabpredict=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "tabpredict_requests_total",
        "Total number of prediction requests by outcome"
    );
    metrics::describe_counter!("tabpredict_rows_total", "Total number of rows predicted");
    metrics::describe_counter!(
        "tabpredict_probability_fallbacks_total",
        "Requests whose probabilities were omitted after a classifier failure"
    );
    metrics::describe_histogram!(
        "tabpredict_pipeline_latency_us",
        metrics::Unit::Microseconds,
        "Prediction pipeline latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
