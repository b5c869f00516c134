//! Observability utilities for the grid placement service.
//!
//! - Prometheus metrics recording and export
//! - Placement metrics (allocations, seeds, adapter latency)
//! - Axum middleware for automatic request metrics
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, PlacementMetrics};
//!
//! init_metrics()?;
//! PlacementMetrics::record_allocation("resolve");
//!
//! let app = Router::new().route("/metrics", get(metrics_handler));
//! ```

pub mod grid;
pub mod middleware;

pub use grid::PlacementMetrics;
pub use middleware::metrics_middleware;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder once per process.
///
/// Subsequent calls return the handle installed by the first one.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();
        Ok(handle)
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP request errors"
    );

    describe_counter!(
        "grid_allocations_total",
        "Coordinates newly assigned a domain, by operation"
    );
    describe_counter!(
        "grid_resolutions_total",
        "Coordinate lookups, by outcome (hit or allocated)"
    );
    describe_counter!(
        "grid_placement_failures_total",
        "Failed placements by error kind"
    );
    describe_histogram!(
        "grid_neighbor_query_duration_seconds",
        "Nearest-neighbour adapter latency in seconds"
    );
    describe_gauge!("grid_assigned_coordinates", "Coordinates currently assigned");
    describe_gauge!("grid_embeddings_loaded", "Items in the embedding store");
}
