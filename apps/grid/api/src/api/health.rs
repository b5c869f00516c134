//! Readiness check with real registry and embedding-store checks.

use crate::state::AppState;
use axum::{extract::State, response::Response};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

/// Readiness check endpoint.
///
/// The registry must answer a count and the embedding store must hold at
/// least one domain.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
        (
            "registry",
            Box::pin(async {
                state
                    .grid
                    .check_ready()
                    .await
                    .map(|_| ())
                    .map_err(|e| format!("Registry check failed: {}", e))
            }),
        ),
        (
            "embeddings",
            Box::pin(async {
                match state.grid.embedding_count() {
                    0 => Err("Embedding store is empty".to_string()),
                    _ => Ok(()),
                }
            }),
        ),
    ];

    run_health_checks(checks).await
}
