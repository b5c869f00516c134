use axum::{middleware, routing::get, Router};

pub mod health;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
pub fn routes(state: &crate::state::AppState) -> Router {
    domain_grid::handlers::router(state.grid.clone())
}

/// Creates a router with the /ready endpoint and the Prometheus scrape target.
///
/// This router has state applied and can be merged with the stateless app
/// router from `create_router`.
pub fn ops_router(state: crate::state::AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .route("/metrics", get(observability::metrics_handler))
        .with_state(state)
}

/// Records request counts and latencies for every route.
pub fn with_metrics(router: Router) -> Router {
    router.layer(middleware::from_fn(observability::metrics_middleware))
}
