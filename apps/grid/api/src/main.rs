use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_grid::{
    CosineIndex, EmbeddingStore, JsonFileAssignmentRepository, PlacementService, RandomSource,
    SeededRandom, ThreadRandom,
};
use eyre::WrapErr;
use observability::PlacementMetrics;
use std::sync::Arc;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    observability::init_metrics().wrap_err("Failed to install metrics recorder")?;

    let placement = &config.placement;

    // Load the embedding store and the persisted registry concurrently
    let (store, repository) = tokio::try_join!(
        EmbeddingStore::load(&placement.embeddings_path),
        JsonFileAssignmentRepository::open(&placement.state_path),
    )
    .wrap_err("Failed to load grid state")?;

    PlacementMetrics::set_embeddings_loaded(store.len());

    let random: Arc<dyn RandomSource> = match placement.random_seed {
        Some(seed) => {
            info!(seed, "Using seeded random source");
            Arc::new(SeededRandom::new(seed))
        }
        None => Arc::new(ThreadRandom),
    };

    let grid = PlacementService::new(repository, CosineIndex::new(store), random, placement);

    let state = AppState {
        config: config.clone(),
        grid: Arc::new(grid),
    };

    // Seed registry gauge with what was loaded from disk
    state.grid.assignments().await?;

    // create_router adds docs/middleware to our composed routes
    let router = create_router::<openapi::ApiDoc>(
        api::routes(&state),
        &state.config.server,
        &state.config.environment,
    )?;

    // - /health: liveness check with app name/version
    // - /ready: registry and embedding store checks
    // - /metrics: Prometheus scrape target
    let app = api::with_metrics(
        router
            .merge(health_router(state.config.app))
            .merge(api::ops_router(state.clone())),
    );

    info!(
        top_n = placement.top_n,
        seed_domain = %placement.seed_domain,
        state_path = %placement.state_path.display(),
        "Starting grid API"
    );

    let server = state.config.server.clone();
    create_production_app(app, &server, async move {
        // Every accepted assignment is already on disk; report the final size.
        match state.grid.assignments().await {
            Ok(map) => info!(assignments = map.len(), "Registry persisted"),
            Err(e) => tracing::error!("Failed to read registry during shutdown: {}", e),
        }
    })
    .await
    .wrap_err("Server error")?;

    info!("Grid API shutdown complete");
    Ok(())
}
