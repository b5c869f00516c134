//! Application state management.

use domain_grid::{CosineIndex, JsonFileAssignmentRepository, PlacementService};
use std::sync::Arc;

/// Placement service backed by the snapshot file and the cosine index.
pub type GridService = PlacementService<JsonFileAssignmentRepository, CosineIndex>;

/// Shared application state.
///
/// Cloned per handler; only the `Arc` is copied.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// Placement engine shared by the API routes and the readiness probe
    pub grid: Arc<GridService>,
}
