mod placement;

pub use placement::*;

use axum::{
    routing::{get, post},
    Router,
};
use axum_helpers::ErrorResponse;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{Coordinate, DomainResponse, RelatedEmbeddingsRequest, ResolveRequest};
use crate::neighbors::NeighborIndex;
use crate::repository::AssignmentRepository;
use crate::service::PlacementService;

/// OpenAPI documentation for the Grid API
#[derive(OpenApi)]
#[openapi(
    paths(
        resolve_coordinate,
        list_coordinates,
        seed_grid,
        random_embedding,
        related_embeddings,
    ),
    components(
        schemas(
            Coordinate,
            ResolveRequest,
            DomainResponse,
            RelatedEmbeddingsRequest,
            ErrorResponse
        )
    ),
    tags(
        (name = "grid", description = "Lazy placement of domains on the coordinate grid"),
        (name = "embeddings", description = "Read-only embedding lookups")
    )
)]
pub struct ApiDoc;

/// Create the grid router with all HTTP endpoints
pub fn router<R, N>(service: Arc<PlacementService<R, N>>) -> Router
where
    R: AssignmentRepository + 'static,
    N: NeighborIndex + 'static,
{
    Router::new()
        .route(
            "/coordinates",
            get(list_coordinates::<R, N>).post(resolve_coordinate::<R, N>),
        )
        .route("/seed", post(seed_grid::<R, N>))
        .route("/random_embedding", get(random_embedding::<R, N>))
        .route("/related_embeddings", post(related_embeddings::<R, N>))
        .with_state(service)
}
