use axum::{extract::State, Json};
use axum_helpers::{ErrorResponse, ValidatedJson};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::GridResult;
use crate::models::{to_keyed, DomainResponse, RelatedEmbeddingsRequest, ResolveRequest};
use crate::neighbors::NeighborIndex;
use crate::repository::AssignmentRepository;
use crate::service::PlacementService;

type SharedService<R, N> = State<Arc<PlacementService<R, N>>>;

/// Domain at a coordinate, allocating it on first request
#[utoipa::path(
    post,
    path = "/coordinates",
    tag = "grid",
    request_body = ResolveRequest,
    responses(
        (status = 200, description = "Domain placed at the coordinate", body = DomainResponse),
        (status = 400, description = "Grid not seeded or no related domain left", body = ErrorResponse),
        (status = 422, description = "Malformed request body", body = ErrorResponse),
        (status = 409, description = "Assignment conflict", body = ErrorResponse),
        (status = 503, description = "Neighbour lookup timed out", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn resolve_coordinate<R: AssignmentRepository, N: NeighborIndex>(
    State(service): SharedService<R, N>,
    ValidatedJson(input): ValidatedJson<ResolveRequest>,
) -> GridResult<Json<DomainResponse>> {
    let domain = service.resolve(input.target(), input.source()).await?;
    Ok(Json(domain.into()))
}

/// Every assignment as `{"x,y": "domain"}`
#[utoipa::path(
    get,
    path = "/coordinates",
    tag = "grid",
    responses(
        (status = 200, description = "Full coordinate map", body = BTreeMap<String, String>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_coordinates<R: AssignmentRepository, N: NeighborIndex>(
    State(service): SharedService<R, N>,
) -> GridResult<Json<BTreeMap<String, String>>> {
    let map = service.assignments().await?;
    Ok(Json(to_keyed(&map)))
}

/// Place the configured seed domain's neighbour at the origin
#[utoipa::path(
    post,
    path = "/seed",
    tag = "grid",
    responses(
        (status = 200, description = "Domain at the origin", body = DomainResponse),
        (status = 400, description = "Seed domain unknown or no related domain left", body = ErrorResponse),
        (status = 503, description = "Neighbour lookup timed out", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn seed_grid<R: AssignmentRepository, N: NeighborIndex>(
    State(service): SharedService<R, N>,
) -> GridResult<Json<DomainResponse>> {
    let domain = service.seed_default().await?;
    Ok(Json(domain.into()))
}

/// A uniformly random domain from the embedding store
#[utoipa::path(
    get,
    path = "/random_embedding",
    tag = "embeddings",
    responses(
        (status = 200, description = "Random domain", body = DomainResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn random_embedding<R: AssignmentRepository, N: NeighborIndex>(
    State(service): SharedService<R, N>,
) -> GridResult<Json<DomainResponse>> {
    let domain = service.random_domain()?;
    Ok(Json(domain.into()))
}

/// Nearest domains for each requested domain
#[utoipa::path(
    post,
    path = "/related_embeddings",
    tag = "embeddings",
    request_body = RelatedEmbeddingsRequest,
    responses(
        (status = 200, description = "Related domains keyed by requested domain", body = BTreeMap<String, Vec<String>>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 503, description = "Neighbour lookup timed out", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn related_embeddings<R: AssignmentRepository, N: NeighborIndex>(
    State(service): SharedService<R, N>,
    ValidatedJson(input): ValidatedJson<RelatedEmbeddingsRequest>,
) -> GridResult<Json<BTreeMap<String, Vec<String>>>> {
    let top_n = input.top_n();
    let related = service.related_embeddings(input.domains, top_n).await?;
    Ok(Json(related))
}
