use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Grid API",
        version = "0.1.0",
        description = "Places website domains on a 2D grid so that neighbouring cells are semantically related"
    ),
    servers(
        (url = "/api", description = "API base path")
    )
)]
struct ServiceDoc;

/// Service document with the grid routes mounted at the API root.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = ServiceDoc::openapi();
        doc.merge(domain_grid::ApiDoc::openapi());
        doc
    }
}
