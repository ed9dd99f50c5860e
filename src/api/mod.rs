//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All resource endpoints are mounted under `/api/v1`; system
//! endpoints live at the root. With the `swagger-ui` feature the
//! OpenAPI document is served at `/api-docs/openapi.json` with a
//! Swagger UI at `/docs`.

pub mod dto;
pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// OpenAPI document covering every mounted endpoint.
#[derive(Debug, utoipa::OpenApi)]
#[openapi(
    info(
        title = "booru-pools",
        description = "Pool management API for a booru-style image board"
    ),
    paths(
        handlers::pool::create_pool,
        handlers::pool::update_pool,
        handlers::pool::get_pool,
        handlers::pool::list_pools,
        handlers::pool::add_post_to_pool,
        handlers::pool::remove_post_from_pool,
        handlers::system::health_handler,
        handlers::system::privileges_handler,
    ),
    components(schemas(crate::error::ErrorResponse))
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/docs")
            .url("/api-docs/openapi.json", <ApiDoc as utoipa::OpenApi>::openapi()),
    );

    router
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use utoipa::OpenApi as _;

    use super::*;

    #[test]
    fn openapi_doc_collects_paths_and_error_schema() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/pools"));
        assert!(doc.paths.paths.contains_key("/api/v1/pools/{id}"));
        assert!(doc.paths.paths.contains_key("/api/v1/pools/{id}/posts/{post_id}"));
        assert!(doc.paths.paths.contains_key("/health"));

        let Some(components) = doc.components else {
            panic!("missing components");
        };
        assert!(components.schemas.contains_key("ErrorResponse"));
    }
}
