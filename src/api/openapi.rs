//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "1.0.0",
        description = "Authors and books catalog REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::list_author_books,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
    ),
    components(
        schemas(
            authors::AuthorListResponse,
            authors::AuthorResponse,
            books::BookListResponse,
            books::BookResponse,
            crate::services::extractor::AuthorOut,
            crate::services::extractor::BookOut,
            crate::models::AuthorPayload,
            crate::models::BookPayload,
            crate::models::BookTitlePayload,
            crate::models::AuthorRef,
            crate::models::PaginationMeta,
            health::HealthResponse,
            crate::error::ErrorResponse,
            crate::error::ErrorBody,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "authors", description = "Author management"),
        (name = "books", description = "Book management")
    )
)]
pub struct ApiDoc;

/// Health probes live outside `/api/v1`
#[derive(OpenApi)]
#[openapi(
    paths(health::health_check, health::readiness_check),
    components(schemas(health::HealthResponse, crate::error::ErrorResponse, crate::error::ErrorBody)),
    tags((name = "health", description = "Health check endpoints"))
)]
pub struct HealthDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_user",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-User-Name"))),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(
        SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi())
            .url("/api-docs/health.json", HealthDoc::openapi()),
    )
}
