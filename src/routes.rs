//! Router assembly

use axum::{
    http::Uri,
    middleware::{from_fn, from_fn_with_state},
    response::Redirect,
    routing::{get, put},
    Router,
};
use tower::Layer;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    admin,
    api::{self, require_api_user, API_PREFIX},
    error::AppError,
    middleware::{method_override, render_errors},
    AppState,
};

async fn page_not_found() -> AppError {
    AppError::NotFound("Page not found".to_string())
}

async fn api_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/authors",
            get(api::authors::list_authors).post(api::authors::create_author),
        )
        .route(
            "/authors/:id",
            get(api::authors::get_author)
                .put(api::authors::update_author)
                .delete(api::authors::delete_author),
        )
        .route("/authors/:id/books", get(api::authors::list_author_books))
        .route("/books", get(api::books::list_books).post(api::books::create_book))
        .route(
            "/books/:id",
            get(api::books::get_book)
                .put(api::books::update_book)
                .delete(api::books::delete_book),
        )
        .fallback(api_not_found)
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/authors") }))
        .route("/authors", get(admin::authors::index).post(admin::authors::store))
        .route("/authors/new", get(admin::authors::new))
        .route(
            "/authors/:id",
            get(admin::authors::show)
                .put(admin::authors::update)
                .delete(admin::authors::delete),
        )
        .route("/authors/:id/edit", get(admin::authors::edit))
        .route(
            "/authors/:author_id/books",
            get(admin::books::new).post(admin::books::store),
        )
        .route(
            "/authors/:author_id/books/:book_id",
            put(admin::books::update).delete(admin::books::delete),
        )
        .route("/books", get(admin::books::index))
}

/// All routes with error rendering, without transport layers
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        .nest(API_PREFIX, api_routes())
        .merge(admin_routes())
        .fallback(page_not_found)
        .layer(from_fn_with_state(state.clone(), require_api_user))
        .layer(from_fn_with_state(state.clone(), render_errors))
        .with_state(state)
        .merge(api::openapi::create_openapi_router())
}

/// Full application: method override ahead of routing, plus tracing,
/// CORS and compression
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routed = from_fn(method_override).layer(create_router(state));

    Router::new()
        .fallback_service(routed)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(CompressionLayer::new())
}
