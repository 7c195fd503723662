//! Author endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    extract::{ApiJson, PathParams, QueryParams},
    models::{Author, AuthorPayload, PageQuery, PaginationMeta},
    services::extractor::{AuthorExtractor, AuthorOut, BookExtractor, Extractor},
    AppState,
};

use super::books::BookListResponse;

/// One page of authors
#[derive(Serialize, ToSchema)]
pub struct AuthorListResponse {
    pub data: Vec<AuthorOut>,
    pub pagination: PaginationMeta,
}

#[derive(Serialize, ToSchema)]
pub struct AuthorResponse {
    pub data: AuthorOut,
}

impl AuthorResponse {
    fn new(author: &Author) -> Json<Self> {
        Json(Self {
            data: AuthorExtractor.extract(author),
        })
    }
}

/// List authors, newest first
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    security(("api_user" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "One page of authors", body = AuthorListResponse),
        (status = 403, description = "Missing or wrong API user", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Json<AuthorListResponse>> {
    let page = query.to_request(&state.config.pagination);
    let authors = AuthorExtractor.extract_page(state.services.authors.get_all(page).await?);

    Ok(Json(AuthorListResponse {
        pagination: authors.metadata(),
        data: authors.into_data(),
    }))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    security(("api_user" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    PathParams(id): PathParams<i32>,
) -> AppResult<Json<AuthorResponse>> {
    let author = state.services.authors.get_by_id(id).await?;
    Ok(AuthorResponse::new(&author))
}

/// List the books of an author
#[utoipa::path(
    get,
    path = "/authors/{id}/books",
    tag = "authors",
    security(("api_user" = [])),
    params(("id" = i32, Path, description = "Author ID"), PageQuery),
    responses(
        (status = 200, description = "One page of the author's books", body = BookListResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_author_books(
    State(state): State<AppState>,
    PathParams(id): PathParams<i32>,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Json<BookListResponse>> {
    let author = state.services.authors.get_by_id(id).await?;
    let books = state
        .services
        .books
        .find_by_author(&author, query.to_request(&state.config.pagination))
        .await?;
    let books = BookExtractor.extract_page(books);

    Ok(Json(BookListResponse {
        pagination: books.metadata(),
        books: books.into_data(),
    }))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    security(("api_user" = [])),
    request_body = AuthorPayload,
    responses(
        (status = 201, description = "Author created", body = AuthorResponse),
        (status = 400, description = "Malformed body", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid or duplicate name", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<AuthorPayload>,
) -> AppResult<(StatusCode, Json<AuthorResponse>)> {
    let author = state.services.authors.add(&payload).await?;
    Ok((StatusCode::CREATED, AuthorResponse::new(&author)))
}

/// Rename an author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    security(("api_user" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body = AuthorPayload,
    responses(
        (status = 200, description = "Author updated", body = AuthorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid or duplicate name", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    PathParams(id): PathParams<i32>,
    ApiJson(payload): ApiJson<AuthorPayload>,
) -> AppResult<Json<AuthorResponse>> {
    let author = state.services.authors.update(id, &payload).await?;
    Ok(AuthorResponse::new(&author))
}

/// Delete an author and all of their books
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    security(("api_user" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(State(state): State<AppState>, PathParams(id): PathParams<i32>) -> AppResult<StatusCode> {
    state.services.authors.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
