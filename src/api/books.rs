//! Book endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    extract::{ApiJson, PathParams, QueryParams},
    models::{Book, BookPayload, BookTitlePayload, PageQuery, PaginationMeta},
    services::extractor::{BookExtractor, BookOut, Extractor},
    AppState,
};

/// One page of books
#[derive(Serialize, ToSchema)]
pub struct BookListResponse {
    pub books: Vec<BookOut>,
    pub pagination: PaginationMeta,
}

#[derive(Serialize, ToSchema)]
pub struct BookResponse {
    pub data: BookOut,
}

impl BookResponse {
    fn new(book: &Book) -> Json<Self> {
        Json(Self {
            data: BookExtractor.extract(book),
        })
    }
}

/// List books, newest first
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("api_user" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "One page of books", body = BookListResponse),
        (status = 403, description = "Missing or wrong API user", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Json<BookListResponse>> {
    let page = query.to_request(&state.config.pagination);
    let books = BookExtractor.extract_page(state.services.books.get_all(page).await?);

    Ok(Json(BookListResponse {
        pagination: books.metadata(),
        books: books.into_data(),
    }))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("api_user" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(State(state): State<AppState>, PathParams(id): PathParams<i32>) -> AppResult<Json<BookResponse>> {
    let book = state.services.books.get_by_id(id).await?;
    Ok(BookResponse::new(&book))
}

/// Create a book for an author given by id or name
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("api_user" = [])),
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid or duplicate book", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    let book = state.services.books.add(&payload).await?;
    Ok((StatusCode::CREATED, BookResponse::new(&book)))
}

/// Change the title of a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("api_user" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookTitlePayload,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid title", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    PathParams(id): PathParams<i32>,
    ApiJson(payload): ApiJson<BookTitlePayload>,
) -> AppResult<Json<BookResponse>> {
    let book = state.services.books.get_by_id(id).await?;
    let book = state.services.books.update(&book, &payload).await?;
    Ok(BookResponse::new(&book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("api_user" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(State(state): State<AppState>, PathParams(id): PathParams<i32>) -> AppResult<StatusCode> {
    state.services.books.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
