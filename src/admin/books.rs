//! Book admin pages

use axum::{
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use crate::{
    error::AppResult,
    extract::{HtmlForm, PathParams, QueryParams},
    models::{AuthorRef, BookPayload, BookTitlePayload, PageQuery, PaginationView},
    services::extractor::{AuthorExtractor, AuthorOut, Extractor},
    AppState,
};

use super::{book_rows, ensure_owned, BookRow, Flash, FormState};

#[derive(Serialize)]
struct IndexPage {
    books: Vec<BookRow>,
    pagination: PaginationView,
    base: &'static str,
}

#[derive(Serialize)]
struct AddBookPage {
    author: AuthorOut,
    form: FormState,
}

/// GET /books
pub async fn index(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Html<String>> {
    let page = query.to_request(&state.config.pagination);
    let books = state.services.books.get_all(page).await?;
    let (books, pagination) = book_rows(books);

    let html = state.views.render(
        "admin/book/index",
        &IndexPage {
            books,
            pagination,
            base: "/books",
        },
    )?;
    Ok(Html(html))
}

/// GET /authors/:author_id/books
pub async fn new(
    State(state): State<AppState>,
    PathParams(author_id): PathParams<i32>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let author = state.services.authors.get_by_id(author_id).await?;
    let (jar, flash) = Flash::take(jar);

    let html = state.views.render(
        "admin/author/add_book",
        &AddBookPage {
            author: AuthorExtractor.extract(&author),
            form: flash.into(),
        },
    )?;
    Ok((jar, Html(html)))
}

/// POST /authors/:author_id/books
pub async fn store(
    State(state): State<AppState>,
    PathParams(author_id): PathParams<i32>,
    HtmlForm(form): HtmlForm<BookTitlePayload>,
) -> AppResult<Redirect> {
    let payload = BookPayload::new(form.title, AuthorRef::Id(author_id));
    state.services.books.add(&payload).await?;
    Ok(Redirect::to(&format!("/authors/{}", author_id)))
}

/// PUT /authors/:author_id/books/:book_id
pub async fn update(
    State(state): State<AppState>,
    PathParams((author_id, book_id)): PathParams<(i32, i32)>,
    HtmlForm(form): HtmlForm<BookTitlePayload>,
) -> AppResult<Redirect> {
    let book = state.services.books.get_by_id(book_id).await?;
    ensure_owned(&book, author_id)?;

    state.services.books.update(&book, &form).await?;
    Ok(Redirect::to(&format!("/authors/{}", author_id)))
}

/// DELETE /authors/:author_id/books/:book_id
pub async fn delete(
    State(state): State<AppState>,
    PathParams((author_id, book_id)): PathParams<(i32, i32)>,
) -> AppResult<Redirect> {
    let book = state.services.books.get_by_id(book_id).await?;
    ensure_owned(&book, author_id)?;

    state.services.books.remove(book.id).await?;
    Ok(Redirect::to(&format!("/authors/{}", author_id)))
}
