//! Author admin pages

use axum::{
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use crate::{
    error::AppResult,
    extract::{HtmlForm, PathParams, QueryParams},
    models::{AuthorPayload, PageQuery, PaginationView},
    services::extractor::{AuthorExtractor, AuthorOut, Extractor},
    AppState,
};

use super::{book_rows, BookRow, Flash, FormState};

#[derive(Serialize)]
struct IndexPage {
    authors: Vec<AuthorOut>,
    pagination: PaginationView,
    base: &'static str,
}

#[derive(Serialize)]
struct CreatePage {
    form: FormState,
}

/// Show and edit pages: the author with one page of their books
#[derive(Serialize)]
struct AuthorPage {
    author: AuthorOut,
    books: Vec<BookRow>,
    pagination: PaginationView,
    base: String,
    form: FormState,
}

/// GET /authors
pub async fn index(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Html<String>> {
    let page = query.to_request(&state.config.pagination);
    let authors = AuthorExtractor.extract_page(state.services.authors.get_all(page).await?);

    let html = state.views.render(
        "admin/author/index",
        &IndexPage {
            pagination: authors.metadata().into(),
            authors: authors.into_data(),
            base: "/authors",
        },
    )?;
    Ok(Html(html))
}

/// GET /authors/new
pub async fn new(State(state): State<AppState>, jar: CookieJar) -> AppResult<(CookieJar, Html<String>)> {
    let (jar, flash) = Flash::take(jar);
    let html = state
        .views
        .render("admin/author/create", &CreatePage { form: flash.into() })?;
    Ok((jar, Html(html)))
}

/// POST /authors
pub async fn store(
    State(state): State<AppState>,
    HtmlForm(payload): HtmlForm<AuthorPayload>,
) -> AppResult<Redirect> {
    state.services.authors.add(&payload).await?;
    Ok(Redirect::to("/authors"))
}

/// GET /authors/:id
pub async fn show(
    State(state): State<AppState>,
    PathParams(id): PathParams<i32>,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Html<String>> {
    let page = author_page(&state, id, &query, FormState::default()).await?;
    Ok(Html(state.views.render("admin/author/show", &page)?))
}

/// GET /authors/:id/edit
pub async fn edit(
    State(state): State<AppState>,
    PathParams(id): PathParams<i32>,
    QueryParams(query): QueryParams<PageQuery>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let (jar, flash) = Flash::take(jar);
    let page = author_page(&state, id, &query, flash.into()).await?;
    Ok((jar, Html(state.views.render("admin/author/edit", &page)?)))
}

/// PUT /authors/:id
pub async fn update(
    State(state): State<AppState>,
    PathParams(id): PathParams<i32>,
    HtmlForm(payload): HtmlForm<AuthorPayload>,
) -> AppResult<Redirect> {
    let author = state.services.authors.update(id, &payload).await?;
    Ok(Redirect::to(&format!("/authors/{}", author.id)))
}

/// DELETE /authors/:id
pub async fn delete(State(state): State<AppState>, PathParams(id): PathParams<i32>) -> AppResult<Redirect> {
    state.services.authors.remove(id).await?;
    Ok(Redirect::to("/authors"))
}

async fn author_page(state: &AppState, id: i32, query: &PageQuery, form: FormState) -> AppResult<AuthorPage> {
    let author = state.services.authors.get_by_id(id).await?;
    let books = state
        .services
        .books
        .find_by_author(&author, query.to_request(&state.config.pagination))
        .await?;
    let (books, pagination) = book_rows(books);

    Ok(AuthorPage {
        base: format!("/authors/{}", author.id),
        author: AuthorExtractor.extract(&author),
        books,
        pagination,
        form,
    })
}
