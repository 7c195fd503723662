//! Repository layer for database operations

pub mod authors;
pub mod books;

use sqlx::{postgres::PgRow, FromRow, Pool, Postgres};

use crate::{
    error::AppResult,
    models::{PageRequest, PaginatedData},
};

pub use authors::{AuthorsRepository, AuthorsStore};
pub use books::{BooksRepository, BooksStore};

/// Postgres repositories sharing one connection pool
#[derive(Clone)]
pub struct Repository {
    pub authors: AuthorsRepository,
    pub books: BooksRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: AuthorsRepository::new(pool.clone()),
            books: BooksRepository::new(pool),
        }
    }
}

/// Run a paginated SELECT and its COUNT(*) companion.
///
/// `select` and `count` may reference `$1`, bound to `filter` when present.
/// `order_by` must produce a stable order so pages do not overlap.
pub(crate) async fn fetch_page<T>(
    pool: &Pool<Postgres>,
    select: &str,
    count: &str,
    order_by: &str,
    filter: Option<i32>,
    request: PageRequest,
) -> AppResult<PaginatedData<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut count_builder = sqlx::query_scalar::<_, i64>(count);
    if let Some(id) = filter {
        count_builder = count_builder.bind(id);
    }
    let total = count_builder.fetch_one(pool).await?;

    let select_q = format!(
        "{} ORDER BY {} LIMIT {} OFFSET {}",
        select,
        order_by,
        request.page_size,
        request.offset()
    );
    let mut builder = sqlx::query_as::<_, T>(&select_q);
    if let Some(id) = filter {
        builder = builder.bind(id);
    }
    let rows = builder.fetch_all(pool).await?;

    Ok(PaginatedData::new(rows, request, total))
}
