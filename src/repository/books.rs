//! Books repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::fetch_page;
use crate::{
    error::{AppError, AppResult},
    models::{Book, PageRequest, PaginatedData},
};

const BOOK_SELECT: &str = r#"
    SELECT b.id, b.title, b.author_id, a.name AS author_name, b.created_at, b.updated_at
    FROM books b
    JOIN authors a ON a.id = b.author_id
"#;

const BOOK_ORDER: &str = "b.created_at DESC, b.id DESC";

/// Book persistence operations used by the services and the seeder
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BooksStore: Send + Sync {
    /// Books ordered newest first
    async fn find_paginated(&self, page: PageRequest) -> AppResult<PaginatedData<Book>>;

    /// Books of one author, newest first
    async fn find_by_author(&self, author_id: i32, page: PageRequest) -> AppResult<PaginatedData<Book>>;

    async fn find_by_author_and_title(&self, author_id: i32, title: &str) -> AppResult<Option<Book>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>>;

    async fn count_by_author(&self, author_id: i32) -> AppResult<i64>;

    async fn create(&self, author_id: i32, title: &str) -> AppResult<Book>;

    async fn update(&self, id: i32, title: &str) -> AppResult<Book>;

    /// Returns false when no row was deleted
    async fn delete(&self, id: i32) -> AppResult<bool>;

    /// Insert many books for one author in a single statement
    async fn insert_batch(&self, author_id: i32, titles: &[String]) -> AppResult<u64>;
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BooksStore for BooksRepository {
    async fn find_paginated(&self, page: PageRequest) -> AppResult<PaginatedData<Book>> {
        fetch_page(
            &self.pool,
            BOOK_SELECT,
            "SELECT COUNT(*) FROM books",
            BOOK_ORDER,
            None,
            page,
        )
        .await
    }

    async fn find_by_author(&self, author_id: i32, page: PageRequest) -> AppResult<PaginatedData<Book>> {
        let select = format!("{} WHERE b.author_id = $1", BOOK_SELECT);
        fetch_page(
            &self.pool,
            &select,
            "SELECT COUNT(*) FROM books WHERE author_id = $1",
            BOOK_ORDER,
            Some(author_id),
            page,
        )
        .await
    }

    async fn find_by_author_and_title(&self, author_id: i32, title: &str) -> AppResult<Option<Book>> {
        let query = format!(
            "{} WHERE b.author_id = $1 AND b.title = $2 ORDER BY {} LIMIT 1",
            BOOK_SELECT, BOOK_ORDER
        );
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(author_id)
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        let query = format!("{} WHERE b.id = $1", BOOK_SELECT);
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn count_by_author(&self, author_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn create(&self, author_id: i32, title: &str) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            WITH b AS (
                INSERT INTO books (author_id, title) VALUES ($1, $2)
                RETURNING *
            )
            SELECT b.id, b.title, b.author_id, a.name AS author_name, b.created_at, b.updated_at
            FROM b
            JOIN authors a ON a.id = b.author_id
            "#,
        )
        .bind(author_id)
        .bind(title)
        .fetch_one(&self.pool)
        .await?;
        Ok(book)
    }

    async fn update(&self, id: i32, title: &str) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            WITH b AS (
                UPDATE books SET title = $1, updated_at = NOW()
                WHERE id = $2
                RETURNING *
            )
            SELECT b.id, b.title, b.author_id, a.name AS author_name, b.created_at, b.updated_at
            FROM b
            JOIN authors a ON a.id = b.author_id
            "#,
        )
        .bind(title)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_batch(&self, author_id: i32, titles: &[String]) -> AppResult<u64> {
        if titles.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let mut builder =
            QueryBuilder::<Postgres>::new("INSERT INTO books (author_id, title, created_at, updated_at) ");
        builder.push_values(titles, |mut row, title| {
            row.push_bind(author_id)
                .push_bind(title)
                .push_bind(now)
                .push_bind(now);
        });

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
