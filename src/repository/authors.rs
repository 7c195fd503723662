//! Authors repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::fetch_page;
use crate::{
    error::{AppError, AppResult},
    models::{Author, PageRequest, PaginatedData},
};

const AUTHOR_COLUMNS: &str = r#"
    a.id, a.name, a.created_at, a.updated_at,
    (SELECT COUNT(*) FROM books b WHERE b.author_id = a.id) AS books_count
"#;

/// Author persistence operations used by the services
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorsStore: Send + Sync {
    /// Authors ordered newest first
    async fn find_paginated(&self, page: PageRequest) -> AppResult<PaginatedData<Author>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Author>>;

    /// Exact, case-sensitive name match
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Author>>;

    async fn create(&self, name: &str) -> AppResult<Author>;

    async fn update(&self, id: i32, name: &str) -> AppResult<Author>;

    /// Returns false when no row was deleted. Books go with their author.
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorsStore for AuthorsRepository {
    async fn find_paginated(&self, page: PageRequest) -> AppResult<PaginatedData<Author>> {
        let select = format!("SELECT {} FROM authors a", AUTHOR_COLUMNS);
        fetch_page(
            &self.pool,
            &select,
            "SELECT COUNT(*) FROM authors",
            "a.created_at DESC, a.id DESC",
            None,
            page,
        )
        .await
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Author>> {
        let query = format!("SELECT {} FROM authors a WHERE a.id = $1", AUTHOR_COLUMNS);
        let author = sqlx::query_as::<_, Author>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(author)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Author>> {
        let query = format!(
            "SELECT {} FROM authors a WHERE a.name = $1 ORDER BY a.id LIMIT 1",
            AUTHOR_COLUMNS
        );
        let author = sqlx::query_as::<_, Author>(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(author)
    }

    async fn create(&self, name: &str) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>(
            r#"
            WITH inserted AS (
                INSERT INTO authors (name) VALUES ($1)
                RETURNING *
            )
            SELECT a.id, a.name, a.created_at, a.updated_at, 0::bigint AS books_count
            FROM inserted a
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(author)
    }

    async fn update(&self, id: i32, name: &str) -> AppResult<Author> {
        let query = format!(
            r#"
            WITH a AS (
                UPDATE authors SET name = $1, updated_at = NOW()
                WHERE id = $2
                RETURNING *
            )
            SELECT {} FROM a
            "#,
            AUTHOR_COLUMNS
        );
        sqlx::query_as::<_, Author>(&query)
            .bind(name)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
