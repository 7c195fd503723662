//! Author management service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorPayload, PageRequest, PaginatedData, Payload},
    repository::AuthorsStore,
};

#[derive(Clone)]
pub struct AuthorService {
    authors: Arc<dyn AuthorsStore>,
}

impl AuthorService {
    pub fn new(authors: Arc<dyn AuthorsStore>) -> Self {
        Self { authors }
    }

    pub async fn get_all(&self, page: PageRequest) -> AppResult<PaginatedData<Author>> {
        self.authors.find_paginated(page).await
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Author>> {
        self.authors.find_by_id(id).await
    }

    /// Exact name lookup
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Author>> {
        self.authors.find_by_name(name).await
    }

    /// Get author by ID, failing with NotFound
    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    /// Create an author with a unique name
    pub async fn add(&self, data: &AuthorPayload) -> AppResult<Author> {
        data.check()?;

        if self.find_by_name(&data.name).await?.is_some() {
            return Err(AppError::invalid("author", "This author already exists").with_input(data.old_input()));
        }

        let author = self.authors.create(&data.name).await?;
        tracing::info!(author_id = author.id, "Author created");
        Ok(author)
    }

    /// Rename an author. The name must stay unique across authors.
    pub async fn update(&self, id: i32, data: &AuthorPayload) -> AppResult<Author> {
        let author = self.get_by_id(id).await?;

        data.check()?;

        if author.name != data.name {
            if let Some(other) = self.authors.find_by_name(&data.name).await? {
                if other.id != author.id {
                    return Err(
                        AppError::invalid("author", "This author already exists").with_input(data.old_input())
                    );
                }
            }
        }

        let author = self.authors.update(author.id, &data.name).await?;
        tracing::info!(author_id = author.id, "Author updated");
        Ok(author)
    }

    /// Delete an author together with their books
    pub async fn remove(&self, id: i32) -> AppResult<bool> {
        let author = self.get_by_id(id).await?;
        let deleted = self.authors.delete(author.id).await?;
        tracing::info!(author_id = author.id, books = author.books_count, "Author deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fixtures::author, repository::authors::MockAuthorsStore};
    use mockall::predicate::eq;

    fn service(store: MockAuthorsStore) -> AuthorService {
        AuthorService::new(Arc::new(store))
    }

    fn field_errors(err: AppError) -> crate::error::FieldErrors {
        match err {
            AppError::Validation { errors, .. } => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let mut store = MockAuthorsStore::new();
        store.expect_find_by_id().with(eq(9)).returning(|_| Ok(None));

        let err = service(store).get_by_id(9).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Author not found"));
    }

    #[tokio::test]
    async fn test_add_creates_author() {
        let mut store = MockAuthorsStore::new();
        store
            .expect_find_by_name()
            .withf(|name| name == "Чехов")
            .returning(|_| Ok(None));
        store
            .expect_create()
            .withf(|name| name == "Чехов")
            .times(1)
            .returning(|name| Ok(author(1, name)));

        let created = service(store).add(&AuthorPayload::new("Чехов")).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.name, "Чехов");
    }

    #[tokio::test]
    async fn test_add_rejects_duplicate_name() {
        let mut store = MockAuthorsStore::new();
        store
            .expect_find_by_name()
            .returning(|name| Ok(Some(author(4, name))));
        store.expect_create().never();

        let err = service(store).add(&AuthorPayload::new("Пушкин")).await.unwrap_err();
        let errors = field_errors(err);
        assert_eq!(errors["author"], vec!["This author already exists".to_string()]);
    }

    #[tokio::test]
    async fn test_add_validates_before_lookup() {
        let mut store = MockAuthorsStore::new();
        store.expect_find_by_name().never();
        store.expect_create().never();

        let err = service(store).add(&AuthorPayload::new("A")).await.unwrap_err();
        match err {
            AppError::Validation { errors, input } => {
                assert!(errors.contains_key("name"));
                assert_eq!(input["name"], "A");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_missing_author_wins_over_validation() {
        let mut store = MockAuthorsStore::new();
        store.expect_find_by_id().returning(|_| Ok(None));

        let err = service(store).update(3, &AuthorPayload::new("")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_name_of_other_author() {
        let mut store = MockAuthorsStore::new();
        store
            .expect_find_by_id()
            .with(eq(1))
            .returning(|id| Ok(Some(author(id, "Гоголь"))));
        store
            .expect_find_by_name()
            .returning(|name| Ok(Some(author(2, name))));
        store.expect_update().never();

        let err = service(store).update(1, &AuthorPayload::new("Чехов")).await.unwrap_err();
        assert!(field_errors(err).contains_key("author"));
    }

    #[tokio::test]
    async fn test_update_same_name_is_allowed() {
        let mut store = MockAuthorsStore::new();
        store
            .expect_find_by_id()
            .returning(|id| Ok(Some(author(id, "Гоголь"))));
        store.expect_find_by_name().never();
        store
            .expect_update()
            .withf(|id, name| *id == 1 && name == "Гоголь")
            .returning(|id, name| Ok(author(id, name)));

        let updated = service(store).update(1, &AuthorPayload::new("Гоголь")).await.unwrap();
        assert_eq!(updated.name, "Гоголь");
    }

    #[tokio::test]
    async fn test_remove() {
        let mut store = MockAuthorsStore::new();
        store
            .expect_find_by_id()
            .returning(|id| Ok(Some(author(id, "Гоголь"))));
        store.expect_delete().with(eq(5)).times(1).returning(|_| Ok(true));

        assert!(service(store).remove(5).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_unknown_author() {
        let mut store = MockAuthorsStore::new();
        store.expect_find_by_id().returning(|_| Ok(None));
        store.expect_delete().never();

        assert!(matches!(service(store).remove(5).await, Err(AppError::NotFound(_))));
    }
}
