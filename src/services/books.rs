//! Book management service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorRef, Book, BookPayload, BookTitlePayload, PageRequest, PaginatedData, Payload},
    repository::{AuthorsStore, BooksStore},
};

#[derive(Clone)]
pub struct BookService {
    books: Arc<dyn BooksStore>,
    authors: Arc<dyn AuthorsStore>,
}

impl BookService {
    pub fn new(books: Arc<dyn BooksStore>, authors: Arc<dyn AuthorsStore>) -> Self {
        Self { books, authors }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        self.books.find_by_id(id).await
    }

    pub async fn find_by_author(&self, author: &Author, page: PageRequest) -> AppResult<PaginatedData<Book>> {
        self.books.find_by_author(author.id, page).await
    }

    /// Get book by ID, failing with NotFound
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    pub async fn get_all(&self, page: PageRequest) -> AppResult<PaginatedData<Book>> {
        self.books.find_paginated(page).await
    }

    /// Create a book for an existing author.
    ///
    /// The (author, title) uniqueness check and the insert are not atomic.
    pub async fn add(&self, data: &BookPayload) -> AppResult<Book> {
        data.check()?;

        let author = match &data.author {
            Some(AuthorRef::Id(id)) => self.authors.find_by_id(*id).await?,
            Some(AuthorRef::Name(name)) => self.authors.find_by_name(name).await?,
            None => None,
        }
        .ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;

        if self
            .books
            .find_by_author_and_title(author.id, &data.title)
            .await?
            .is_some()
        {
            return Err(AppError::invalid("book", "Book with title and author already exists")
                .with_input(data.old_input()));
        }

        let book = self.books.create(author.id, &data.title).await?;
        tracing::info!(book_id = book.id, author_id = author.id, "Book created");
        Ok(book)
    }

    /// Change the title of a book
    pub async fn update(&self, book: &Book, data: &BookTitlePayload) -> AppResult<Book> {
        data.check()?;

        let book = self.books.update(book.id, &data.title).await?;
        tracing::info!(book_id = book.id, "Book updated");
        Ok(book)
    }

    pub async fn remove(&self, id: i32) -> AppResult<bool> {
        let book = self.get_by_id(id).await?;
        let deleted = self.books.delete(book.id).await?;
        tracing::info!(book_id = book.id, "Book deleted");
        Ok(deleted)
    }
}
