//! Business logic services

pub mod authors;
pub mod books;
pub mod extractor;
pub mod seeder;

use std::sync::Arc;

use crate::{
    config::SeederConfig,
    repository::{AuthorsStore, BooksStore, Repository},
};

pub use authors::AuthorService;
pub use books::BookService;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: AuthorService,
    pub books: BookService,
    authors_store: Arc<dyn AuthorsStore>,
    books_store: Arc<dyn BooksStore>,
}

impl Services {
    /// Create all services on top of the Postgres repositories
    pub fn new(repository: &Repository) -> Self {
        Self::from_stores(
            Arc::new(repository.authors.clone()),
            Arc::new(repository.books.clone()),
        )
    }

    /// Create all services on top of arbitrary stores
    pub fn from_stores(authors: Arc<dyn AuthorsStore>, books: Arc<dyn BooksStore>) -> Self {
        Self {
            authors: AuthorService::new(authors.clone()),
            books: BookService::new(books.clone(), authors.clone()),
            authors_store: authors,
            books_store: books,
        }
    }

    pub fn seeder(&self, config: SeederConfig) -> seeder::Seeder {
        seeder::Seeder::new(self.authors_store.clone(), self.books_store.clone(), config)
    }
}
