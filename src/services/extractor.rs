//! Entity-to-output mappers for JSON responses

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Author, Book, PaginatedData};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Maps an entity to the plain representation sent to API clients
pub trait Extractor<T> {
    type Output: Serialize;

    fn extract(&self, value: &T) -> Self::Output;

    fn extract_page(&self, page: PaginatedData<T>) -> PaginatedData<Self::Output> {
        page.map(|value| self.extract(&value))
    }
}

/// Author as exposed by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorOut {
    pub id: i32,
    pub name: String,
    /// Number of books
    pub books: i64,
    /// `YYYY-MM-DD HH:MM:SS`
    pub created_at: String,
    pub updated_at: String,
}

/// Book as exposed by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookOut {
    pub id: i32,
    pub title: String,
    /// Author name
    pub author: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorExtractor;

impl Extractor<Author> for AuthorExtractor {
    type Output = AuthorOut;

    fn extract(&self, author: &Author) -> AuthorOut {
        AuthorOut {
            id: author.id,
            name: author.name.clone(),
            books: author.books_count,
            created_at: format_timestamp(&author.created_at),
            updated_at: format_timestamp(&author.updated_at),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BookExtractor;

impl Extractor<Book> for BookExtractor {
    type Output = BookOut;

    fn extract(&self, book: &Book) -> BookOut {
        BookOut {
            id: book.id,
            title: book.title.clone(),
            author: book.author_name.clone(),
            created_at: format_timestamp(&book.created_at),
            updated_at: format_timestamp(&book.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{author, book};

    #[test]
    fn test_author_extractor() {
        let mut tolstoy = author(1, "Толстой");
        tolstoy.books_count = 3;

        let out = serde_json::to_value(AuthorExtractor.extract(&tolstoy)).unwrap();
        assert_eq!(
            out,
            serde_json::json!({
                "id": 1,
                "name": "Толстой",
                "books": 3,
                "created_at": "2024-03-01 09:30:00",
                "updated_at": "2024-03-01 09:30:00",
            })
        );
    }

    #[test]
    fn test_book_extractor() {
        let owner = author(2, "Чехов");
        let out = BookExtractor.extract(&book(7, &owner, "Вишнёвый сад"));

        assert_eq!(out.id, 7);
        assert_eq!(out.title, "Вишнёвый сад");
        assert_eq!(out.author, "Чехов");
        assert_eq!(out.created_at, "2024-03-02 18:05:09");
    }

    #[test]
    fn test_extract_page_keeps_order_and_metadata() {
        let owner = author(2, "Чехов");
        let books = vec![book(2, &owner, "Дама с собачкой"), book(1, &owner, "Палата №6")];
        let request = crate::models::PageRequest { page: 3, page_size: 2 };

        let page = BookExtractor.extract_page(PaginatedData::new(books, request, 6));
        assert_eq!(page.metadata().total, 6);
        assert_eq!(page.metadata().page, 3);

        let ids: Vec<i32> = page.into_data().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
