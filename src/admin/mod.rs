//! Server-rendered admin pages

pub mod authors;
pub mod books;
pub mod flash;
pub mod views;

use serde::Serialize;

use crate::{
    error::{AppError, AppResult, FieldErrors, OldInput},
    models::{Book, PaginatedData, PaginationView},
    services::extractor::format_timestamp,
};

pub use flash::Flash;
pub use views::Views;

/// Validation feedback for a form, taken from the flash cookie
#[derive(Debug, Default, Serialize)]
pub struct FormState {
    pub messages: Vec<String>,
    pub errors: FieldErrors,
    pub old: OldInput,
}

impl From<Flash> for FormState {
    fn from(flash: Flash) -> Self {
        Self {
            messages: flash.messages(),
            errors: flash.errors,
            old: flash.old,
        }
    }
}

/// Book line in an admin table
#[derive(Debug, Serialize)]
pub struct BookRow {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub author: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Book> for BookRow {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author_id: book.author_id,
            author: book.author_name.clone(),
            created_at: format_timestamp(&book.created_at),
            updated_at: format_timestamp(&book.updated_at),
        }
    }
}

/// Rows plus pagination links for one page of books
fn book_rows(page: PaginatedData<Book>) -> (Vec<BookRow>, PaginationView) {
    let rows = page.map(|book| BookRow::from(&book));
    let pagination: PaginationView = rows.metadata().into();
    (rows.into_data(), pagination)
}

/// A book addressed through an author's URL must belong to that author
fn ensure_owned(book: &Book, author_id: i32) -> AppResult<()> {
    if book.author_id != author_id {
        return Err(AppError::NotFound("Book not found".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{author, book};

    #[test]
    fn test_form_state_from_flash() {
        let mut errors = FieldErrors::new();
        errors.insert("author".to_string(), vec!["This author already exists".to_string()]);
        errors.insert("name".to_string(), vec!["Name must be at least 2 characters".to_string()]);
        let old = OldInput::from([("name".to_string(), "Чехов".to_string())]);

        let form = FormState::from(Flash::new(errors, old));
        assert_eq!(
            form.messages,
            vec![
                "This author already exists".to_string(),
                "Name must be at least 2 characters".to_string()
            ]
        );
        assert_eq!(form.old["name"], "Чехов");
    }

    #[test]
    fn test_ensure_owned() {
        let chekhov = author(2, "Чехов");
        let seagull = book(5, &chekhov, "Чайка");

        assert!(ensure_owned(&seagull, 2).is_ok());
        assert!(matches!(
            ensure_owned(&seagull, 3),
            Err(AppError::NotFound(ref m)) if m == "Book not found"
        ));
    }

    #[test]
    fn test_book_row() {
        let row = BookRow::from(&book(5, &author(2, "Чехов"), "Чайка"));
        assert_eq!(row.author_id, 2);
        assert_eq!(row.author, "Чехов");
        assert_eq!(row.created_at, "2024-03-02 18:05:09");
    }
}
