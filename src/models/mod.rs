//! Data models for Bookshelf

pub mod author;
pub mod book;
pub mod pagination;

use std::borrow::Cow;

use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult, FieldErrors, OldInput};

// Re-export commonly used types
pub use author::{Author, AuthorPayload};
pub use book::{AuthorRef, Book, BookPayload, BookTitlePayload};
pub use pagination::{PageQuery, PageRequest, PaginatedData, PaginationMeta, PaginationView};

/// Longest name or title the `VARCHAR(255)` columns accept
pub const MAX_TEXT_LENGTH: usize = 255;

/// A field that was sent with a value of the wrong JSON type
pub type TypeError = (&'static str, &'static str);

/// Request payload checked before it reaches a store
pub trait Payload: Validate {
    /// Values echoed back to the form on failure
    fn old_input(&self) -> OldInput;

    /// Fields that did not arrive as strings
    fn type_errors(&self) -> &[TypeError] {
        &[]
    }

    /// Run the field rules. A wrong type replaces the other messages of its field.
    fn check(&self) -> AppResult<()> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(report) => {
                tracing::debug!("Payload rejected: {}", report);
                match AppError::from(report) {
                    AppError::Validation { errors, .. } => errors,
                    other => return Err(other),
                }
            }
        };

        for (field, message) in self.type_errors() {
            errors.insert(field.to_string(), vec![message.to_string()]);
        }

        if errors.is_empty() {
            return Ok(());
        }
        Err(AppError::Validation {
            errors,
            input: self.old_input(),
        })
    }
}

/// Text of a loosely typed field. Missing and null read as empty, other
/// non-string values keep their JSON text and are flagged.
fn text_value(value: Option<Value>) -> (String, bool) {
    match value {
        None | Some(Value::Null) => (String::new(), true),
        Some(Value::String(text)) => (text, true),
        Some(other) => (other.to_string(), false),
    }
}

/// Blank and length rules shared by names and titles
fn text_rules(value: &str, blank: &'static str, too_long: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule_error("not_blank", blank));
    }
    if value.chars().count() > MAX_TEXT_LENGTH {
        return Err(rule_error("max_length", too_long));
    }
    Ok(())
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}
