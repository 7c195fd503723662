//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::{Payload, TypeError};
use crate::error::OldInput;

/// Full book model from database, joined with its author's name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reference to an author in a book request: numeric id or exact name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AuthorRef {
    Id(i32),
    Name(String),
}

impl std::fmt::Display for AuthorRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthorRef::Id(id) => write!(f, "{}", id),
            AuthorRef::Name(name) => f.write_str(name),
        }
    }
}

/// Author reference from a loosely typed value. Blank names count as a
/// missing author, values that are neither an id nor a name are flagged.
fn author_value(value: Option<Value>) -> (Option<AuthorRef>, bool) {
    match value {
        None | Some(Value::Null) => (None, true),
        Some(Value::String(name)) if name.trim().is_empty() => (None, true),
        Some(Value::String(name)) => (Some(AuthorRef::Name(name)), true),
        Some(Value::Number(number)) => match number.as_i64().and_then(|id| i32::try_from(id).ok()) {
            Some(id) => (Some(AuthorRef::Id(id)), true),
            None => (None, false),
        },
        Some(_) => (None, false),
    }
}

/// Create book request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(from = "RawBookPayload")]
pub struct BookPayload {
    #[validate(
        custom(function = "title_rules"),
        length(min = 2, message = "Title must be at least 2 characters")
    )]
    pub title: String,
    /// Author id or author name
    #[validate(required(message = "Author cannot be empty"))]
    pub author: Option<AuthorRef>,
    #[serde(skip)]
    type_errors: Vec<TypeError>,
}

#[derive(Deserialize)]
struct RawBookPayload {
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    author: Option<Value>,
}

impl From<RawBookPayload> for BookPayload {
    fn from(raw: RawBookPayload) -> Self {
        let (title, title_is_string) = super::text_value(raw.title);
        let (author, author_is_valid) = author_value(raw.author);

        let mut type_errors = Vec::new();
        if !title_is_string {
            type_errors.push(("title", "Title must be a string"));
        }
        if !author_is_valid {
            type_errors.push(("author", "Author must be an author id or name"));
        }
        Self {
            title,
            author,
            type_errors,
        }
    }
}

impl BookPayload {
    pub fn new(title: impl Into<String>, author: AuthorRef) -> Self {
        Self {
            title: title.into(),
            author: Some(author),
            type_errors: Vec::new(),
        }
    }
}

impl Payload for BookPayload {
    fn old_input(&self) -> OldInput {
        let mut input = OldInput::from([("title".to_string(), self.title.clone())]);
        if let Some(author) = &self.author {
            input.insert("author".to_string(), author.to_string());
        }
        input
    }

    fn type_errors(&self) -> &[TypeError] {
        &self.type_errors
    }
}

/// Update book request (the author of a book cannot change)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(from = "RawBookTitlePayload")]
pub struct BookTitlePayload {
    #[validate(
        custom(function = "title_rules"),
        length(min = 2, message = "Title must be at least 2 characters")
    )]
    pub title: String,
    #[serde(skip)]
    type_errors: Vec<TypeError>,
}

#[derive(Deserialize)]
struct RawBookTitlePayload {
    #[serde(default)]
    title: Option<Value>,
}

impl From<RawBookTitlePayload> for BookTitlePayload {
    fn from(raw: RawBookTitlePayload) -> Self {
        let (title, is_string) = super::text_value(raw.title);
        let mut type_errors = Vec::new();
        if !is_string {
            type_errors.push(("title", "Title must be a string"));
        }
        Self { title, type_errors }
    }
}

impl BookTitlePayload {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            type_errors: Vec::new(),
        }
    }
}

impl Payload for BookTitlePayload {
    fn old_input(&self) -> OldInput {
        OldInput::from([("title".to_string(), self.title.clone())])
    }

    fn type_errors(&self) -> &[TypeError] {
        &self.type_errors
    }
}

fn title_rules(value: &str) -> Result<(), ValidationError> {
    super::text_rules(value, "Title cannot be empty", "Title must be at most 255 characters")
}
