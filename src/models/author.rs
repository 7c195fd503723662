//! Author model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::{Payload, TypeError};
use crate::error::OldInput;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    /// Unique by business rule (checked by the service)
    pub name: String,
    /// Number of books owned by this author
    pub books_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update author request
///
/// Unknown fields are ignored. A missing `name` reads as an empty string and
/// a non-string one is kept for validation, so both end up as field errors
/// rather than as a rejected body.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(from = "RawAuthorPayload")]
pub struct AuthorPayload {
    #[validate(
        custom(function = "name_rules"),
        length(min = 2, message = "Name must be at least 2 characters")
    )]
    pub name: String,
    #[serde(skip)]
    type_errors: Vec<TypeError>,
}

#[derive(Deserialize)]
struct RawAuthorPayload {
    #[serde(default)]
    name: Option<Value>,
}

impl From<RawAuthorPayload> for AuthorPayload {
    fn from(raw: RawAuthorPayload) -> Self {
        let (name, is_string) = super::text_value(raw.name);
        let mut type_errors = Vec::new();
        if !is_string {
            type_errors.push(("name", "Name must be a string"));
        }
        Self { name, type_errors }
    }
}

impl AuthorPayload {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_errors: Vec::new(),
        }
    }
}

impl Payload for AuthorPayload {
    fn old_input(&self) -> OldInput {
        OldInput::from([("name".to_string(), self.name.clone())])
    }

    fn type_errors(&self) -> &[TypeError] {
        &self.type_errors
    }
}

fn name_rules(value: &str) -> Result<(), ValidationError> {
    super::text_rules(value, "Name cannot be empty", "Name must be at most 255 characters")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn messages(payload: &AuthorPayload) -> Vec<String> {
        let report = payload.validate().unwrap_err();
        report.field_errors()["name"]
            .iter()
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .collect()
    }

    #[test]
    fn test_valid_name() {
        assert!(AuthorPayload::new("Чехов").validate().is_ok());
        assert!(AuthorPayload::new("Li").validate().is_ok());
    }

    #[test]
    fn test_missing_name() {
        let payload: AuthorPayload = serde_json::from_str(r#"{"bio": "ignored"}"#).unwrap();
        let messages = messages(&payload);
        assert!(messages.contains(&"Name cannot be empty".to_string()));
        assert!(messages.contains(&"Name must be at least 2 characters".to_string()));
    }

    #[test]
    fn test_short_name() {
        assert_eq!(
            messages(&AuthorPayload::new("A")),
            vec!["Name must be at least 2 characters".to_string()]
        );
    }

    #[test]
    fn test_blank_name() {
        assert_eq!(
            messages(&AuthorPayload::new("   ")),
            vec!["Name cannot be empty".to_string()]
        );
    }

    #[test]
    fn test_name_length_limit() {
        assert!(AuthorPayload::new("a".repeat(255)).validate().is_ok());
        assert_eq!(
            messages(&AuthorPayload::new("a".repeat(300))),
            vec!["Name must be at most 255 characters".to_string()]
        );
    }

    #[test]
    fn test_non_string_name() {
        let payload: AuthorPayload = serde_json::from_str(r#"{"name": 5}"#).unwrap();
        assert_eq!(payload.name, "5");

        match payload.check().unwrap_err() {
            AppError::Validation { errors, input } => {
                assert_eq!(errors["name"], vec!["Name must be a string".to_string()]);
                assert_eq!(input["name"], "5");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_null_name_is_empty() {
        let payload: AuthorPayload = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert_eq!(payload.name, "");
        assert!(payload.type_errors().is_empty());
    }

    #[test]
    fn test_old_input() {
        assert_eq!(AuthorPayload::new("Gogol").old_input()["name"], "Gogol");
    }
}
