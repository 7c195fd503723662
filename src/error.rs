//! Error types for Bookshelf

use std::collections::BTreeMap;

use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Validation messages keyed by field name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Submitted form values echoed back to the form after a failed validation
pub type OldInput = BTreeMap<String, String>;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {errors:?}")]
    Validation { errors: FieldErrors, input: OldInput },

    #[error("Forbidden")]
    Forbidden,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Single-field validation failure
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        AppError::Validation {
            errors,
            input: OldInput::new(),
        }
    }

    /// Attach the submitted values so an HTML form can be refilled
    pub fn with_input(self, old: OldInput) -> Self {
        match self {
            AppError::Validation { errors, .. } => AppError::Validation { errors, input: old },
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_)
            | AppError::Template(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(report: validator::ValidationErrors) -> Self {
        let errors = report
            .field_errors()
            .into_iter()
            .map(|(field, failures)| {
                let messages = failures
                    .iter()
                    .map(|failure| match &failure.message {
                        Some(message) => message.to_string(),
                        None => failure.code.to_string(),
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        AppError::Validation {
            errors,
            input: OldInput::new(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error response body: `{"errors": "..."}` or `{"errors": {"field": ["..."]}}`
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub errors: ErrorBody,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum ErrorBody {
    Message(String),
    Fields(BTreeMap<String, Vec<String>>),
}

/// Copy of the error attached to the response, read back by the HTML
/// error middleware
#[derive(Debug, Clone)]
pub enum ErrorContext {
    Validation { errors: FieldErrors, input: OldInput },
    Message { status: StatusCode, message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (body, context) = match self {
            AppError::Validation { errors, input } => (
                ErrorBody::Fields(errors.clone()),
                ErrorContext::Validation { errors, input },
            ),
            AppError::NotFound(msg) | AppError::BadRequest(msg) => (
                ErrorBody::Message(msg.clone()),
                ErrorContext::Message { status, message: msg },
            ),
            AppError::Forbidden => (
                ErrorBody::Message("Forbidden".to_string()),
                ErrorContext::Message {
                    status,
                    message: "Forbidden".to_string(),
                },
            ),
            other => {
                tracing::error!("Request failed: {}", other);
                let message = "Internal server error".to_string();
                (
                    ErrorBody::Message(message.clone()),
                    ErrorContext::Message { status, message },
                )
            }
        };

        let mut response = (status, Json(ErrorResponse { errors: body })).into_response();
        response.extensions_mut().insert(context);
        response
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 2, message = "Too short"))]
        name: String,
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let response = AppError::NotFound("Author not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(matches!(
            response.extensions().get::<ErrorContext>(),
            Some(ErrorContext::Message { .. })
        ));
        let body = body_json(response).await;
        assert_eq!(body["errors"], "Author not found");
    }

    #[tokio::test]
    async fn test_validation_body() {
        let response = AppError::invalid("author", "This author already exists").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["errors"]["author"][0], "This author already exists");
    }

    #[tokio::test]
    async fn test_internal_errors_are_masked() {
        let response = AppError::Internal("pool exhausted".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["errors"], "Internal server error");
    }

    #[test]
    fn test_from_validation_errors() {
        let report = Sample { name: "x".to_string() }.validate().unwrap_err();
        match AppError::from(report) {
            AppError::Validation { errors, .. } => {
                assert_eq!(errors["name"], vec!["Too short".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_with_input_keeps_errors() {
        let mut old = OldInput::new();
        old.insert("name".to_string(), "x".to_string());
        match AppError::invalid("name", "Too short").with_input(old) {
            AppError::Validation { errors, input } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(input["name"], "x");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
