//! JSON API handlers, mounted under `/api/v1`

pub mod authors;
pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderName},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, AppState};

/// Header carrying the API user name
pub const API_USER_HEADER: HeaderName = HeaderName::from_static("x-api-user-name");

/// Every path starting with this prefix needs the API user header,
/// routed or not
pub const API_PREFIX: &str = "/api/v1";

/// The API user header matches the configured user
pub struct ApiUser;

#[async_trait]
impl FromRequestParts<AppState> for ApiUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(&API_USER_HEADER)
            .and_then(|value| value.to_str().ok());

        match user {
            Some(user) if user == state.config.api.user_name => Ok(ApiUser),
            _ => {
                tracing::debug!(path = %parts.uri.path(), "Rejected API request without valid user header");
                Err(AppError::Forbidden)
            }
        }
    }
}

/// Reject requests under [`API_PREFIX`] that do not carry a valid API user
pub async fn require_api_user(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !request.uri().path().starts_with(API_PREFIX) {
        return next.run(request).await;
    }

    let (mut parts, body) = request.into_parts();
    if let Err(err) = ApiUser::from_request_parts(&mut parts, &state).await {
        return err.into_response();
    }
    next.run(Request::from_parts(parts, body)).await
}
