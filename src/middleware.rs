//! Cross-cutting HTTP middleware

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        header::{ACCEPT, CONTENT_TYPE, REFERER},
        HeaderMap, Method, StatusCode,
    },
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use crate::{
    admin::{Flash, Views},
    error::{AppError, ErrorContext},
    AppState,
};

/// Largest form body buffered while looking for `_method`
const MAX_FORM_BYTES: usize = 2 * 1024 * 1024;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// JSON clients get the error body untouched, browsers get pages
pub fn is_api_request(path: &str, headers: &HeaderMap) -> bool {
    path.contains("/api/")
        || headers
            .get(ACCEPT)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|accept| accept == "application/json")
}

/// Same-origin redirect target built from a `Referer` value
fn redirect_target(referer: &str) -> String {
    match url::Url::parse(referer) {
        Ok(url) => match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        },
        Err(_) if referer.starts_with('/') && !referer.starts_with("//") => referer.to_string(),
        Err(_) => "/".to_string(),
    }
}

#[derive(Serialize)]
struct ErrorPage<'a> {
    title: String,
    status: u16,
    reason: &'a str,
    message: &'a str,
}

fn error_page(views: &Views, status: StatusCode, message: &str) -> Response {
    let reason = status.canonical_reason().unwrap_or("Error");
    let page = ErrorPage {
        title: format!("{} {}", status.as_u16(), reason),
        status: status.as_u16(),
        reason,
        message,
    };

    match views.render("common/error", &page) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            tracing::error!("Failed to render error page: {}", err);
            (status, message.to_string()).into_response()
        }
    }
}

/// Turn error responses of HTML requests into flash redirects or error pages
pub async fn render_errors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let api = is_api_request(request.uri().path(), request.headers());
    let back = request
        .headers()
        .get(REFERER)
        .and_then(|value| value.to_str().ok())
        .map(redirect_target)
        .unwrap_or_else(|| "/".to_string());

    let mut response = next.run(request).await;
    if api {
        return response;
    }

    match response.extensions_mut().remove::<ErrorContext>() {
        Some(ErrorContext::Validation { errors, input }) => {
            tracing::debug!("Validation failed, redirecting to {}", back);
            let jar = CookieJar::new().add(Flash::new(errors, input).cookie());
            (jar, Redirect::to(&back)).into_response()
        }
        Some(ErrorContext::Message { status, message }) => error_page(&state.views, status, &message),
        None => response,
    }
}

fn override_method(form: &[u8]) -> Option<Method> {
    let (_, value) = url::form_urlencoded::parse(form).find(|(key, _)| key == "_method")?;
    match value.trim().to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

/// Let HTML forms reach PUT, PATCH and DELETE routes through a `_method`
/// field. Must wrap the router, routing happens on the rewritten method.
pub async fn method_override(request: Request, next: Next) -> Response {
    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE));
    if request.method() != Method::POST || !is_form {
        return next.run(request).await;
    }

    let (mut parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_FORM_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => return AppError::BadRequest(format!("Failed to read form body: {}", err)).into_response(),
    };

    if let Some(method) = override_method(&bytes) {
        tracing::trace!("Method override {} -> {}", parts.method, method);
        parts.method = method;
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
