//! HTTP error types for axum request handlers.
//!
//! Two flavours live here:
//!
//! - [`LoginError`] is the closed set of outcomes `/login` can reject a
//!   request with. Each variant renders as a plain-text body with a fixed
//!   status code, so browser clients can show the message verbatim.
//! - [`AppError`] wraps [`anyhow::Error`] for handlers whose failures are
//!   not part of the API contract (upstream unreachable, bad upstream
//!   reply). It renders as `500` with a JSON error body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Rejections produced by the login handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("invalid body")]
    InvalidBody,
    #[error("invalid credentials")]
    InvalidCredentials,
}

impl LoginError {
    pub fn status(self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidBody => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// Wraps [`anyhow::Error`] so it can be returned from axum handlers.
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %format!("{:#}", self.0), "handler error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("{:#}", self.0) })),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(e: E) -> Self {
        Self(e.into())
    }
}
