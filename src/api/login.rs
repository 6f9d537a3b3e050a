//! `/login` — single-pair credential check.
//!
//! Each request moves through one terminal step:
//!
//! 1. anything but `POST` → `405 method not allowed`
//! 2. body is not JSON, or is neither an object nor `null`, or carries a
//!    non-string `username`/`password` → `400 invalid body`
//! 3. pair accepted by the [`CredentialVerifier`] → `200` JSON
//!    `{"message":"login success"}`
//! 4. otherwise → `401 invalid credentials`
//!
//! `OPTIONS` is answered by the CORS layer before this handler runs.
//!
//! [`CredentialVerifier`]: crate::credentials::CredentialVerifier

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::Method,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use crate::{credentials::Credentials, error::LoginError, state::AppState};

pub async fn login(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, LoginError> {
    if method != Method::POST {
        return Err(LoginError::MethodNotAllowed);
    }

    let body = body.map_err(|e| {
        debug!(error = %e, "failed to read login body");
        LoginError::InvalidBody
    })?;
    let attempt = decode_attempt(&body)?;

    if !state.verifier.verify(&attempt) {
        debug!(username = %attempt.username, "login rejected");
        return Err(LoginError::InvalidCredentials);
    }

    Ok(Json(json!({ "message": "login success" })))
}

/// Decode the first JSON value in `body` as a credential attempt.
///
/// Bytes after a complete value are ignored. See [`Credentials::from_json`]
/// for which shapes are accepted.
fn decode_attempt(body: &[u8]) -> Result<Credentials, LoginError> {
    serde_json::Deserializer::from_slice(body)
        .into_iter::<Value>()
        .next()
        .and_then(Result::ok)
        .and_then(|value| Credentials::from_json(value).ok())
        .ok_or(LoginError::InvalidBody)
}
