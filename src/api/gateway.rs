//! Gateway relay (optional second listener).
//!
//! Browser-facing front door that forwards to the ping/login service. `/ping`
//! wraps the upstream text in JSON; `/login` is a transparent pass-through so
//! the upstream's 400/401 answers reach the caller untouched.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::{api::cors, error::AppError, state::GatewayState};

/// Build the gateway router.
pub fn router(state: GatewayState) -> Router {
    let policy = cors::CorsPolicy::new(state.allow_methods);

    let mut router = Router::new().route("/ping", get(relay_ping));
    if state.login_enabled {
        router = router.route("/login", post(relay_login));
    }

    router
        .route_layer(middleware::from_fn_with_state(policy, cors::cors_middleware))
        .with_state(state)
}

/// `GET /ping` — `{"upstreamResponse": "<upstream /ping body>"}`.
pub async fn relay_ping(State(state): State<GatewayState>) -> Result<impl IntoResponse, AppError> {
    let text = state.upstream.ping().await?;
    Ok(Json(json!({ "upstreamResponse": text })))
}

/// `POST /login` — forward the body and relay the upstream reply verbatim.
pub async fn relay_login(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let reply = state.upstream.login(body.to_vec()).await?;

    let mut response = (reply.status, reply.body).into_response();
    match reply
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
    {
        Some(ct) => {
            response.headers_mut().insert(header::CONTENT_TYPE, ct);
        }
        None => {
            response.headers_mut().remove(header::CONTENT_TYPE);
        }
    }
    Ok(response)
}
