//! Permissive CORS decoration shared by every listener.
//!
//! Every response leaving a router wrapped with [`cors_middleware`] carries:
//!
//! - `Access-Control-Allow-Origin: *`
//! - `Access-Control-Allow-Methods: <policy methods>`
//! - `Access-Control-Allow-Headers: Content-Type`
//!
//! Pre-flight `OPTIONS` requests are answered here with an empty `204` and
//! never reach a handler.
//!
//! Attach with `Router::route_layer`: paths without a route must fall
//! through to a bare `404`, pre-flight or not.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The CORS headers a router advertises.
#[derive(Clone, Copy, Debug)]
pub struct CorsPolicy {
    pub allow_methods: &'static str,
}

impl CorsPolicy {
    pub fn new(allow_methods: &'static str) -> Self {
        Self { allow_methods }
    }

    /// Overwrite the CORS headers on `headers`.
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(self.allow_methods),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        );
    }
}

/// Axum middleware: answers pre-flights and decorates every other response.
pub async fn cors_middleware(
    State(policy): State<CorsPolicy>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    policy.apply(response.headers_mut());
    response
}
