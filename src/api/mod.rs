//! HTTP surfaces.
//!
//! - [`router`] — the ping/login service (default port 8080)
//! - [`gateway::router`] — the optional relay in front of it
//!
//! Handlers stay thin; both routers share [`cors::cors_middleware`] so no
//! handler ever sets CORS headers itself.

pub mod cors;
pub mod gateway;
pub mod login;
pub mod ping;

use axum::{middleware, routing::any, Router};

use crate::state::AppState;

/// Build the service router.
///
/// `/login` is routed for every method so the handler can answer non-`POST`
/// requests with its own `405` body.
pub fn router(state: AppState) -> Router {
    let policy = cors::CorsPolicy::new(state.allow_methods);

    let mut router = Router::new().route("/ping", any(ping::ping));
    if state.login_enabled {
        router = router.route("/login", any(login::login));
    }

    router
        .route_layer(middleware::from_fn_with_state(policy, cors::cors_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, Response, StatusCode},
    };
    use tower::ServiceExt; // oneshot

    use crate::{
        config::Config,
        credentials::{CredentialVerifier, Credentials},
        state::AppState,
    };

    // -----------------------------------------------------------------------
    // Test helpers
    // -----------------------------------------------------------------------

    fn app() -> axum::Router {
        super::router(AppState::new(&Config::default()))
    }

    fn ping_only_app() -> axum::Router {
        let mut config = Config::default();
        config.server.login_enabled = false;
        super::router(AppState::new(&config))
    }

    async fn send(app: axum::Router, method: &str, uri: &str, body: &str) -> Response<Body> {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_owned()))
            .unwrap();
        app.oneshot(req).await.unwrap()
    }

    async fn body_text(resp: Response<Body>) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn assert_cors(resp: &Response<Body>, methods: &str) {
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert_eq!(resp.headers()["access-control-allow-methods"], methods);
        assert_eq!(resp.headers()["access-control-allow-headers"], "Content-Type");
    }

    const ADMIN_OK: &str = r#"{"username":"admin","password":"1234"}"#;

    // -----------------------------------------------------------------------
    // /ping
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn ping_answers_pong_for_any_non_options_method() {
        for method in ["GET", "POST", "PUT", "DELETE", "PATCH"] {
            let resp = send(app(), method, "/ping", "").await;
            assert_eq!(resp.status(), StatusCode::OK, "method {method}");
            assert_cors(&resp, "GET, POST, OPTIONS");
            assert_eq!(body_text(resp).await, "pong", "method {method}");
        }
    }

    #[tokio::test]
    async fn ping_preflight_is_empty_204() {
        let resp = send(app(), "OPTIONS", "/ping", "").await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_cors(&resp, "GET, POST, OPTIONS");
        assert!(body_text(resp).await.is_empty());
    }

    // -----------------------------------------------------------------------
    // /login
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn login_with_correct_pair_succeeds_with_json() {
        let resp = send(app(), "POST", "/login", ADMIN_OK).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_cors(&resp, "GET, POST, OPTIONS");
        assert_eq!(resp.headers()["content-type"], "application/json");
        assert_eq!(body_text(resp).await, r#"{"message":"login success"}"#);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_401() {
        let resp = send(app(), "POST", "/login", r#"{"username":"admin","password":"wrong"}"#).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_cors(&resp, "GET, POST, OPTIONS");
        assert_eq!(body_text(resp).await, "invalid credentials");
    }

    #[tokio::test]
    async fn login_username_is_case_sensitive() {
        let resp = send(app(), "POST", "/login", r#"{"username":"ADMIN","password":"1234"}"#).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_with_malformed_json_is_400() {
        let resp = send(app(), "POST", "/login", "not-json").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_cors(&resp, "GET, POST, OPTIONS");
        assert_eq!(body_text(resp).await, "invalid body");
    }

    #[tokio::test]
    async fn login_with_missing_or_null_fields_is_401() {
        for body in [
            r#"{"username":"admin"}"#,
            r#"{"username":"admin","password":null}"#,
            "{}",
            "null",
        ] {
            let resp = send(app(), "POST", "/login", body).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "body {body}");
            assert_eq!(body_text(resp).await, "invalid credentials", "body {body}");
        }
    }

    #[tokio::test]
    async fn login_field_names_match_case_insensitively() {
        let resp = send(app(), "POST", "/login", r#"{"Username":"admin","PASSWORD":"1234"}"#).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, r#"{"message":"login success"}"#);
    }

    #[tokio::test]
    async fn login_with_wrong_field_type_is_400() {
        let resp = send(app(), "POST", "/login", r#"{"username":"admin","password":1234}"#).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(resp).await, "invalid body");
    }

    #[tokio::test]
    async fn login_with_empty_body_is_400() {
        let resp = send(app(), "POST", "/login", "").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(resp).await, "invalid body");
    }

    #[tokio::test]
    async fn login_does_not_require_json_content_type() {
        let req = Request::post("/login")
            .header("content-type", "text/plain")
            .body(Body::from(ADMIN_OK))
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn login_rejects_non_post_methods_with_405() {
        for method in ["GET", "PUT", "DELETE"] {
            let resp = send(app(), method, "/login", ADMIN_OK).await;
            assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "method {method}");
            assert_cors(&resp, "GET, POST, OPTIONS");
            assert_eq!(body_text(resp).await, "method not allowed");
        }
    }

    #[tokio::test]
    async fn login_preflight_is_empty_204() {
        let resp = send(app(), "OPTIONS", "/login", "").await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_cors(&resp, "GET, POST, OPTIONS");
        assert!(body_text(resp).await.is_empty());
    }

    #[tokio::test]
    async fn login_uses_injected_verifier() {
        struct AcceptAll;
        impl CredentialVerifier for AcceptAll {
            fn verify(&self, _: &Credentials) -> bool {
                true
            }
        }

        let state = AppState::with_verifier(&Config::default(), Arc::new(AcceptAll));
        let resp = send(
            super::router(state),
            "POST",
            "/login",
            r#"{"username":"anyone","password":"anything"}"#,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    // -----------------------------------------------------------------------
    // Ping-only variant
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn ping_only_variant_advertises_get_and_options() {
        let resp = send(ping_only_app(), "GET", "/ping", "").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_cors(&resp, "GET, OPTIONS");
        assert_eq!(body_text(resp).await, "pong");
    }

    #[tokio::test]
    async fn ping_only_variant_has_no_login_route() {
        let resp = send(ping_only_app(), "POST", "/login", ADMIN_OK).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn ping_only_variant_does_not_answer_login_preflight() {
        let resp = send(ping_only_app(), "OPTIONS", "/login", "").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.headers().get("access-control-allow-origin").is_none());
    }

    // -----------------------------------------------------------------------
    // Unrouted paths
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn unrouted_paths_are_bare_404_for_every_method() {
        for method in ["GET", "POST", "OPTIONS"] {
            let resp = send(app(), method, "/nope", "").await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "method {method}");
            assert!(
                resp.headers().get("access-control-allow-origin").is_none(),
                "method {method} carried CORS headers"
            );
        }
    }
}
