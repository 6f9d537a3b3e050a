//! Liveness endpoint.

/// `ANY /ping` — always `200` with the literal body `pong`.
///
/// Pre-flight `OPTIONS` never reaches this handler; the CORS layer answers it.
pub async fn ping() -> &'static str {
    "pong"
}
