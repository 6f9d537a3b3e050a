use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;
use tokio::signal;
use tracing::info;

mod api;
mod config;
mod credentials;
mod error;
mod state;
mod upstream;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // When invoked as a Docker HEALTHCHECK, hit /ping and exit immediately.
    if std::env::args().nth(1).as_deref() == Some("--healthcheck") {
        return healthcheck().await;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pong_gate=info,tower_http=warn".into()),
        )
        .init();

    // No config file means built-in defaults.
    let config = match std::env::var("PONG_GATE_CONFIG").map(PathBuf::from) {
        Ok(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        Err(_) => Config::default(),
    };

    let trace_layer = || {
        tower_http::trace::TraceLayer::new_for_http()
            .make_span_with(tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO))
            .on_response(tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO))
    };

    let server_addr: SocketAddr = format!("0.0.0.0:{}", config.server.port).parse()?;
    let server_listener = tokio::net::TcpListener::bind(server_addr)
        .await
        .with_context(|| format!("binding {server_addr}"))?;
    let server_app = api::router(state::AppState::new(&config)).layer(trace_layer());

    info!(
        login_enabled = config.server.login_enabled,
        "Server running on http://localhost:{}", config.server.port
    );

    let gateway = match &config.gateway {
        Some(gw) => {
            let addr: SocketAddr = format!("0.0.0.0:{}", gw.port).parse()?;
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("binding {addr}"))?;
            let app = api::gateway::router(state::GatewayState::new(&config, gw)?)
                .layer(trace_layer());
            info!(%addr, upstream = %gw.upstream_url, "gateway listening");
            Some((listener, app))
        }
        None => None,
    };

    let gateway_server = async {
        match gateway {
            Some((listener, app)) => axum::serve(listener, app).await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        result = axum::serve(server_listener, server_app) => {
            result.context("server error")?;
        }
        result = gateway_server => {
            result.context("gateway server error")?;
        }
        _ = shutdown_signal() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Lightweight healthcheck: GET /ping and exit 0 on 2xx, 1 otherwise.
/// Invoked via `pong-gate --healthcheck` from Docker HEALTHCHECK.
async fn healthcheck() -> anyhow::Result<()> {
    let port = std::env::var("PONG_GATE_PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{port}/ping");
    let ok = reqwest::get(&url)
        .await
        .map(|resp| resp.status().is_success())
        .unwrap_or(false);

    std::process::exit(if ok { 0 } else { 1 });
}
