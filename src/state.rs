//! Shared application state injected into request handlers.

use std::sync::Arc;

use crate::{
    config::{Config, GatewayConfig},
    credentials::{CredentialVerifier, StaticCredentials},
    upstream::UpstreamClient,
};

/// State for the ping/login service listener.
///
/// Immutable after startup; requests never write to it.
#[derive(Clone)]
pub struct AppState {
    pub login_enabled: bool,
    /// Value of `Access-Control-Allow-Methods` on every response.
    pub allow_methods: &'static str,
    pub verifier: Arc<dyn CredentialVerifier>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self::with_verifier(
            config,
            Arc::new(StaticCredentials::from_config(&config.credentials)),
        )
    }

    /// Build state around a caller-supplied verifier.
    pub fn with_verifier(config: &Config, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            login_enabled: config.server.login_enabled,
            allow_methods: config.server.allow_methods(),
            verifier,
        }
    }
}

/// State for the gateway relay listener.
#[derive(Clone)]
pub struct GatewayState {
    pub login_enabled: bool,
    pub allow_methods: &'static str,
    pub upstream: Arc<UpstreamClient>,
}

impl GatewayState {
    pub fn new(config: &Config, gateway: &GatewayConfig) -> anyhow::Result<Self> {
        Ok(Self {
            login_enabled: config.server.login_enabled,
            allow_methods: config.server.allow_methods(),
            upstream: Arc::new(UpstreamClient::new(gateway)?),
        })
    }
}
