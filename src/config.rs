//! Configuration types for pong-gate.
//!
//! Config is optional: with no file the built-in defaults serve `/ping` and
//! `/login` on port 8080 against the `admin` / `1234` credential pair. When a
//! file is given it is loaded once at startup and validated before any port
//! is opened. Invalid configs are rejected with a clear error rather than
//! silently falling back to defaults.
//!
//! # Example
//! ```toml
//! [server]
//! port          = 8080
//! login_enabled = true
//!
//! [credentials]
//! username     = "admin"
//! password_env = "PONG_GATE_PASSWORD"
//!
//! [gateway]
//! port         = 3000
//! upstream_url = "http://localhost:8080"
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::credentials::{DEFAULT_PASSWORD, DEFAULT_USERNAME};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Relay listener settings. Absent means no gateway is started.
    #[serde(default)]
    pub gateway: Option<GatewayConfig>,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: Self = toml::from_str(&content).context("parsing config TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.credentials.username.is_empty(),
            "[credentials] username must not be empty"
        );

        if let Some(gateway) = &self.gateway {
            anyhow::ensure!(
                gateway.port != self.server.port,
                "[gateway] port {} collides with [server] port",
                gateway.port
            );
            anyhow::ensure!(
                gateway.upstream_url.starts_with("http://")
                    || gateway.upstream_url.starts_with("https://"),
                "[gateway] upstream_url `{}` must start with http:// or https://",
                gateway.upstream_url
            );
        }

        Ok(())
    }
}

/// Settings for the ping/login service listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listen port (default: 8080).
    #[serde(default = "defaults::server_port")]
    pub port: u16,

    /// Serve `POST /login` (default: true).
    ///
    /// When false only `/ping` is routed and the advertised CORS methods
    /// shrink to `GET, OPTIONS`.
    #[serde(default = "defaults::login_enabled")]
    pub login_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: defaults::server_port(),
            login_enabled: defaults::login_enabled(),
        }
    }
}

impl ServerConfig {
    /// Value of the `Access-Control-Allow-Methods` header for this server.
    pub fn allow_methods(&self) -> &'static str {
        if self.login_enabled {
            "GET, POST, OPTIONS"
        } else {
            "GET, OPTIONS"
        }
    }
}

/// The single accepted login pair.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialsConfig {
    #[serde(default = "defaults::username")]
    pub username: String,

    #[serde(default = "defaults::password")]
    pub password: String,

    /// Environment variable whose value replaces `password` when set.
    ///
    /// Keeps the real secret out of the config file.
    #[serde(default)]
    pub password_env: Option<String>,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            username: defaults::username(),
            password: defaults::password(),
            password_env: None,
        }
    }
}

impl CredentialsConfig {
    /// Resolve the effective password, preferring `password_env` if it is set
    /// and non-empty.
    pub fn resolved_password(&self) -> String {
        self.password_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| self.password.clone())
    }
}

/// Relay listener that forwards `/ping` and `/login` to an upstream service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// Listen port (default: 3000).
    #[serde(default = "defaults::gateway_port")]
    pub port: u16,

    /// Base URL of the upstream service, without a trailing path.
    #[serde(default = "defaults::upstream_url")]
    pub upstream_url: String,

    /// Upstream request timeout in milliseconds (default: 30 000).
    #[serde(default = "defaults::timeout_ms")]
    pub timeout_ms: u64,
}

mod defaults {
    use super::{DEFAULT_PASSWORD, DEFAULT_USERNAME};

    pub fn server_port() -> u16 { 8080 }
    pub fn login_enabled() -> bool { true }
    pub fn username() -> String { DEFAULT_USERNAME.to_owned() }
    pub fn password() -> String { DEFAULT_PASSWORD.to_owned() }
    pub fn gateway_port() -> u16 { 3000 }
    pub fn upstream_url() -> String { "http://localhost:8080".to_owned() }
    pub fn timeout_ms() -> u64 { 30_000 }
}
