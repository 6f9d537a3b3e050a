//! HTTP client for the upstream ping/login service the gateway relays to.
//!
//! One [`UpstreamClient`] is built at startup and shared; [`reqwest::Client`]
//! pools connections internally, so handlers only borrow it.

use std::time::Duration;

use anyhow::Context;
use reqwest::{header, Client, StatusCode};

use crate::config::GatewayConfig;

pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

/// A relayed upstream reply, passed back to the caller unchanged.
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl UpstreamClient {
    pub fn new(cfg: &GatewayConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .context("building reqwest client")?;

        Ok(Self {
            client,
            base_url: cfg.upstream_url.trim_end_matches('/').to_string(),
        })
    }

    /// `GET /ping` upstream and return the body text.
    ///
    /// # Errors
    /// Returns an error on network failure or a non-2xx status.
    pub async fn ping(&self) -> anyhow::Result<String> {
        let url = format!("{}/ping", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let status = response.status();
        let text = response.text().await.context("reading response body")?;

        if !status.is_success() {
            anyhow::bail!("upstream returned HTTP {}: {}", status, text);
        }
        Ok(text)
    }

    /// Forward a raw JSON login body to `POST /login` upstream.
    ///
    /// Any HTTP status is returned as a reply; only transport failures are
    /// errors, so the caller can relay 400/401 responses as-is.
    pub async fn login(&self, body: Vec<u8>) -> anyhow::Result<UpstreamReply> {
        let url = format!("{}/login", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .with_context(|| format!("POST {url}"))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.bytes().await.context("reading response body")?;

        Ok(UpstreamReply {
            status,
            content_type,
            body: body.to_vec(),
        })
    }
}
