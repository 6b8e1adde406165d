// src/ingest/http.rs
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;

use super::PageSource;
use crate::config::WatchConfig;

/// Client settings used for the page fetch: User-Agent header and request timeout.
pub fn client_builder(cfg: &WatchConfig) -> ClientBuilder {
    Client::builder()
        .user_agent(cfg.user_agent.clone())
        .timeout(Duration::from_secs(cfg.timeout_secs))
}

/// Plain GET against the announcement page with a browser-like User-Agent.
pub struct HttpPageSource {
    url: String,
    client: Client,
}

impl HttpPageSource {
    pub fn from_config(cfg: &WatchConfig) -> Result<Self> {
        let client = client_builder(cfg)
            .build()
            .context("building page HTTP client")?;
        Ok(Self::with_client(cfg.url.clone(), client))
    }

    /// Caller supplies the client (custom proxy/TLS settings, tests).
    pub fn with_client(url: String, client: Client) -> Self {
        Self { url, client }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self) -> Result<String> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("GET {}", self.url))?;

        let status = resp.status();
        if status != StatusCode::OK {
            bail!("GET {} returned {status}", self.url);
        }
        resp.text().await.context("reading page body")
    }

    fn name(&self) -> &str {
        "plantops"
    }
}
