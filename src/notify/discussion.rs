// src/notify/discussion.rs
use anyhow::{anyhow, bail, Context, Result};
use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

use super::Notifier;
use crate::config::DiscussionConfig;

/// The GitHub API rejects requests without a User-Agent.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Opens a discussion thread per announcement via the GitHub REST API.
#[derive(Clone)]
pub struct DiscussionNotifier {
    url: String,
    token: String,
    title: String,
    category_id: String,
    client: Client,
    timeout: Duration,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DiscussionPayload {
    pub title: String,
    pub body: String,
    pub category_id: String,
}

impl DiscussionNotifier {
    pub fn from_config(cfg: &DiscussionConfig) -> Result<Self> {
        let category_id = cfg
            .category_id
            .clone()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| anyhow!("discussion.category_id is not set"))?;
        Ok(Self {
            url: cfg.url.clone(),
            token: cfg.token.clone(),
            title: cfg.title.clone(),
            category_id,
            client: Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .context("building discussion HTTP client")?,
            timeout: Duration::from_secs(30),
        })
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn payload(&self, announcement: &str) -> DiscussionPayload {
        DiscussionPayload {
            title: self.title.clone(),
            body: announcement.to_string(),
            category_id: self.category_id.clone(),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for DiscussionNotifier {
    async fn send(&self, announcement: &str) -> Result<()> {
        let payload = self.payload(announcement);

        let rsp = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/vnd.github.v3+json")
            .json(&payload)
            .send()
            .await
            .context("discussion post")?;

        let status = rsp.status();
        if status != StatusCode::CREATED {
            let text = rsp.text().await.unwrap_or_default();
            bail!("discussion post returned {status}: {text}");
        }
        tracing::info!(target: "notify", "discussion created");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "discussion"
    }
}
