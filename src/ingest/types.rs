// src/ingest/types.rs
use anyhow::Result;

/// One extracted notice. Identity is the exact text.
pub type Announcement = String;

/// Something that can hand back the raw announcement page.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self) -> Result<String>;
    fn name(&self) -> &str;
}
