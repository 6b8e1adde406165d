// src/ingest/extract.rs
//! Pulls announcement text out of the service-interruptions page.
//!
//! The page lists each notice as an anchor carrying a marker class
//! (`a.w3-leftbar` today). If the markup changes the extractor simply
//! finds nothing; that is not an error.

use anyhow::{anyhow, Result};
use metrics::{counter, histogram};
use scraper::{Html, Selector};

use super::{normalize_text, Announcement};

#[derive(Debug, Clone)]
pub struct AnnouncementExtractor {
    selector: Selector,
    css: String,
}

impl AnnouncementExtractor {
    pub fn new(css: &str) -> Result<Self> {
        let selector = Selector::parse(css)
            .map_err(|e| anyhow!("invalid announcement selector {css:?}: {e:?}"))?;
        Ok(Self {
            selector,
            css: css.to_string(),
        })
    }

    pub fn css(&self) -> &str {
        &self.css
    }

    /// Text of every matching element, trimmed, in document order.
    /// Elements with no text are skipped.
    pub fn extract(&self, html: &str) -> Vec<Announcement> {
        let t0 = std::time::Instant::now();
        let document = Html::parse_document(html);

        let out: Vec<Announcement> = document
            .select(&self.selector)
            .map(|el| normalize_text(&el.text().collect::<String>()))
            .filter(|t| !t.is_empty())
            .collect();

        histogram!("watch_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("watch_announcements_total").increment(out.len() as u64);
        out
    }
}
