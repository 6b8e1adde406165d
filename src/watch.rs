// src/watch.rs
//! The polling loop: fetch → extract → filter/dedup → notify, then sleep.
//!
//! Everything runs on one task, strictly in sequence. Failures of a single
//! step are logged and end (or skip part of) the current cycle only; the loop
//! itself never stops on its own. A shutdown signal lets the in-flight cycle
//! finish and interrupts the sleep.

use anyhow::Result;
use metrics::{counter, gauge};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::filter::{filter_new_matches, MatchRule};
use crate::ingest::{AnnouncementExtractor, HttpPageSource, PageSource};
use crate::notify::{build_notifier, Notifier};
use crate::seen::SeenSet;

/// What one cycle did. Fetch failure and "nothing new" both mean no sends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub fetched: bool,
    pub announcements: usize,
    pub new_matches: usize,
    pub sent: usize,
    pub failed: usize,
}

pub struct Watcher {
    source: Box<dyn PageSource>,
    extractor: AnnouncementExtractor,
    rule: MatchRule,
    notifier: Box<dyn Notifier>,
    seen: SeenSet,
}

impl Watcher {
    pub fn new(
        source: Box<dyn PageSource>,
        extractor: AnnouncementExtractor,
        rule: MatchRule,
        notifier: Box<dyn Notifier>,
        seen: SeenSet,
    ) -> Self {
        Self {
            source,
            extractor,
            rule,
            notifier,
            seen,
        }
    }

    /// Wire the HTTP page source and the configured notifier.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        Ok(Self::new(
            Box::new(HttpPageSource::from_config(&cfg.watch)?),
            AnnouncementExtractor::new(&cfg.watch.selector)?,
            MatchRule::from_config(&cfg.watch),
            build_notifier(cfg)?,
            SeenSet::with_capacity(cfg.watch.seen_capacity),
        ))
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// One full pass. Never returns an error: every failure is logged here.
    pub async fn run_cycle(&mut self) -> CycleReport {
        crate::telemetry::ensure_described();
        let mut report = CycleReport::default();

        let html = match self.source.fetch_page().await {
            Ok(body) => body,
            Err(e) => {
                warn!(target: "watch", error = ?e, source = self.source.name(), "page fetch failed");
                counter!("watch_fetch_errors_total").increment(1);
                self.finish(&report);
                return report;
            }
        };
        report.fetched = true;

        let candidates = self.extractor.extract(&html);
        report.announcements = candidates.len();
        if candidates.is_empty() {
            debug!(target: "watch", selector = self.extractor.css(), "no announcements on page");
        }

        let fresh = filter_new_matches(candidates, &self.rule, &mut self.seen);
        report.new_matches = fresh.len();
        counter!("watch_new_matches_total").increment(fresh.len() as u64);

        for text in &fresh {
            info!(target: "watch", announcement = %text, "new matching announcement");
            match self.notifier.send(text).await {
                Ok(()) => {
                    report.sent += 1;
                    counter!("watch_notify_sent_total").increment(1);
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(target: "notify", error = ?e, notifier = self.notifier.name(), "notification failed");
                    counter!("watch_notify_errors_total").increment(1);
                }
            }
        }

        self.finish(&report);
        report
    }

    fn finish(&self, report: &CycleReport) {
        counter!("watch_cycles_total").increment(1);
        gauge!("watch_seen_size").set(self.seen.len() as f64);
        gauge!("watch_last_cycle_ts").set(chrono::Utc::now().timestamp() as f64);
        info!(
            target: "watch",
            fetched = report.fetched,
            announcements = report.announcements,
            new_matches = report.new_matches,
            sent = report.sent,
            failed = report.failed,
            "cycle finished"
        );
    }

    /// Cycle, sleep `interval`, repeat until `shutdown` resolves.
    /// A cycle in progress is never cut short.
    pub async fn run<F>(&mut self, interval: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(target: "watch", interval_secs = interval.as_secs(), "watch loop started");
        loop {
            self.run_cycle().await;

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!(target: "watch", "shutdown requested, leaving watch loop");
                    return;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }
}
