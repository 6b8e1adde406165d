// src/telemetry.rs
//! Logging and metrics setup shared by the binaries.

use anyhow::{Context, Result};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::OnceCell;
use std::net::SocketAddr;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// One-time metrics registration (so series show up before the first cycle).
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("watch_cycles_total", "Completed watch cycles.");
        describe_counter!("watch_fetch_errors_total", "Page fetch failures.");
        describe_counter!(
            "watch_announcements_total",
            "Announcements extracted from the page."
        );
        describe_counter!(
            "watch_new_matches_total",
            "Matching announcements not seen before."
        );
        describe_counter!("watch_notify_sent_total", "Notifications delivered.");
        describe_counter!("watch_notify_errors_total", "Notification failures.");
        describe_histogram!("watch_parse_ms", "Page parse time in milliseconds.");
        describe_gauge!("watch_seen_size", "Entries in the seen-set.");
        describe_gauge!("watch_last_cycle_ts", "Unix ts of the last finished cycle.");
    });
}

/// Install the Prometheus recorder with its own HTTP listener on `addr`.
/// Must be called from inside a Tokio runtime.
pub fn install_exporter(addr: &str) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .with_context(|| format!("invalid metrics address {addr:?}"))?;
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("prometheus: install recorder")?;
    ensure_described();
    Ok(())
}

/// Install the global tracing subscriber.
/// `RUST_LOG` wins; otherwise info for this crate. `LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("outage_watch=info,watch=info,notify=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        let _ = registry.with(fmt::layer().json()).try_init();
    } else {
        let _ = registry.with(fmt::layer().compact()).try_init();
    }
}
