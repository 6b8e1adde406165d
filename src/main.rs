//! outage-watch — binary entrypoint.
//! Loads configuration, wires the watcher, and polls until SIGINT/SIGTERM.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

use outage_watch::{init_tracing, AppConfig, Watcher};

/// Resolves on Ctrl-C or (unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = ?e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                warn!(error = ?e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::load_default().context("loading configuration")?;
    info!(
        notifier = %cfg.notifier,
        url = %cfg.watch.url,
        interval_secs = cfg.watch.interval_secs,
        "outage-watch starting"
    );

    if let Some(addr) = cfg.metrics_addr.as_deref() {
        outage_watch::telemetry::install_exporter(addr)?;
        info!(%addr, "prometheus exporter listening");
    }

    let mut watcher = Watcher::from_config(&cfg)?;

    // Listen before the first cycle so a signal mid-cycle is not lost.
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = tx.send(());
    });

    watcher
        .run(Duration::from_secs(cfg.watch.interval_secs), async move {
            let _ = rx.await;
        })
        .await;

    info!("outage-watch stopped");
    Ok(())
}
