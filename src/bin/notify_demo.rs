//! Sends one sample announcement through the configured notifier.
//! Handy for checking SMTP credentials or the discussion token before deploying.

use anyhow::{Context, Result};
use outage_watch::notify::build_notifier;
use outage_watch::{init_tracing, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::load_default().context("loading configuration")?;
    let notifier = build_notifier(&cfg)?;

    let sample = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "CPH electrical shutdown (test notice from notify-demo)".to_string());

    notifier
        .send(&sample)
        .await
        .with_context(|| format!("{} notifier failed", notifier.name()))?;

    println!("notify-demo done ({})", notifier.name());
    Ok(())
}
