// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod config;
pub mod filter;
pub mod ingest;
pub mod notify;
pub mod seen;
pub mod telemetry;
pub mod watch;

// ---- Re-exports for stable public API ----
pub use crate::config::{AppConfig, NotifierKind};
pub use crate::filter::{filter_new_matches, MatchRule};
pub use crate::ingest::{AnnouncementExtractor, PageSource};
pub use crate::notify::{Notification, Notifier};
pub use crate::seen::SeenSet;
pub use crate::telemetry::init_tracing;
pub use crate::watch::{CycleReport, Watcher};
