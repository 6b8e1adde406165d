// src/notify/mod.rs
//! Notification channels. One is selected by configuration; both take a
//! single announcement and either deliver it or return an error that the
//! watch cycle logs and drops.

pub mod discussion;
pub mod email;

use anyhow::Result;

use crate::config::{AppConfig, NotifierKind};

pub use discussion::DiscussionNotifier;
pub use email::EmailSender;

pub const BODY_PREAMBLE: &str = "The following power outages have been detected:\n\n";

/// Subject and body built for one announcement; dropped after the send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn outage(subject: &str, announcement: &str) -> Self {
        Self {
            subject: subject.to_string(),
            body: format!("{BODY_PREAMBLE}{announcement}"),
        }
    }
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, announcement: &str) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Build the notifier named by `cfg.notifier`.
pub fn build_notifier(cfg: &AppConfig) -> Result<Box<dyn Notifier>> {
    Ok(match cfg.notifier {
        NotifierKind::Email => Box::new(EmailSender::from_config(&cfg.email)?),
        NotifierKind::Discussion => Box::new(DiscussionNotifier::from_config(&cfg.discussion)?),
    })
}
