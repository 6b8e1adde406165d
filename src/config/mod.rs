// src/config/mod.rs
pub mod watch;

pub use watch::{AppConfig, DiscussionConfig, EmailConfig, NotifierKind, WatchConfig};
