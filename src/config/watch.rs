// src/config/watch.rs
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use lettre::message::Mailbox;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const ENV_CONFIG_PATH: &str = "OUTAGE_WATCH_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/outage_watch.toml";

pub const DEFAULT_PAGE_URL: &str = "https://plantops.uwaterloo.ca/service-interruptions/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/87.0.4280.141 Safari/537.36";
pub const DEFAULT_SELECTOR: &str = "a.w3-leftbar";
pub const DEFAULT_LOCATION: &str = "CPH";
pub const DEFAULT_EVENT_PHRASE: &str = "electrical shutdown";
pub const DEFAULT_INTERVAL_SECS: u64 = 86_400;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SUBJECT: &str = "Power Outage Notification - CPH Electrical Shutdown";
pub const DEFAULT_DISCUSSION_URL: &str =
    "https://api.github.com/WATonomous/infrastructure-support/discussions";

fn default_aliases() -> BTreeMap<String, String> {
    [
        ("Carl A Pollock Hall", "CPH"),
        ("Carl A. Pollock Hall", "CPH"),
        ("Carl Pollock Hall", "CPH"),
    ]
    .into_iter()
    .map(|(name, code)| (name.to_string(), code.to_string()))
    .collect()
}

/// Placeholder meaning "read this secret from the environment".
const ENV_MARKER: &str = "ENV";

/// Which notifier the watch loop sends through. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    #[default]
    Email,
    Discussion,
}

impl FromStr for NotifierKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" | "smtp" => Ok(Self::Email),
            "discussion" | "github" => Ok(Self::Discussion),
            other => Err(anyhow!("unknown notifier {other:?} (expected email|discussion)")),
        }
    }
}

impl fmt::Display for NotifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => f.write_str("email"),
            Self::Discussion => f.write_str("discussion"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub url: String,
    pub user_agent: String,
    /// CSS selector for announcement nodes.
    pub selector: String,
    /// Building codes; a notice matches if it names any of them (case-sensitive).
    pub locations: Vec<String>,
    /// Full building names that count as the code they map to, e.g.
    /// "Carl A Pollock Hall" -> "CPH". Case-sensitive.
    pub location_aliases: BTreeMap<String, String>,
    /// Matched case-insensitively.
    pub event_phrase: String,
    pub interval_secs: u64,
    pub timeout_secs: u64,
    /// `None` keeps every announcement for the life of the process.
    pub seen_capacity: Option<usize>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_PAGE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            selector: DEFAULT_SELECTOR.to_string(),
            locations: vec![DEFAULT_LOCATION.to_string()],
            location_aliases: default_aliases(),
            event_phrase: DEFAULT_EVENT_PHRASE.to_string(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            seen_capacity: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    /// "ENV" means: read from SMTP_PASS
    pub password: String,
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: String::new(),
            password: ENV_MARKER.to_string(),
            from: String::new(),
            to: Vec::new(),
            subject: DEFAULT_SUBJECT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscussionConfig {
    pub url: String,
    /// "ENV" means: read from GITHUB_TOKEN
    pub token: String,
    pub title: String,
    /// Depends on the target forum; there is no sensible default.
    pub category_id: Option<String>,
}

impl Default for DiscussionConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DISCUSSION_URL.to_string(),
            token: ENV_MARKER.to_string(),
            title: DEFAULT_SUBJECT.to_string(),
            category_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub notifier: NotifierKind,
    pub watch: WatchConfig,
    pub email: EmailConfig,
    pub discussion: DiscussionConfig,
    /// When set, a Prometheus scrape endpoint is served here (e.g. "0.0.0.0:9000").
    pub metrics_addr: Option<String>,
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing outage-watch config")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Load using env var + fallbacks, then apply env overrides and validate:
    /// 1) $OUTAGE_WATCH_CONFIG
    /// 2) config/outage_watch.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                bail!("{ENV_CONFIG_PATH} points to non-existent path {}", pb.display());
            }
            Self::load_from(&pb)?
        } else {
            let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
            if fallback.exists() {
                Self::load_from(&fallback)?
            } else {
                Self::default()
            }
        };
        cfg.apply_env(|k| std::env::var(k).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Overlay environment values (looked up through `get`) and resolve "ENV" secrets.
    pub fn apply_env<F>(&mut self, get: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = var("NOTIFIER") {
            self.notifier = v.parse()?;
        }
        if let Some(v) = var("WATCH_URL") {
            self.watch.url = v;
        }
        if let Some(v) = var("WATCH_LOCATIONS") {
            self.watch.locations = split_list(&v);
        }
        if let Some(v) = var("WATCH_INTERVAL_SECS") {
            self.watch.interval_secs = v
                .parse()
                .with_context(|| format!("WATCH_INTERVAL_SECS={v:?} is not a number"))?;
        }
        if let Some(v) = var("SMTP_HOST") {
            self.email.smtp_host = v;
        }
        if let Some(v) = var("SMTP_PORT") {
            self.email.smtp_port = v
                .parse()
                .with_context(|| format!("SMTP_PORT={v:?} is not a port"))?;
        }
        if let Some(v) = var("SMTP_USER") {
            self.email.username = v;
        }
        if let Some(v) = var("NOTIFY_EMAIL_FROM") {
            self.email.from = v;
        }
        if let Some(v) = var("NOTIFY_EMAIL_TO") {
            self.email.to = split_list(&v);
        }
        if let Some(v) = var("DISCUSSION_URL") {
            self.discussion.url = v;
        }
        if let Some(v) = var("DISCUSSION_CATEGORY_ID") {
            self.discussion.category_id = Some(v);
        }
        if let Some(v) = var("METRICS_ADDR") {
            self.metrics_addr = Some(v);
        }

        // Secrets: explicit env wins, otherwise the "ENV" marker is resolved (or cleared).
        if let Some(v) = var("SMTP_PASS") {
            self.email.password = v;
        } else if is_env_marker(&self.email.password) {
            self.email.password.clear();
        }
        if let Some(v) = var("GITHUB_TOKEN") {
            self.discussion.token = v;
        } else if is_env_marker(&self.discussion.token) {
            self.discussion.token.clear();
        }

        // Sender address doubles as the login when no explicit user is given.
        if self.email.username.is_empty() && !self.email.from.is_empty() {
            let from: Mailbox = self
                .email
                .from
                .parse()
                .with_context(|| format!("invalid sender address {:?}", self.email.from))?;
            self.email.username = from.email.to_string();
        }
        Ok(())
    }

    /// Reject configurations the selected notifier cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.watch.url.trim().is_empty() {
            bail!("watch.url is empty");
        }
        if self.watch.interval_secs == 0 {
            bail!("watch.interval_secs must be > 0");
        }
        if self.watch.timeout_secs == 0 {
            bail!("watch.timeout_secs must be > 0");
        }
        if self.watch.locations.iter().all(|l| l.trim().is_empty()) {
            bail!("watch.locations must name at least one building");
        }
        if self.watch.event_phrase.is_empty() {
            bail!("watch.event_phrase must be non-empty");
        }
        if self.watch.seen_capacity == Some(0) {
            bail!("watch.seen_capacity must be > 0 when set");
        }

        match self.notifier {
            NotifierKind::Email => {
                let e = &self.email;
                if e.from.is_empty() {
                    bail!("email.from missing (NOTIFY_EMAIL_FROM)");
                }
                if e.to.is_empty() {
                    bail!("email.to missing (NOTIFY_EMAIL_TO)");
                }
                if e.password.is_empty() {
                    bail!("email password missing (SMTP_PASS)");
                }
            }
            NotifierKind::Discussion => {
                let d = &self.discussion;
                if d.token.is_empty() {
                    bail!("discussion token missing (GITHUB_TOKEN)");
                }
                if d.category_id.as_deref().map_or(true, |c| c.trim().is_empty()) {
                    bail!("discussion.category_id must be set (DISCUSSION_CATEGORY_ID)");
                }
            }
        }
        Ok(())
    }
}

fn is_env_marker(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case(ENV_MARKER)
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
