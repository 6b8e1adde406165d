// tests/config_load.rs
use outage_watch::{AppConfig, NotifierKind};
use std::{env, fs};

const VARS: &[&str] = &[
    "OUTAGE_WATCH_CONFIG",
    "NOTIFIER",
    "WATCH_URL",
    "WATCH_INTERVAL_SECS",
    "WATCH_LOCATIONS",
    "SMTP_HOST",
    "SMTP_PORT",
    "SMTP_USER",
    "SMTP_PASS",
    "NOTIFY_EMAIL_FROM",
    "NOTIFY_EMAIL_TO",
    "GITHUB_TOKEN",
    "DISCUSSION_URL",
    "DISCUSSION_CATEGORY_ID",
    "METRICS_ADDR",
];

fn clear_env() {
    for v in VARS {
        env::remove_var(v);
    }
}

#[serial_test::serial]
#[test]
fn file_from_env_path_plus_secret_from_env() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("watch.toml");
    fs::write(
        &p,
        r#"
notifier = "email"

[watch]
interval_secs = 600
locations = ["CPH"]

[email]
from = "watch@example.com"
to = ["ops@example.com", "lead@example.com"]
password = "ENV"
"#,
    )
    .unwrap();

    env::set_var("OUTAGE_WATCH_CONFIG", p.display().to_string());
    env::set_var("SMTP_PASS", "app-pass");

    let cfg = AppConfig::load_default().unwrap();
    assert_eq!(cfg.notifier, NotifierKind::Email);
    assert_eq!(cfg.watch.interval_secs, 600);
    assert_eq!(cfg.email.to.len(), 2);
    assert_eq!(cfg.email.password, "app-pass");
    assert_eq!(cfg.email.username, "watch@example.com");

    clear_env();
}

#[serial_test::serial]
#[test]
fn missing_env_path_is_an_error() {
    clear_env();
    env::set_var("OUTAGE_WATCH_CONFIG", "/definitely/not/here.toml");
    assert!(AppConfig::load_default().is_err());
    clear_env();
}

#[serial_test::serial]
#[test]
fn defaults_plus_env_only() {
    clear_env();
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();

    // no file, no credentials -> refuse to start
    assert!(AppConfig::load_default().is_err());

    env::set_var("NOTIFIER", "discussion");
    env::set_var("GITHUB_TOKEN", "tkn");
    env::set_var("DISCUSSION_CATEGORY_ID", "DIC_x");
    let cfg = AppConfig::load_default().unwrap();
    assert_eq!(cfg.notifier, NotifierKind::Discussion);
    assert_eq!(cfg.watch.url, "https://plantops.uwaterloo.ca/service-interruptions/");

    clear_env();
    env::set_current_dir(&old).unwrap();
}
