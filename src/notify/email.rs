// src/notify/email.rs
use anyhow::{Context, Result};
use lettre::message::{Mailbox, Message, MultiPart, SinglePart};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};
use std::time::Duration;

use super::{Notification, Notifier};
use crate::config::EmailConfig;

/// SMTP relay sender (STARTTLS + login).
pub struct EmailSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
    subject: String,
}

impl EmailSender {
    pub fn from_config(cfg: &EmailConfig) -> Result<Self> {
        let from: Mailbox = cfg
            .from
            .parse()
            .with_context(|| format!("invalid sender address {:?}", cfg.from))?;
        let to = parse_recipients(&cfg.to)?;

        let creds = Credentials::new(cfg.username.clone(), cfg.password.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.smtp_host)
            .with_context(|| format!("invalid SMTP host {:?}", cfg.smtp_host))?
            .port(cfg.smtp_port)
            .credentials(creds)
            .timeout(Some(Duration::from_secs(30)))
            .build();

        Ok(Self {
            mailer,
            from,
            to,
            subject: cfg.subject.clone(),
        })
    }
}

pub fn parse_recipients(addrs: &[String]) -> Result<Vec<Mailbox>> {
    addrs
        .iter()
        .map(|a| {
            a.parse::<Mailbox>()
                .with_context(|| format!("invalid recipient address {a:?}"))
        })
        .collect()
}

/// Multipart message with a single plain-text part, to every recipient.
pub fn compose(from: &Mailbox, to: &[Mailbox], note: &Notification) -> Result<Message> {
    let mut builder = Message::builder()
        .from(from.clone())
        .subject(note.subject.clone());
    for rcpt in to {
        builder = builder.to(rcpt.clone());
    }
    builder
        .multipart(MultiPart::mixed().singlepart(SinglePart::plain(note.body.clone())))
        .context("build email")
}

#[async_trait::async_trait]
impl Notifier for EmailSender {
    async fn send(&self, announcement: &str) -> Result<()> {
        let note = Notification::outage(&self.subject, announcement);
        let msg = compose(&self.from, &self.to, &note)?;
        self.mailer.send(msg).await.context("send email")?;
        tracing::info!(target: "notify", recipients = self.to.len(), "email sent");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "email"
    }
}
