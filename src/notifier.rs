use std::{num::NonZeroU32, sync::Arc};

use anyhow::Context;
use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{Config, SmtpConfig};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, subject: &str, body: &str) -> anyhow::Result<()>;
}

/// Sends a notification and swallows any failure; a mutation never fails
/// because its notification did.
pub async fn notify_best_effort(notifier: &dyn Notifier, subject: &str, body: &str) {
    match notifier.notify(subject, body).await {
        Ok(()) => info!(subject = %subject, "notification sent"),
        Err(err) => warn!(subject = %subject, error = %err, "notification failed"),
    }
}

/// Picks the configured channel: SMTP first, then webhook, else log only.
pub fn from_config(config: &Config, http: reqwest::Client) -> anyhow::Result<Arc<dyn Notifier>> {
    if let Some(smtp) = &config.smtp {
        return Ok(Arc::new(MailNotifier::new(smtp)?));
    }
    if let Some(url) = &config.notify_webhook_url {
        return Ok(Arc::new(WebhookNotifier::new(http, url.clone(), config.notify_rps)));
    }
    Ok(Arc::new(LogNotifier))
}

pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, subject: &str, body: &str) -> anyhow::Result<()> {
        info!(subject = %subject, body = %body.trim(), "notification");
        Ok(())
    }
}

pub struct MailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl MailNotifier {
    pub fn new(smtp: &SmtpConfig) -> anyhow::Result<Self> {
        let from: Mailbox = smtp.from.parse().context("SMTP_FROM")?;
        let to = if smtp.to.is_empty() {
            vec![from.clone()]
        } else {
            smtp.to
                .iter()
                .map(|addr| addr.parse::<Mailbox>().context("SMTP_TO"))
                .collect::<anyhow::Result<Vec<_>>>()?
        };

        let mut builder = if smtp.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp.host)
        };
        builder = builder.port(smtp.port);
        if let (Some(user), Some(pass)) = (&smtp.username, &smtp.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self { transport: builder.build(), from, to })
    }
}

#[async_trait]
impl Notifier for MailNotifier {
    async fn notify(&self, subject: &str, body: &str) -> anyhow::Result<()> {
        let mut message = Message::builder().from(self.from.clone()).subject(subject);
        for to in &self.to {
            message = message.to(to.clone());
        }
        let message = message.header(ContentType::TEXT_PLAIN).body(body.to_string())?;
        self.transport.send(message).await?;
        Ok(())
    }
}

/// Publishes `{subject, message}` as JSON to a topic endpoint.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

#[derive(Serialize)]
struct TopicMessage<'a> {
    subject: &'a str,
    message: &'a str,
}

impl WebhookNotifier {
    pub fn new(client: reqwest::Client, url: String, rps: u32) -> Self {
        let rps = NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(rps)));
        Self { client, url, limiter }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, subject: &str, body: &str) -> anyhow::Result<()> {
        self.limiter.until_ready().await;
        self.client
            .post(&self.url)
            .json(&TopicMessage { subject, message: body })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::{testing::RecordingNotifier, *};

    #[tokio::test]
    async fn best_effort_swallows_failures() {
        let notifier = RecordingNotifier::failing();
        notify_best_effort(&notifier, "Movie Deleted", "Admin deleted movie: Jawan").await;
        assert_eq!(notifier.subjects().await, ["Movie Deleted"]);
    }

    #[tokio::test]
    async fn log_notifier_always_succeeds() {
        assert!(LogNotifier.notify("User Login", "someone logged in").await.is_ok());
    }

    #[tokio::test]
    async fn mail_notifier_defaults_recipient_to_sender() {
        let smtp = SmtpConfig {
            host: "localhost".to_string(),
            port: 2525,
            starttls: false,
            username: None,
            password: None,
            from: "CinemaPulse <noreply@cinemapulse.test>".to_string(),
            to: vec![],
        };
        let notifier = MailNotifier::new(&smtp).unwrap();
        assert_eq!(notifier.to, [notifier.from.clone()]);
    }
}
