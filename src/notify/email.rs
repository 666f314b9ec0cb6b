// src/notify/email.rs
//! Batched SMTP delivery of the rendered newsletter. Recipients go on
//! BCC in chunks, with a pause between chunks to stay under provider
//! rate limits.

use std::time::Duration;

use anyhow::{Context, Result};
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};
use tracing::{info, warn};

pub const DEFAULT_BATCH_SIZE: usize = 80;
pub const DEFAULT_BATCH_DELAY_SECS: u64 = 4;

pub struct NewsletterMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    batch_size: usize,
    batch_delay: Duration,
}

impl NewsletterMailer {
    /// Build from SMTP_HOST / SMTP_USER / SMTP_PASS / NEWSLETTER_FROM,
    /// with optional NEWSLETTER_BATCH_SIZE and NEWSLETTER_BATCH_DELAY
    /// (seconds) overrides.
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("SMTP_HOST").context("SMTP_HOST missing")?;
        let user = std::env::var("SMTP_USER").context("SMTP_USER missing")?;
        let pass = std::env::var("SMTP_PASS").context("SMTP_PASS missing")?;
        let from_addr = std::env::var("NEWSLETTER_FROM").context("NEWSLETTER_FROM missing")?;

        let creds = Credentials::new(user, pass);
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
            .context("invalid SMTP_HOST")?
            .credentials(creds)
            .build();

        let from: Mailbox = from_addr.parse().context("invalid NEWSLETTER_FROM")?;

        let batch_size = std::env::var("NEWSLETTER_BATCH_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_BATCH_SIZE);
        let delay_secs = std::env::var("NEWSLETTER_BATCH_DELAY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_BATCH_DELAY_SECS);

        Ok(Self {
            mailer,
            from,
            batch_size,
            batch_delay: Duration::from_secs(delay_secs),
        })
    }

    /// Send `html` to every recipient, batched. Unparsable addresses
    /// are skipped with a warning. Returns the number of addresses the
    /// message was handed to the relay for.
    pub async fn send_html(&self, subject: &str, html: &str, recipients: &[String]) -> Result<usize> {
        let mut sent = 0usize;
        let chunks: Vec<&[String]> = recipients.chunks(self.batch_size.max(1)).collect();
        let total_batches = chunks.len();

        for (i, chunk) in chunks.into_iter().enumerate() {
            let mut builder = Message::builder()
                .from(self.from.clone())
                .to(self.from.clone())
                .subject(subject)
                .header(header::ContentType::TEXT_HTML);

            let mut batch_rcpts = 0usize;
            for addr in chunk {
                match addr.parse::<Mailbox>() {
                    Ok(mb) => {
                        builder = builder.bcc(mb);
                        batch_rcpts += 1;
                    }
                    Err(e) => warn!(error = ?e, addr, "skipping invalid recipient"),
                }
            }
            if batch_rcpts == 0 {
                continue;
            }

            let msg = builder.body(html.to_string()).context("build email")?;
            self.mailer.send(msg).await.context("send email")?;
            sent += batch_rcpts;
            info!(batch = i + 1, total_batches, batch_rcpts, sent, "newsletter batch sent");

            if i + 1 < total_batches && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        Ok(sent)
    }
}
