//! Fetches the configured highlight feeds, runs the aggregation
//! pipeline, renders the HTML newsletter to the output directory, and
//! (with NEWSLETTER_SEND=1) mails it to the active subscribers.

use anyhow::{bail, Result};
use chrono::{Datelike, Utc};
use tracing::{info, warn};

use techsum_newsletter::config::NewsletterConfig;
use techsum_newsletter::highlights::{self, providers::TechsumFeed, FeedProvider};
use techsum_newsletter::notify::NewsletterMailer;
use techsum_newsletter::render::{render_newsletter, render_with_template};
use techsum_newsletter::subscribers::SubscriberStore;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let cfg = NewsletterConfig::load()?;
    let token = NewsletterConfig::api_token();

    let providers: Vec<Box<dyn FeedProvider>> = cfg
        .feeds
        .iter()
        .map(|ep| Box::new(TechsumFeed::from_endpoint(ep, token.clone())) as Box<dyn FeedProvider>)
        .collect();

    let top = highlights::run_once(&providers, cfg.top_k).await;
    if top.is_empty() {
        bail!("no records survived normalization from any feed");
    }

    for (i, rec) in top.iter().enumerate() {
        info!(
            rank = i + 1,
            category = %rec.category,
            heat = rec.heat,
            date = %rec.published_at,
            title = %rec.title,
            link = %rec.link_url,
            "selected"
        );
    }

    let now = Utc::now();
    let date = now.format("%Y-%m-%d").to_string();

    // An unreadable custom template falls back to the built-in layout
    // rather than skipping the issue.
    let template = cfg.template_path().and_then(|p| match std::fs::read_to_string(&p) {
        Ok(t) => Some(t),
        Err(e) => {
            warn!(path = %p.display(), error = %e, "template unreadable, using built-in layout");
            None
        }
    });
    let html = match template {
        Some(tpl) => render_with_template(&tpl, &top, &cfg.heading, &date, now.year()),
        None => render_newsletter(&top, &cfg.heading, &date, now.year()),
    };

    let outfile = cfg.outfile_for(&date);
    if let Some(dir) = outfile.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&outfile, &html)?;
    info!(outfile = %outfile.display(), records = top.len(), "newsletter written");

    if std::env::var("NEWSLETTER_SEND").ok().as_deref() == Some("1") {
        let tags: Vec<String> = std::env::var("NEWSLETTER_TAGS")
            .unwrap_or_default()
            .split([',', ';', ' '])
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        let store = SubscriberStore::from_env()?;
        let recipients = store.active_recipients(&tags);
        if recipients.is_empty() {
            bail!("no active recipients to send to");
        }

        let subject = std::env::var("NEWSLETTER_SUBJECT")
            .unwrap_or_else(|_| format!("TechSum Weekly · {date}"));
        let mailer = NewsletterMailer::from_env()?;
        let sent = mailer.send_html(&subject, &html, &recipients).await?;
        info!(sent, "newsletter delivered");
    }

    Ok(())
}
