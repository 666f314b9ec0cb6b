// src/highlights/providers/techsum.rs
use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::config::FeedEndpoint;
use crate::highlights::types::FeedProvider;

/// One TechSum highlights endpoint (e.g. products/affairs/innovation).
pub struct TechsumFeed {
    category: String,
    mode: Mode,
}

enum Mode {
    /// Canned JSON body, for tests and offline runs.
    Fixture(String),
    Http {
        url: String,
        token: Option<String>,
        client: reqwest::Client,
    },
}

impl TechsumFeed {
    pub fn from_fixture(category: &str, body: &str) -> Self {
        Self {
            category: category.to_string(),
            mode: Mode::Fixture(body.to_string()),
        }
    }

    pub fn from_url(category: &str, url: &str, token: Option<String>) -> Self {
        Self {
            category: category.to_string(),
            mode: Mode::Http {
                url: url.to_string(),
                token,
                client: reqwest::Client::new(),
            },
        }
    }

    pub fn from_endpoint(ep: &FeedEndpoint, token: Option<String>) -> Self {
        Self::from_url(&ep.category, &ep.url, token)
    }
}

#[async_trait]
impl FeedProvider for TechsumFeed {
    async fn fetch_payload(&self) -> Result<serde_json::Value> {
        match &self.mode {
            Mode::Fixture(body) => {
                serde_json::from_str(body).context("parsing fixture payload")
            }
            Mode::Http { url, token, client } => {
                let mut req = client.get(url).header("accept", "application/json");
                if let Some(t) = token {
                    req = req.bearer_auth(t);
                }
                let resp = req
                    .send()
                    .await
                    .with_context(|| format!("GET {url}"))?
                    .error_for_status()
                    .with_context(|| format!("GET {url}"))?;
                resp.json().await.context("decoding highlights json")
            }
        }
    }

    fn category(&self) -> &str {
        &self.category
    }
}
