// src/config.rs
//! Newsletter configuration: feed endpoints, selection size, output
//! naming. Loaded from TOML with env-var overrides; built-in defaults
//! cover the standard TechSum feeds so a bare checkout works.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/newsletter.toml";
pub const ENV_CONFIG_PATH: &str = "NEWSLETTER_CONFIG_PATH";
pub const ENV_API_TOKEN: &str = "TECHSUM_API_KEY";
pub const ENV_TEMPLATE_PATH: &str = "NEWSLETTER_TEMPLATE";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FeedEndpoint {
    pub category: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsletterConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_heading")]
    pub heading: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Optional page template file; None means the built-in layout.
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default = "default_feeds")]
    pub feeds: Vec<FeedEndpoint>,
}

fn default_top_k() -> usize {
    crate::highlights::DEFAULT_TOP_K
}

fn default_heading() -> String {
    "Tech Highlights (Top 10)".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_feeds() -> Vec<FeedEndpoint> {
    const BASE: &str = "https://dataserver.datasum.ai/techsum/api/v3/highlights";
    ["Products", "Affairs", "Innovation"]
        .into_iter()
        .map(|cat| FeedEndpoint {
            category: cat.to_string(),
            url: format!("{BASE}/{}", cat.to_lowercase()),
        })
        .collect()
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            heading: default_heading(),
            output_dir: default_output_dir(),
            template: None,
            feeds: default_feeds(),
        }
    }
}

impl NewsletterConfig {
    /// Resolve config using env var + fallbacks:
    /// 1) $NEWSLETTER_CONFIG_PATH (must exist)
    /// 2) config/newsletter.toml
    /// 3) built-in defaults
    pub fn load() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            return Self::load_from(Path::new(&p));
        }
        let default = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default.exists() {
            return Self::load_from(&default);
        }
        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading newsletter config at {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: Self = toml::from_str(s).context("parsing newsletter config")?;
        if cfg.top_k == 0 {
            cfg.top_k = default_top_k();
        }
        Ok(cfg)
    }

    /// Bearer token for the highlights API, if configured.
    pub fn api_token() -> Option<String> {
        std::env::var(ENV_API_TOKEN).ok().filter(|t| !t.is_empty())
    }

    /// Conventional output path, e.g. `output/newsletter-2025-10-13.html`.
    pub fn outfile_for(&self, date: &str) -> PathBuf {
        PathBuf::from(&self.output_dir).join(format!("newsletter-{date}.html"))
    }

    /// Page template to render with, if any. $NEWSLETTER_TEMPLATE wins
    /// over the `template` config entry.
    pub fn template_path(&self) -> Option<PathBuf> {
        std::env::var(ENV_TEMPLATE_PATH)
            .ok()
            .filter(|p| !p.is_empty())
            .or_else(|| self.template.clone())
            .map(PathBuf::from)
    }
}
