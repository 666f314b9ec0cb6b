// src/subscribers.rs
//! JSON-file-backed subscriber list. The document shape mirrors the
//! hosted collection this replaces: lowercased email as the key,
//! active/inactive status, free-form tags, created/updated timestamps.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const DEFAULT_SUBSCRIBERS_PATH: &str = "data/subscribers.json";
pub const ENV_SUBSCRIBERS_PATH: &str = "SUBSCRIBERS_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscriber {
    pub email: String,
    pub status: Status,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StoreStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

#[derive(Debug)]
pub struct SubscriberStore {
    path: PathBuf,
    inner: Mutex<Vec<Subscriber>>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl SubscriberStore {
    /// Open a store at `path`; a missing file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let list = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading subscribers from {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("parsing subscribers at {}", path.display()))?
        } else {
            Vec::new()
        };
        Ok(Self {
            path,
            inner: Mutex::new(list),
        })
    }

    pub fn from_env() -> Result<Self> {
        let path = std::env::var(ENV_SUBSCRIBERS_PATH)
            .unwrap_or_else(|_| DEFAULT_SUBSCRIBERS_PATH.to_string());
        Self::open(path)
    }

    /// Upsert by lowercased email. An existing subscriber is
    /// reactivated, keeping created_at and tags; a new one is inserted
    /// with `tags`. Returns true when the email was newly inserted.
    pub fn subscribe(&self, email: &str, tags: Vec<String>) -> Result<bool> {
        let email = normalize_email(email);
        let now = Utc::now();
        let inserted = {
            let mut list = self.inner.lock().expect("subscriber store poisoned");
            match list.iter_mut().find(|s| s.email == email) {
                Some(existing) => {
                    existing.status = Status::Active;
                    existing.updated_at = now;
                    false
                }
                None => {
                    list.push(Subscriber {
                        email,
                        status: Status::Active,
                        tags,
                        created_at: now,
                        updated_at: now,
                    });
                    true
                }
            }
        };
        self.persist()?;
        Ok(inserted)
    }

    /// Soft-delete: mark inactive, keep the document. Returns false
    /// when the email was never subscribed.
    pub fn unsubscribe(&self, email: &str) -> Result<bool> {
        let email = normalize_email(email);
        let found = {
            let mut list = self.inner.lock().expect("subscriber store poisoned");
            match list.iter_mut().find(|s| s.email == email) {
                Some(existing) => {
                    existing.status = Status::Inactive;
                    existing.updated_at = Utc::now();
                    true
                }
                None => false,
            }
        };
        if found {
            self.persist()?;
        }
        Ok(found)
    }

    /// Active recipient emails, optionally filtered to subscribers
    /// carrying any of `tags`. Lowercased and de-duplicated, in
    /// insertion order.
    pub fn active_recipients(&self, tags: &[String]) -> Vec<String> {
        let list = self.inner.lock().expect("subscriber store poisoned");
        let mut out: Vec<String> = Vec::new();
        for s in list.iter() {
            if s.status != Status::Active {
                continue;
            }
            if !tags.is_empty() && !s.tags.iter().any(|t| tags.contains(t)) {
                continue;
            }
            if !out.contains(&s.email) {
                out.push(s.email.clone());
            }
        }
        out
    }

    pub fn stats(&self) -> StoreStats {
        let list = self.inner.lock().expect("subscriber store poisoned");
        let active = list.iter().filter(|s| s.status == Status::Active).count();
        StoreStats {
            total: list.len(),
            active,
            inactive: list.len() - active,
        }
    }

    /// Snapshot for the admin stats endpoint, newest update first.
    pub fn all(&self) -> Vec<Subscriber> {
        let mut list = self.inner.lock().expect("subscriber store poisoned").clone();
        list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        list
    }

    fn persist(&self) -> Result<()> {
        let list = self.inner.lock().expect("subscriber store poisoned");
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(&*list).context("encoding subscribers")?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing subscribers to {}", self.path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
