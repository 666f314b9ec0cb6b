// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod highlights;
pub mod metrics;
pub mod notify;
pub mod render;
pub mod subscribers;

// ---- Re-exports for stable public API ----
pub use crate::api::create_router;
pub use crate::config::NewsletterConfig;
pub use crate::highlights::{FeedProvider, Record};
pub use crate::notify::NewsletterMailer;
pub use crate::subscribers::SubscriberStore;
