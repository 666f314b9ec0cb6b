// src/highlights/providers/mod.rs
pub mod techsum;

pub use techsum::TechsumFeed;
