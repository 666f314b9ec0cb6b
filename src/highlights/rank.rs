// src/highlights/rank.rs
//! Ranking and top-K selection of the deduplicated records.

use crate::highlights::types::Record;

/// Newsletter slots per issue.
pub const DEFAULT_TOP_K: usize = 10;

/// Order records by `(heat, mention_count, published_at_parsed)`
/// descending, then move records with an image ahead of those without
/// (each partition keeps the primary order), and take the first `k`.
/// Fewer than `k` inputs are returned whole, no padding.
pub fn select_top(mut records: Vec<Record>, k: usize) -> Vec<Record> {
    records.sort_by(|a, b| {
        b.heat
            .cmp(&a.heat)
            .then_with(|| b.mention_count.cmp(&a.mention_count))
            .then_with(|| b.published_at_parsed.cmp(&a.published_at_parsed))
    });

    let (with_image, without_image): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|r| !r.image_url.is_empty());

    with_image
        .into_iter()
        .chain(without_image)
        .take(k)
        .collect()
}
