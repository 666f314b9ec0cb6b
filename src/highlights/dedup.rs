// src/highlights/dedup.rs
//! Cross-feed deduplication: folds the normalized record sequence into
//! one representative per story group.
//!
//! Groups are kept in first-occurrence order and matched by a linear
//! scan, first match wins (not best match). O(n·g) is fine at the
//! scale of a few hundred records per run; see DESIGN.md for the
//! two-level-index replacement if that ever changes.

use crate::highlights::canonical::{canonical_title, canonical_url};
use crate::highlights::similarity::{title_similarity, TITLE_SIMILARITY_THRESHOLD};
use crate::highlights::types::Record;

struct Group {
    /// Canonical URL of the current representative; empty when the
    /// record has no real link (`"#"` placeholder never participates
    /// in exact matching).
    url: String,
    title: String,
    keeper: Record,
}

fn group_url(rec: &Record) -> String {
    if rec.link_url == "#" {
        return String::new();
    }
    canonical_url(&rec.link_url)
}

/// True when `incoming` should replace `current` as a group's
/// representative. First decisive criterion wins; full ties are stable
/// toward the earliest arrival.
fn incoming_wins(incoming: &Record, current: &Record) -> bool {
    if incoming.heat != current.heat {
        return incoming.heat > current.heat;
    }
    if incoming.published_at_parsed != current.published_at_parsed {
        return incoming.published_at_parsed > current.published_at_parsed;
    }
    incoming.mention_count > current.mention_count
}

/// Remove near-duplicate records, keeping the "better" representative
/// per group. Output order is first-occurrence order among surviving
/// groups.
pub fn dedup_records(records: Vec<Record>) -> Vec<Record> {
    let mut groups: Vec<Group> = Vec::new();

    'records: for rec in records {
        let url = group_url(&rec);
        let title = canonical_title(&rec.title);

        for g in groups.iter_mut() {
            let url_match = !url.is_empty() && g.url == url;
            let title_match = !title.is_empty()
                && !g.title.is_empty()
                && title_similarity(&title, &g.title) >= TITLE_SIMILARITY_THRESHOLD;
            if url_match || title_match {
                if incoming_wins(&rec, &g.keeper) {
                    // The winner also takes over the group key; the
                    // group's sequence position stays put.
                    g.url = url;
                    g.title = title;
                    g.keeper = rec;
                }
                continue 'records;
            }
        }

        groups.push(Group { url, title, keeper: rec });
    }

    groups.into_iter().map(|g| g.keeper).collect()
}
