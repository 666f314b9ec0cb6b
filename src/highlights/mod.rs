// src/highlights/mod.rs
pub mod canonical;
pub mod dedup;
pub mod normalize;
pub mod providers;
pub mod rank;
pub mod similarity;
pub mod types;

pub use rank::DEFAULT_TOP_K;
pub use types::{FeedProvider, Record};

use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "highlights_records_total",
            "Records produced by normalization across all feeds."
        );
        describe_counter!(
            "highlights_dedup_total",
            "Records collapsed into an existing story group."
        );
        describe_counter!(
            "highlights_selected_total",
            "Records surviving ranking/selection."
        );
        describe_counter!(
            "highlights_feed_errors_total",
            "Feed fetch/parse errors."
        );
        describe_gauge!(
            "highlights_last_run_ts",
            "Unix ts when the aggregation pipeline last ran."
        );
    });
}

/// Pure tail of the pipeline: collapse duplicates across feeds, then
/// rank and bound to the top `k`. Returns an empty vec when nothing
/// survives; the caller decides whether that is fatal.
pub fn collapse_and_rank(records: Vec<Record>, k: usize) -> Vec<Record> {
    let total = records.len();
    let unique = dedup::dedup_records(records);
    counter!("highlights_dedup_total").increment((total - unique.len()) as u64);

    let top = rank::select_top(unique, k);
    counter!("highlights_selected_total").increment(top.len() as u64);
    top
}

/// Run the aggregation once: fetch every feed, normalize, dedup, rank.
/// A failing feed is logged and skipped; merging happens in the fixed
/// provider order, which the dedup tie-breaks depend on.
pub async fn run_once(providers: &[Box<dyn FeedProvider>], k: usize) -> Vec<Record> {
    ensure_metrics_described();

    let mut all = Vec::new();
    for p in providers {
        match p.fetch_payload().await {
            Ok(payload) => {
                let mut recs = normalize::normalize_payload(&payload, p.category());
                counter!("highlights_records_total").increment(recs.len() as u64);
                all.append(&mut recs);
            }
            Err(e) => {
                tracing::warn!(error = ?e, category = p.category(), "feed error");
                counter!("highlights_feed_errors_total").increment(1);
            }
        }
    }

    gauge!("highlights_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

    collapse_and_rank(all, k)
}
