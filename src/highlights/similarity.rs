// src/highlights/similarity.rs

/// Two canonical titles at or above this ratio are treated as the same
/// story.
pub const TITLE_SIMILARITY_THRESHOLD: f64 = 0.90;

/// Normalized edit-distance ratio between two canonical titles:
/// 1.0 = identical, 0.0 = disjoint. Symmetric and deterministic; used
/// only as a threshold test, never for ranking.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}
