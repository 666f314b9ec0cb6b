// tests/highlights_canonical.rs
//
// Dedup-key guarantees: URL canonicalization equalities, title
// canonicalization, and the similarity ratio's fixed points.

use techsum_newsletter::highlights::canonical::{canonical_title, canonical_url};
use techsum_newsletter::highlights::similarity::title_similarity;

#[test]
fn canonical_url_is_idempotent() {
    for u in [
        "HTTP://Example.com/a/",
        "https://x.com/a?utm=1#frag",
        "techsum.ai/story",
        "ftp://mirror.example.com/pub",
        "::: garbage :::",
    ] {
        let once = canonical_url(u);
        assert_eq!(canonical_url(&once), once, "input: {u}");
    }
}

#[test]
fn scheme_case_and_trailing_slash_do_not_matter() {
    assert_eq!(
        canonical_url("HTTP://Example.com/a/"),
        canonical_url("https://example.com/a")
    );
}

#[test]
fn query_and_fragment_are_dropped() {
    assert_eq!(
        canonical_url("https://x.com/a?utm=1#frag"),
        canonical_url("https://x.com/a")
    );
}

#[test]
fn identical_canonical_titles_have_similarity_one() {
    for t in [
        "Big Tech Unveils New Chip!",
        "短新闻：发布！",
        "plain title",
        "",
    ] {
        let c = canonical_title(t);
        assert_eq!(title_similarity(&c, &c), 1.0, "title: {t:?}");
    }
}

#[test]
fn titles_differing_only_in_punct_case_spacing_compare_equal() {
    assert_eq!(
        canonical_title("Big Tech Unveils New Chip!"),
        canonical_title("big tech unveils new chip")
    );
    assert_eq!(
        canonical_title("Hello,   World — again"),
        canonical_title("hello world again")
    );
}
