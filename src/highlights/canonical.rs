// src/highlights/canonical.rs
//! Canonical forms of URLs and titles, used strictly as dedup keys.

use once_cell::sync::OnceCell;
use regex::Regex;
use url::Url;

/// Canonicalize a URL for duplicate matching: force `https` for
/// empty/http/https schemes (any other scheme is preserved), lowercase
/// the host, strip trailing `/` from the path, and drop the query
/// string and fragment. Input that cannot be parsed is returned
/// unchanged; this never fails.
pub fn canonical_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut u = match Url::parse(trimmed) {
        Ok(u) => u,
        // Scheme-less input, e.g. "example.com/a": treat as https.
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            match Url::parse(&format!("https://{trimmed}")) {
                Ok(u) => u,
                Err(_) => return raw.to_string(),
            }
        }
        Err(_) => return raw.to_string(),
    };

    // Opaque URLs like mailto: have no host/path structure to normalize.
    if u.cannot_be_a_base() {
        return raw.to_string();
    }

    if u.scheme() == "http" {
        let _ = u.set_scheme("https");
    }
    u.set_query(None);
    u.set_fragment(None);

    let path = u.path().trim_end_matches('/').to_string();
    u.set_path(&path);

    u.to_string()
}

/// Canonicalize a title: lowercase, collapse every run of
/// punctuation/symbol characters to a single space, collapse
/// whitespace, trim.
pub fn canonical_title(title: &str) -> String {
    static RE_PUNCT: OnceCell<Regex> = OnceCell::new();
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_punct = RE_PUNCT.get_or_init(|| Regex::new(r"(?u)[\p{P}\p{S}]+").unwrap());
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());

    let lowered = title.to_lowercase();
    let spaced = re_punct.replace_all(&lowered, " ");
    re_ws.replace_all(&spaced, " ").trim().to_string()
}
