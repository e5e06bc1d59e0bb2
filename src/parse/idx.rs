//! Agency `idx` extraction.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::DETAIL_PATH_PREFIX;

static IDX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"idx=(\d+)").unwrap_or_else(|e| {
        panic!("Failed to compile idx pattern: {e}. This is a programming error.")
    })
});

/// Numeric agency id from a listing link (`...?idx=42&...` gives `"42"`).
pub fn parse_idx(href: &str) -> Option<String> {
    IDX_PATTERN
        .captures(href)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Detail page URL for an agency id: `<base>/ab-7554-<idx>`.
pub fn detail_url(base_url: &str, idx: &str) -> String {
    format!(
        "{}{}{}",
        base_url.trim_end_matches('/'),
        DETAIL_PATH_PREFIX,
        idx
    )
}
