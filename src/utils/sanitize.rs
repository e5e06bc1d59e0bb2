//! Text and file-name clean-up helpers.

use std::sync::LazyLock;

use regex::Regex;

/// Characters that are unsafe in file names on at least one common filesystem,
/// plus control characters.
static UNSAFE_FILENAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\\/*?:"<>|\x00-\x1f\x7f]"#).unwrap_or_else(|e| {
        panic!("Failed to compile file-name pattern: {e}. This is a programming error.")
    })
});

/// Replaces every filesystem-unsafe character with `_`.
///
/// Non-Latin text is left untouched, so Korean category names stay readable.
pub fn sanitize_file_component(component: &str) -> String {
    UNSAFE_FILENAME_CHARS.replace_all(component, "_").into_owned()
}

/// Deterministic logo file name for an agency: `<category>_<agency>.png`.
pub fn logo_file_name(category_name: &str, agency_name: &str) -> String {
    format!(
        "{}_{}.png",
        sanitize_file_component(category_name),
        sanitize_file_component(agency_name)
    )
}

/// Collapses every whitespace run to a single space and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates to at most `max_chars` characters, never splitting a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Truncated preview for debug logging.
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", truncate_chars(text, max_chars))
    } else {
        text.to_string()
    }
}
