//! Long-form description on an agency detail page.

use scraper::{ElementRef, Html, Node};

use crate::utils::sanitize::{normalize_whitespace, truncate_chars};
use crate::utils::{element_text, select_first};

/// Content selectors, most specific first.
pub const DETAIL_SELECTORS: &[&str] = &[
    "#_RST_dir > div > div.cont_main > div > div > div:nth-child(2) > div.intro",
    "div.intro",
    "div[class*='intro']",
    "div.cont_main div[class*='intro']",
    "div.cont_main p",
    "#_RST_dir p",
];

/// Text of the first element matching `selector`, if it has any.
///
/// The detail fetcher calls this per selector while polling, so each
/// selector gets its own wait.
pub fn parse_detail_description(html: &str, selector: &str) -> Option<String> {
    let document = Html::parse_document(html);
    select_first(&document, selector, "detail description")
        .map(element_text)
        .filter(|t| !t.trim().is_empty())
}

fn is_hidden_container(element: &ElementRef<'_>) -> bool {
    matches!(
        element.value().name(),
        "script" | "style" | "noscript" | "template"
    )
}

/// Whole visible text of `<body>`, whitespace-normalized and cut to `max_chars`.
///
/// Script and style contents are left out. `None` when the body has no text.
pub fn body_text(html: &str, max_chars: usize) -> Option<String> {
    let document = Html::parse_document(html);
    let body = select_first(&document, "body", "page body")?;

    let raw: String = body
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) => {
                let hidden = node
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .any(|e| is_hidden_container(&e));
                (!hidden).then(|| format!("{} ", &**text))
            }
            _ => None,
        })
        .collect();

    let cleaned = truncate_chars(&normalize_whitespace(&raw), max_chars);
    (!cleaned.is_empty()).then_some(cleaned)
}
