//! Category anchors on the directory page.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use crate::parse::listing::first_matching_chain;
use crate::utils::element_text;

/// Category anchor selectors, most specific first.
pub const CATEGORY_SELECTORS: &[&str] = &[
    "#_LF_agency_dir > div.bg_fff.fix_1050 > div:nth-child(1) > div.category_wrap > ul > li > a",
    "div.category_wrap > ul > li > a",
];

/// One category link as printed on the directory page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryAnchor {
    pub name: String,
    /// Raw `href`; may be relative
    pub href: String,
    /// Advisory count from the "N개의 대행사" line
    pub agency_count: i64,
}

/// Trailing "N개의 대행사" count, whether or not it sits on its own line.
static COUNT_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*([\d,]+)\s*개의\s*대행사\s*$").unwrap_or_else(|e| {
        panic!("Failed to compile category count pattern: {e}. This is a programming error.")
    })
});

/// Splits anchor text into the category name and its advisory count.
///
/// Inline markup can run the name and the count together (`"페이스북12개의 대행사"`),
/// so the count is peeled off the end rather than read from a second line.
fn split_name_and_count(text: &str) -> (String, i64) {
    let flat = text.replace('\n', " ");
    match COUNT_SUFFIX.captures(&flat) {
        Some(caps) => {
            let start = caps.get(0).map_or(flat.len(), |m| m.start());
            let count = caps.get(1).map_or(0, |m| parse_category_count(m.as_str()));
            (flat[..start].trim().to_string(), count)
        }
        None => {
            let mut lines = text.lines();
            let name = lines.next().unwrap_or_default().trim().to_string();
            (name, lines.next().map(parse_category_count).unwrap_or(0))
        }
    }
}

/// Advisory agency count from a line like `"128개의 대행사"`. Zero when it has no digits.
pub fn parse_category_count(line: &str) -> i64 {
    let digits: String = line.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Every category anchor on the directory page, in page order.
///
/// Anchors without a name or an `href` are dropped with a warning.
pub fn parse_categories(html: &str) -> Vec<CategoryAnchor> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let Some((selector, anchors)) = first_matching_chain(root, CATEGORY_SELECTORS, "category anchors")
    else {
        return Vec::new();
    };
    log::debug!("Category anchors matched with selector: {selector}");

    anchors
        .into_iter()
        .filter_map(|anchor| {
            let text = element_text(anchor);
            let (name, agency_count) = split_name_and_count(&text);
            let href = anchor.value().attr("href").map(str::trim).unwrap_or_default();
            if name.is_empty() || href.is_empty() {
                log::warn!("Skipping category anchor without name or link: {text:?}");
                return None;
            }
            Some(CategoryAnchor {
                name,
                href: href.to_string(),
                agency_count,
            })
        })
        .collect()
}
