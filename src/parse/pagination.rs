//! Page-advance decision for a listing page.
//!
//! Looks for a pagination control, then for the element that leads to the
//! next page. The result is a `ClickTarget` the driver can activate, or the
//! reason this is the last page.

use scraper::{ElementRef, Html};

use crate::browser::ClickTarget;
use crate::parse::listing::first_matching_chain;
use crate::utils::{element_text, select_first_in};

const PAGINATION_SELECTORS: &[&str] = &[
    "div.paging",
    "div[class*='paging']",
    "ul.pagination",
    "div.pagination",
    "nav.pagination",
    ".page_nav",
    "[class*='pagination']",
    "[class*='page_navi']",
    "div.bbsPaging",
];
const PAGE_ITEM_SELECTORS: &[&str] = &["a", "button", "span[onclick]"];

const NEXT_TOKENS: &[&str] = &["다음", ">", "next", "→", "▶", "Next Page", "다음 페이지"];
const NEXT_MARKUP_KEYWORDS: &[&str] = &["next", "arr", "right"];
const NEXT_ARIA_KEYWORDS: &[&str] = &["next", "다음"];
const CURRENT_PAGE_CLASSES: &[&str] = &["LF_page_link_current", "active", "current"];
const FIRST_PAGE_TOKENS: &[&str] = &["처음", "첫 페이지", "<<", "first", "맨앞"];
const DISABLED_CLASSES: &[&str] = &["disabled", "none"];

/// Why a listing page is the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastPageReason {
    /// No pagination control on the page
    NoControl,
    /// A control without links or buttons
    NoItems,
    /// No element looked like "next"
    NoNextElement,
    /// The "next" element is disabled; carries its class attribute
    Disabled(String),
}

/// Outcome of the page-advance decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAdvance {
    /// Activate `target` to reach the next page.
    Next {
        target: ClickTarget,
        /// Visible text of the chosen element
        label: String,
    },
    LastPage(LastPageReason),
}

fn class_of<'a>(element: &ElementRef<'a>) -> &'a str {
    element.value().attr("class").unwrap_or_default()
}

fn by_text(items: &[ElementRef<'_>]) -> Option<usize> {
    items.iter().position(|item| {
        let text = element_text(*item);
        let text = text.trim();
        NEXT_TOKENS.iter().any(|t| text.contains(t))
    })
}

fn by_markup(items: &[ElementRef<'_>]) -> Option<usize> {
    items.iter().position(|item| {
        let markup = item.inner_html().to_lowercase();
        NEXT_MARKUP_KEYWORDS.iter().any(|k| markup.contains(k))
    })
}

fn by_aria_label(items: &[ElementRef<'_>]) -> Option<usize> {
    items.iter().position(|item| {
        let label = item
            .value()
            .attr("aria-label")
            .unwrap_or_default()
            .to_lowercase();
        NEXT_ARIA_KEYWORDS.iter().any(|k| label.contains(k))
    })
}

/// Positional inference around the current-page element, or the last item.
fn by_position(items: &[ElementRef<'_>]) -> Option<usize> {
    if items.len() < 2 {
        return None;
    }

    let current = items.iter().find(|item| {
        let class = class_of(item);
        CURRENT_PAGE_CLASSES.iter().any(|c| class.contains(c))
    });

    let Some(current) = current else {
        let last = items.len() - 1;
        let text = element_text(items[last]);
        return (!FIRST_PAGE_TOKENS.contains(&text.trim())).then_some(last);
    };

    let sibling = current
        .next_siblings()
        .find_map(ElementRef::wrap)
        .filter(|s| s.value().name() == "a");
    if let Some(sibling) = sibling {
        if let Some(pos) = items.iter().position(|item| item.id() == sibling.id()) {
            return Some(pos);
        }
    }

    let current_number: i64 = element_text(*current).trim().parse().ok()?;
    items
        .iter()
        .position(|item| element_text(*item).trim().parse::<i64>().ok() == Some(current_number + 1))
}

/// Decides how to reach the page after the one in `html`.
///
/// The "next" element is chosen by, in order: its text, keywords in its
/// markup, its `aria-label`, then its position relative to the current-page
/// element (or the last item when no element is flagged as current).
pub fn decide_page_advance(html: &str) -> PageAdvance {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let Some((container_selector, container)) = PAGINATION_SELECTORS
        .iter()
        .find_map(|s| select_first_in(root, s, "pagination control").map(|e| (*s, e)))
    else {
        return PageAdvance::LastPage(LastPageReason::NoControl);
    };
    log::debug!("Found pagination with selector: {container_selector}");

    let Some((item_selector, items)) =
        first_matching_chain(container, PAGE_ITEM_SELECTORS, "pagination items")
    else {
        return PageAdvance::LastPage(LastPageReason::NoItems);
    };

    let Some(index) = by_text(&items)
        .or_else(|| by_markup(&items))
        .or_else(|| by_aria_label(&items))
        .or_else(|| by_position(&items))
    else {
        return PageAdvance::LastPage(LastPageReason::NoNextElement);
    };

    let chosen = items[index];
    let class = class_of(&chosen);
    if DISABLED_CLASSES.iter().any(|d| class.contains(d)) {
        return PageAdvance::LastPage(LastPageReason::Disabled(class.to_string()));
    }

    PageAdvance::Next {
        target: ClickTarget {
            container: container_selector.to_string(),
            item: item_selector.to_string(),
            index,
        },
        label: element_text(chosen).trim().to_string(),
    }
}
