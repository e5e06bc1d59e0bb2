//! Agency entries on a category listing page.
//!
//! Each field has its own ordered selector chain; the first selector that
//! yields a non-empty value wins. A field with no match degrades to the
//! `UNAVAILABLE` sentinel. Only a missing name drops the entry.

use scraper::{ElementRef, Html};

use crate::config::UNAVAILABLE;
use crate::utils::{element_text, select_all_in, select_first_in};

/// Entry containers: the primary layout, then the alternate one.
pub const ENTRY_SELECTORS: &[&str] = &["div._list > div", "div.conts div[class^='list_'] > div"];

const NAME_SELECTORS: &[&str] = &[
    "a.link_tit > span.AB-LF-common",
    "a > span[class*='AB-']",
    "a[class*='link_'] > span",
    "a > span",
];
const LINK_SELECTORS: &[&str] = &["a.link_tit[href]", "a[href*='idx=']"];
const URL_SELECTORS: &[&str] = &[
    "div.url > a.link_tit",
    "div.url > a",
    "div[class*='url'] > a",
    "a[class*='link_url']",
];
const LOGO_SELECTORS: &[&str] = &[
    "div.logo_thumb > a > img",
    "div[class*='logo'] > a > img",
    "div[class*='logo'] img",
    "img[class*='logo']",
    "img",
];
const DESCRIPTION_SELECTORS: &[&str] = &[
    "p.desc",
    "p[class*='desc']",
    "p",
    "div[class*='desc']",
];

/// Fields of one listing entry, before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    /// `href` of the entry's profile link, if any
    pub href: Option<String>,
    /// External homepage as printed (not validated), or the sentinel
    pub url: String,
    /// Logo `src` as found (may be relative), or the sentinel
    pub logo_src: String,
    /// Short description, or the sentinel
    pub description: String,
}

impl ListingEntry {
    /// Whether a logo can be downloaded for this entry.
    pub fn has_logo(&self) -> bool {
        !self.logo_src.is_empty() && self.logo_src != UNAVAILABLE
    }
}

/// What a listing page yielded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub entries: Vec<ListingEntry>,
    /// Entry containers dropped because no name could be found
    pub skipped: usize,
    /// Preview of the first container's markup, for debug logging
    pub first_entry_html: Option<String>,
}

impl ListingPage {
    /// Entry names in page order; equal sets across two pages mean the page did not advance.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}

/// First selector in `chain` that matches at least one element under `root`.
pub(crate) fn first_matching_chain<'a>(
    root: ElementRef<'a>,
    chain: &[&'static str],
    context: &str,
) -> Option<(&'static str, Vec<ElementRef<'a>>)> {
    chain.iter().find_map(|selector| {
        let found = select_all_in(root, selector, context);
        (!found.is_empty()).then_some((*selector, found))
    })
}

/// First non-empty trimmed text along a selector chain.
fn first_text(entry: ElementRef<'_>, chain: &[&str], context: &str) -> Option<String> {
    chain.iter().find_map(|selector| {
        select_first_in(entry, selector, context)
            .map(|e| element_text(e).trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

/// First non-empty attribute value along a selector chain.
fn first_attr(entry: ElementRef<'_>, chain: &[&str], attr: &str, context: &str) -> Option<String> {
    chain.iter().find_map(|selector| {
        select_first_in(entry, selector, context)
            .and_then(|e| e.value().attr(attr))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    })
}

fn first_element<'a>(entry: ElementRef<'a>, chain: &[&str], context: &str) -> Option<ElementRef<'a>> {
    chain.iter().find_map(|selector| {
        select_first_in(entry, selector, context).filter(|e| !element_text(*e).trim().is_empty())
    })
}

/// `href` of the nearest enclosing anchor.
fn closest_anchor_href(element: ElementRef<'_>) -> Option<String> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "a")
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
}

fn extract_entry(entry: ElementRef<'_>) -> Option<ListingEntry> {
    let name_element = first_element(entry, NAME_SELECTORS, "agency name")?;
    let name = element_text(name_element).trim().to_string();

    let href = first_attr(entry, LINK_SELECTORS, "href", "agency link")
        .or_else(|| closest_anchor_href(name_element));

    Some(ListingEntry {
        name,
        href,
        url: first_text(entry, URL_SELECTORS, "agency url")
            .unwrap_or_else(|| UNAVAILABLE.to_string()),
        logo_src: first_attr(entry, LOGO_SELECTORS, "src", "agency logo")
            .unwrap_or_else(|| UNAVAILABLE.to_string()),
        description: first_text(entry, DESCRIPTION_SELECTORS, "agency description")
            .unwrap_or_else(|| UNAVAILABLE.to_string()),
    })
}

/// Extracts every agency entry on a listing page, in page order.
///
/// Uses the primary entry selector, or the alternate one when the primary
/// matches nothing.
pub fn parse_listing(html: &str) -> ListingPage {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let Some((selector, containers)) = first_matching_chain(root, ENTRY_SELECTORS, "listing entries")
    else {
        return ListingPage::default();
    };
    log::debug!(
        "Found {} agency elements with selector: {selector}",
        containers.len()
    );

    let mut page = ListingPage {
        first_entry_html: containers.first().map(|c| c.inner_html()),
        ..Default::default()
    };
    for (position, container) in containers.into_iter().enumerate() {
        match extract_entry(container) {
            Some(entry) => page.entries.push(entry),
            None => {
                log::warn!("No agency name for entry {}; skipping it", position + 1);
                page.skipped += 1;
            }
        }
    }
    page
}
