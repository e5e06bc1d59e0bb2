//! CSS selector parsing utilities.

use scraper::{ElementRef, Html, Node, Selector};

use crate::utils::sanitize::normalize_whitespace;

/// Parses a CSS selector, logging instead of panicking on bad input.
///
/// Selector chains are plain string tables, so one malformed entry should
/// only knock out that entry, not the whole chain.
///
/// # Arguments
///
/// * `selector_str` - The CSS selector string to parse
/// * `context` - Context description for error logging (e.g. "pagination control")
///
/// # Returns
///
/// The parsed `Selector`, or `None` if it does not parse.
pub fn parse_selector(selector_str: &str, context: &str) -> Option<Selector> {
    match Selector::parse(selector_str) {
        Ok(selector) => Some(selector),
        Err(e) => {
            log::error!(
                "Failed to parse CSS selector '{}' in {}: {}. Skipping it.",
                selector_str,
                context,
                e
            );
            None
        }
    }
}

/// First element of `document` matching `selector_str`.
pub fn select_first<'a>(document: &'a Html, selector_str: &str, context: &str) -> Option<ElementRef<'a>> {
    let selector = parse_selector(selector_str, context)?;
    document.select(&selector).next()
}

/// First descendant of `element` matching `selector_str`.
pub fn select_first_in<'a>(
    element: ElementRef<'a>,
    selector_str: &str,
    context: &str,
) -> Option<ElementRef<'a>> {
    let selector = parse_selector(selector_str, context)?;
    element.select(&selector).next()
}

/// Every descendant of `element` matching `selector_str`, in document order.
pub fn select_all_in<'a>(
    element: ElementRef<'a>,
    selector_str: &str,
    context: &str,
) -> Vec<ElementRef<'a>> {
    match parse_selector(selector_str, context) {
        Some(selector) => element.select(&selector).collect(),
        None => Vec::new(),
    }
}

/// Elements that start and end a line in rendered text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Elements whose contents are never rendered.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            // Source whitespace (including newlines) renders as a plain space
            Node::Text(text) => out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c })),
            Node::Element(e) if e.name() == "br" => out.push('\n'),
            Node::Element(e) if HIDDEN_ELEMENTS.contains(&e.name()) => {}
            Node::Element(e) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                let block = BLOCK_ELEMENTS.contains(&e.name());
                if block {
                    out.push('\n');
                }
                collect_text(child, out);
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Rendered text of an element, approximating the browser's `innerText`.
///
/// Inline children (`<em>`, `<b>`, `<span>`, ...) join their text without a
/// separator. Block elements and `<br>` break lines. Each line is
/// whitespace-normalized and empty lines are dropped.
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);
    raw.lines()
        .map(normalize_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selector_invalid_returns_none() {
        assert!(parse_selector("div[", "test").is_none());
        assert!(parse_selector("div.intro", "test").is_some());
    }

    #[test]
    fn test_element_text_keeps_inline_markup_on_one_line() {
        let doc = Html::parse_fragment(
            "<div><span>알파<em>애드</em></span><p>퍼포먼스 <b>마케팅</b>\n  전문</p></div>",
        );
        let span = select_first(&doc, "span", "test").expect("span");
        assert_eq!(element_text(span), "알파애드");
        let p = select_first(&doc, "p", "test").expect("p");
        assert_eq!(element_text(p), "퍼포먼스 마케팅 전문");
    }

    #[test]
    fn test_element_text_breaks_lines_at_blocks_and_br() {
        let doc = Html::parse_fragment(
            "<a><p> 페이스북 </p><p>12개의 대행사</p></a><div id='b'>디스플레이<br>7개의 대행사<script>x()</script></div>",
        );
        let a = select_first(&doc, "a", "test").expect("anchor");
        assert_eq!(element_text(a), "페이스북\n12개의 대행사");
        let div = select_first(&doc, "#b", "test").expect("div");
        assert_eq!(element_text(div), "디스플레이\n7개의 대행사");
    }

    #[test]
    fn test_select_all_in_with_bad_selector_is_empty() {
        let doc = Html::parse_fragment("<div><a>1</a><a>2</a></div>");
        let div = select_first(&doc, "div", "test").expect("div");
        assert_eq!(select_all_in(div, "a", "test").len(), 2);
        assert!(select_all_in(div, "a[", "test").is_empty());
    }
}
