//! HTML extraction over page snapshots.
//!
//! This module extracts structured data from the directory's markup:
//! - Category anchors on the directory page
//! - Agency entries on a listing page (one fallback chain per field)
//! - The agency `idx` and the detail URL derived from it
//! - The pagination decision for a listing page
//! - The long-form description on a detail page
//!
//! Everything here is a pure function of the HTML string. Parsed documents
//! (`scraper::Html`) are not `Send`, so callers parse, extract owned values and
//! drop the document before awaiting anything.

mod category;
mod detail;
mod idx;
mod listing;
mod pagination;

pub use category::{parse_categories, parse_category_count, CategoryAnchor, CATEGORY_SELECTORS};
pub use detail::{body_text, parse_detail_description, DETAIL_SELECTORS};
pub use idx::{detail_url, parse_idx};
pub use listing::{parse_listing, ListingEntry, ListingPage, ENTRY_SELECTORS};
pub use pagination::{decide_page_advance, LastPageReason, PageAdvance};
