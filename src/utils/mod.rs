//! Shared utilities.
//!
//! This module provides:
//! - A bounded retry combinator with fixed backoff
//! - Text and file-name sanitizing
//! - CSS selector parsing helpers over `scraper` documents

mod retry;
pub mod sanitize;
mod selector;

pub use retry::{retry_with_backoff, RetryError, RetryPolicy};
pub use selector::{element_text, parse_selector, select_all_in, select_first, select_first_in};
