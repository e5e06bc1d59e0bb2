//! Browser seam.
//!
//! This module provides:
//! - The `PageDriver` trait every browser-driven step goes through
//! - `ClickTarget`, the address of a clickable element inside a page
//! - `WebDriverBrowser`, the `fantoccini` implementation
//!
//! Drivers hand out HTML snapshots; all extraction happens on those snapshots
//! in `crate::parse`.

mod webdriver;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::error_handling::BrowserError;

pub use webdriver::WebDriverBrowser;

/// Address of a clickable element: the `index`-th element matching `item`
/// inside the first element matching `container`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickTarget {
    pub container: String,
    pub item: String,
    pub index: usize,
}

impl fmt::Display for ClickTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} >> {}[{}]", self.container, self.item, self.index)
    }
}

/// A single browser tab.
///
/// Implementations are driven by one caller at a time; nothing here is meant
/// to be used concurrently.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Starts loading `url` (absolute).
    async fn goto(&self, url: &str) -> Result<(), BrowserError>;

    /// Waits until the DOM is loaded and network activity has stopped, or
    /// `timeout` elapses.
    async fn wait_until_settled(&self, timeout: Duration) -> Result<(), BrowserError>;

    /// Current serialized DOM.
    async fn page_source(&self) -> Result<String, BrowserError>;

    /// Activates the addressed element.
    async fn click(&self, target: &ClickTarget) -> Result<(), BrowserError>;

    /// PNG capture of the visible viewport.
    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError>;

    /// Ends the browser session. Later calls fail.
    async fn close(&self) -> Result<(), BrowserError>;
}
