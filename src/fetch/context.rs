//! Shared resources for the browser-driven scraping steps.
//!
//! This module defines the `ScrapeContext` struct that groups everything the
//! category, listing and detail steps need, so each step takes one argument
//! instead of five.

use std::path::PathBuf;
use std::sync::Arc;

use crate::fetch::Navigator;
use crate::storage::Store;

/// Context containing all shared resources needed for one scraping run.
#[derive(Clone)]
pub struct ScrapeContext {
    /// Browser tab, with the base origin and timing
    pub navigator: Navigator,
    /// Persistent store
    pub store: Store,
    /// HTTP client for logo downloads
    pub client: Arc<reqwest::Client>,
    /// Directory receiving downloaded logos
    pub logos_dir: PathBuf,
    /// Directory receiving debug screenshots
    pub debug_dir: PathBuf,
    /// Maximum agencies to collect per category; `None` for all
    pub agency_cap: Option<usize>,
}

impl ScrapeContext {
    /// Creates a new `ScrapeContext` with the given resources.
    pub fn new(
        navigator: Navigator,
        store: Store,
        client: Arc<reqwest::Client>,
        logos_dir: PathBuf,
        debug_dir: PathBuf,
        agency_cap: Option<usize>,
    ) -> Self {
        Self {
            navigator,
            store,
            client,
            logos_dir,
            debug_dir,
            agency_cap,
        }
    }
}
