//! Run resources and their release.
//!
//! This module defines the `ScrapeResources` struct, which owns the two
//! resources a run must always give back: the browser session and the store.

use std::sync::Arc;

use crate::browser::PageDriver;
use crate::storage::Store;

/// Everything a run acquires and must release, on every exit path.
pub struct ScrapeResources {
    /// Database handle
    pub store: Store,
    /// Browser tab driving the run
    pub driver: Arc<dyn PageDriver>,
}

impl ScrapeResources {
    pub fn new(store: Store, driver: Arc<dyn PageDriver>) -> Self {
        Self { store, driver }
    }

    /// Closes the browser session, then the store.
    ///
    /// Failures are logged; there is nothing left to do about them.
    pub async fn release(self) {
        if let Err(e) = self.driver.close().await {
            log::warn!("Failed to close browser session: {e}");
        }
        self.store.close().await;
    }
}
