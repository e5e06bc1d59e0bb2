//! Page navigation with bounded retry and a settled-page wait.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use url::Url;

use crate::browser::{ClickTarget, PageDriver};
use crate::config::Timing;
use crate::error_handling::{BrowserError, NavigationError};
use crate::utils::{parse_selector, retry_with_backoff, RetryPolicy};

/// Drives one browser tab for the scraper.
///
/// Cloning shares the tab; clones must still be used one at a time.
#[derive(Clone)]
pub struct Navigator {
    driver: Arc<dyn PageDriver>,
    base_url: Url,
    timing: Timing,
}

impl Navigator {
    /// Creates a navigator that resolves relative links against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidUrl` when `base_url` is not an absolute URL.
    pub fn new(
        driver: Arc<dyn PageDriver>,
        base_url: &str,
        timing: Timing,
    ) -> Result<Self, NavigationError> {
        let base_url = Url::parse(base_url).map_err(|source| NavigationError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            driver,
            base_url,
            timing,
        })
    }

    /// Base origin without a trailing slash (`https://www.i-boss.co.kr`).
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn driver(&self) -> &Arc<dyn PageDriver> {
        &self.driver
    }

    /// Absolute form of `link`; absolute links pass through unchanged.
    pub fn resolve(&self, link: &str) -> Result<String, NavigationError> {
        self.base_url
            .join(link.trim())
            .map(String::from)
            .map_err(|source| NavigationError::InvalidUrl {
                url: link.to_string(),
                source,
            })
    }

    /// Loads `link` and waits for the page to settle.
    ///
    /// Each attempt loads the page and waits for DOM-loaded plus network
    /// quiet. Failed attempts are retried with the fixed backoff from
    /// `Timing`. After a successful attempt the fixed settle delay is applied.
    ///
    /// # Returns
    ///
    /// The absolute URL that was loaded.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::Exhausted` once `max_attempts` attempts failed.
    pub async fn navigate(&self, link: &str, max_attempts: usize) -> Result<String, NavigationError> {
        let url = self.resolve(link)?;
        let policy = RetryPolicy::fixed(max_attempts, self.timing.retry_backoff);
        let driver = &self.driver;
        let settle_timeout = self.timing.settle_timeout;
        let target = url.as_str();

        log::info!("Navigating to: {url}");
        retry_with_backoff(policy, target, || async move {
            driver.goto(target).await?;
            driver.wait_until_settled(settle_timeout).await
        })
        .await
        .map_err(|e| NavigationError::Exhausted {
            url: url.clone(),
            attempts: e.attempts,
            last: e.last,
        })?;

        sleep(self.timing.settle_delay).await;
        Ok(url)
    }

    /// Current page HTML.
    pub async fn snapshot(&self) -> Result<String, BrowserError> {
        self.driver.page_source().await
    }

    /// Polls the page until `selector` matches, for at most `timeout`.
    ///
    /// # Returns
    ///
    /// The snapshot in which the selector matched, or `None` on timeout.
    pub async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Option<String>, BrowserError> {
        let Some(parsed) = parse_selector(selector, "selector wait") else {
            return Ok(None);
        };
        let deadline = Instant::now() + timeout;
        loop {
            let html = self.snapshot().await?;
            let matched = scraper::Html::parse_document(&html)
                .select(&parsed)
                .next()
                .is_some();
            if matched {
                return Ok(Some(html));
            }
            if Instant::now() >= deadline {
                log::debug!("Selector {selector} not found within {timeout:?}");
                return Ok(None);
            }
            sleep(self.timing.poll_interval).await;
        }
    }

    /// Writes a screenshot of the current page to `path` for debugging.
    ///
    /// Best-effort: failures are logged and `false` is returned.
    pub async fn save_screenshot(&self, path: &Path) -> bool {
        let png = match self.driver.screenshot().await {
            Ok(png) => png,
            Err(e) => {
                log::debug!("Could not capture screenshot for {}: {e}", path.display());
                return false;
            }
        };
        match tokio::fs::write(path, png).await {
            Ok(()) => {
                log::info!("Saved debug screenshot to {}", path.display());
                true
            }
            Err(e) => {
                log::warn!("Could not write screenshot {}: {e}", path.display());
                false
            }
        }
    }

    /// Activates a pagination element, then waits for the next page to settle.
    pub async fn click_and_settle(&self, target: &ClickTarget) -> Result<(), BrowserError> {
        self.driver.click(target).await?;
        self.driver
            .wait_until_settled(self.timing.settle_timeout)
            .await?;
        sleep(self.timing.page_advance_delay).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::testing::StaticDriver;
    use crate::fetch::test_timing;

    const BASE: &str = "https://example.test";

    fn navigator(driver: StaticDriver) -> (Navigator, Arc<StaticDriver>) {
        let driver = Arc::new(driver);
        let nav = Navigator::new(driver.clone(), BASE, test_timing()).expect("navigator");
        (nav, driver)
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let (nav, _) = navigator(StaticDriver::new());
        assert_eq!(
            nav.resolve("/ab-7553?cat=1").expect("relative"),
            "https://example.test/ab-7553?cat=1"
        );
        assert_eq!(
            nav.resolve("https://other.test/x").expect("absolute"),
            "https://other.test/x"
        );
        assert_eq!(nav.base_url(), BASE);
    }

    #[test]
    fn test_invalid_base_url() {
        let result = Navigator::new(Arc::new(StaticDriver::new()), "not a url", test_timing());
        assert!(matches!(result, Err(NavigationError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_navigate_retries_transient_failures() {
        let url = "https://example.test/ab-7553";
        let (nav, driver) = navigator(
            StaticDriver::new()
                .with_page(url, "<p>ok</p>")
                .failing(url, 2),
        );
        let loaded = nav.navigate("/ab-7553", 3).await.expect("third attempt");
        assert_eq!(loaded, url);
        assert_eq!(driver.visits().len(), 3);
    }

    #[tokio::test]
    async fn test_navigate_gives_up_after_max_attempts() {
        let url = "https://example.test/ab-7554-1";
        let (nav, driver) = navigator(StaticDriver::new().failing(url, 5));
        let err = nav.navigate(url, 2).await.expect_err("exhausted");
        match err {
            NavigationError::Exhausted { url: u, attempts, .. } => {
                assert_eq!(u, url);
                assert_eq!(attempts, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(driver.visits().len(), 2);
    }

    #[tokio::test]
    async fn test_save_screenshot_is_best_effort() {
        let url = "https://example.test/p";
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("debug_1.png");
        let (nav, _) = navigator(StaticDriver::new().with_page(url, "<p>x</p>"));

        assert!(!nav.save_screenshot(&path).await, "nothing loaded yet");
        assert!(!path.exists());

        nav.navigate(url, 1).await.expect("navigate");
        assert!(nav.save_screenshot(&path).await);
        assert!(!std::fs::read(&path).expect("written").is_empty());
        assert!(!nav.save_screenshot(&dir.path().join("missing/x.png")).await);
    }

    #[tokio::test]
    async fn test_wait_for_selector() {
        let url = "https://example.test/p";
        let (nav, _) = navigator(StaticDriver::new().with_page(url, "<div class='intro'>x</div>"));
        nav.navigate(url, 1).await.expect("navigate");

        let found = nav
            .wait_for_selector("div.intro", Duration::from_millis(10))
            .await
            .expect("poll");
        assert!(found.is_some());

        let missing = nav
            .wait_for_selector("div.missing", Duration::from_millis(10))
            .await
            .expect("poll");
        assert!(missing.is_none());
    }
}
