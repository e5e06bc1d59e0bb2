//! `PageDriver` over a WebDriver server, via `fantoccini`.

use std::time::Duration;

use async_trait::async_trait;
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};
use tokio::time::{sleep, Instant};

use crate::browser::{ClickTarget, PageDriver};
use crate::config::{SETTLE_TIMEOUT, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::error_handling::{BrowserError, InitializationError};

const SETTLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

const READY_STATE_SCRIPT: &str = "return document.readyState;";
const RESOURCE_COUNT_SCRIPT: &str =
    "return (window.performance && performance.getEntriesByType) \
     ? performance.getEntriesByType('resource').length : 0;";
const SCRIPT_CLICK: &str = "arguments[0].click(); return true;";

/// Session timeouts: page loads are bounded like the settled-page wait; the
/// script and implicit-wait timeouts keep the server's defaults.
fn session_timeouts() -> TimeoutConfiguration {
    TimeoutConfiguration::new(None, Some(SETTLE_TIMEOUT), None)
}

/// A Chrome tab driven through WebDriver (chromedriver by default).
pub struct WebDriverBrowser {
    client: Client,
}

impl WebDriverBrowser {
    /// Opens a new browser session at `webdriver_url`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::BrowserSessionError` when the server cannot
    /// be reached or refuses the capabilities.
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, InitializationError> {
        let mut args = vec![
            format!("--window-size={VIEWPORT_WIDTH},{VIEWPORT_HEIGHT}"),
            "--disable-gpu".to_string(),
            "--no-sandbox".to_string(),
        ];
        if headless {
            args.push("--headless=new".to_string());
        }
        let mut capabilities = Map::new();
        capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

        let client = ClientBuilder::native()
            .capabilities(capabilities)
            .connect(webdriver_url)
            .await
            .map_err(|e| InitializationError::BrowserSessionError(e.to_string()))?;

        if let Err(e) = client.update_timeouts(session_timeouts()).await {
            log::warn!("Could not set page-load timeout to {SETTLE_TIMEOUT:?}: {e}");
        }

        // Window sizing is best-effort; some drivers ignore it in headless mode
        if let Err(e) = client
            .set_window_size(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
            .await
        {
            log::debug!("Could not resize browser window: {e}");
        }

        log::info!("Browser session opened at {webdriver_url} (headless: {headless})");
        Ok(Self { client })
    }

    async fn script_value(&self, script: &str) -> Result<Value, BrowserError> {
        Ok(self.client.execute(script, Vec::new()).await?)
    }
}

#[async_trait]
impl PageDriver for WebDriverBrowser {
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        self.client
            .goto(url)
            .await
            .map_err(|e| BrowserError::LoadFailed(format!("{url}: {e}")))
    }

    async fn wait_until_settled(&self, timeout: Duration) -> Result<(), BrowserError> {
        let deadline = Instant::now() + timeout;

        loop {
            let state = self.script_value(READY_STATE_SCRIPT).await?;
            if state.as_str().is_some_and(|s| s != "loading") {
                break;
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout(timeout, "DOM content".to_string()));
            }
            sleep(SETTLE_POLL_INTERVAL).await;
        }

        // Network quiet: the resource entry count holds still for two polls
        let mut last = self.script_value(RESOURCE_COUNT_SCRIPT).await?.as_u64();
        let mut stable_polls = 0;
        while stable_polls < 2 {
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout(timeout, "network idle".to_string()));
            }
            sleep(SETTLE_POLL_INTERVAL).await;
            let current = self.script_value(RESOURCE_COUNT_SCRIPT).await?.as_u64();
            if current == last {
                stable_polls += 1;
            } else {
                stable_polls = 0;
                last = current;
            }
        }
        Ok(())
    }

    async fn page_source(&self) -> Result<String, BrowserError> {
        Ok(self.client.source().await?)
    }

    async fn click(&self, target: &ClickTarget) -> Result<(), BrowserError> {
        let container = self
            .client
            .find(Locator::Css(&target.container))
            .await
            .map_err(|_| BrowserError::ElementNotFound(target.to_string()))?;
        let items = container.find_all(Locator::Css(&target.item)).await?;
        let element = items
            .into_iter()
            .nth(target.index)
            .ok_or_else(|| BrowserError::ElementNotFound(target.to_string()))?;

        match element.click().await {
            Ok(()) => Ok(()),
            Err(e) => {
                log::debug!("Native click on {target} refused ({e}); clicking via script");
                let handle = serde_json::to_value(&element)
                    .map_err(|e| BrowserError::Command(e.to_string()))?;
                self.client.execute(SCRIPT_CLICK, vec![handle]).await?;
                Ok(())
            }
        }
    }

    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError> {
        Ok(self.client.screenshot().await?)
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.client.clone().close().await?;
        log::info!("Browser session closed.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_load_timeout_matches_settle_timeout() {
        let timeouts = session_timeouts();
        assert_eq!(timeouts.page_load(), Some(SETTLE_TIMEOUT));
        assert_eq!(timeouts.script(), None);
        assert_eq!(timeouts.implicit(), None);
    }
}
