// Shared test helpers: a static page driver, a fixture directory site and
// fast run configuration.
//
// This module is included by several test files, so not every helper is used
// by each of them.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use agency_directory::error_handling::BrowserError;
use agency_directory::{ClickTarget, Config, PageDriver, ScrapeResources, Store, Timing};
use async_trait::async_trait;
use scraper::{Html, Selector};

pub const BASE: &str = "https://site.test";

/// Serves fixed HTML per absolute URL. A click follows the clicked element's
/// `href`, resolved against `BASE`.
#[derive(Default)]
pub struct StaticDriver {
    pages: HashMap<String, String>,
    current: Mutex<Option<String>>,
    visits: Mutex<Vec<String>>,
    closed: Mutex<bool>,
}

impl StaticDriver {
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }

    pub fn visited(&self, url: &str) -> bool {
        self.visits().iter().any(|v| v == url)
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap()
    }

    fn open(&self, url: &str) -> Result<(), BrowserError> {
        self.visits.lock().unwrap().push(url.to_string());
        if !self.pages.contains_key(url) {
            return Err(BrowserError::LoadFailed(url.to_string()));
        }
        *self.current.lock().unwrap() = Some(url.to_string());
        Ok(())
    }

    fn href_of(&self, html: &str, target: &ClickTarget) -> Option<String> {
        let document = Html::parse_document(html);
        let container = Selector::parse(&target.container).ok()?;
        let item = Selector::parse(&target.item).ok()?;
        let element = document
            .select(&container)
            .next()?
            .select(&item)
            .nth(target.index)?;
        let href = element.value().attr("href")?;
        url::Url::parse(BASE).ok()?.join(href).ok().map(String::from)
    }
}

#[async_trait]
impl PageDriver for StaticDriver {
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        self.open(url)
    }

    async fn wait_until_settled(&self, _timeout: Duration) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn page_source(&self) -> Result<String, BrowserError> {
        let current = self.current.lock().unwrap().clone();
        current
            .and_then(|url| self.pages.get(&url).cloned())
            .ok_or_else(|| BrowserError::Command("no page loaded".to_string()))
    }

    async fn click(&self, target: &ClickTarget) -> Result<(), BrowserError> {
        let html = self.page_source().await?;
        let href = self
            .href_of(&html, target)
            .ok_or_else(|| BrowserError::ElementNotFound(target.to_string()))?;
        self.open(&href)
    }

    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError> {
        let current = self.current.lock().unwrap().clone();
        current
            .map(|url| format!("screenshot of {url}").into_bytes())
            .ok_or_else(|| BrowserError::Command("no page loaded".to_string()))
    }

    async fn close(&self) -> Result<(), BrowserError> {
        *self.closed.lock().unwrap() = true;
        *self.current.lock().unwrap() = None;
        Ok(())
    }
}

/// Waits that keep tests fast.
pub fn fast_timing() -> Timing {
    Timing {
        settle_timeout: Duration::from_millis(50),
        settle_delay: Duration::ZERO,
        page_advance_delay: Duration::ZERO,
        retry_backoff: Duration::ZERO,
        listing_wait: Duration::from_millis(5),
        listing_grace_delay: Duration::ZERO,
        detail_selector_timeout: Duration::from_millis(5),
        detail_request_delay: Duration::ZERO,
        poll_interval: Duration::from_millis(1),
    }
}

/// Run configuration against the fixture site, writing into `output_dir`.
pub fn test_config(output_dir: &Path, categories: &[&str], cap: usize) -> Config {
    Config {
        categories: categories.iter().map(|c| c.to_string()).collect(),
        max_agencies_per_category: cap,
        output_dir: output_dir.to_path_buf(),
        base_url: BASE.to_string(),
        timing: fast_timing(),
        ..Default::default()
    }
}

/// Opens the configured store and pairs it with `driver`.
pub async fn resources(config: &Config, driver: Arc<StaticDriver>) -> ScrapeResources {
    let store = Store::open(&config.resolved_db_path())
        .await
        .expect("Failed to open store");
    ScrapeResources::new(store, driver)
}

/// Reopens the store after a run has closed it.
pub async fn reopen(config: &Config) -> Store {
    Store::open(&config.resolved_db_path())
        .await
        .expect("Failed to reopen store")
}

fn entry(name: &str, idx: Option<u32>, logo: Option<&str>) -> String {
    let href = idx
        .map(|i| format!(" href=\"/ab-7553?cat=x&idx={i}\""))
        .unwrap_or_default();
    let logo = logo
        .map(|src| format!("<div class=\"logo_thumb\"><a><img src=\"{src}\"></a></div>"))
        .unwrap_or_default();
    format!(
        "<div>{logo}<a class=\"link_tit\"{href}><span class=\"AB-LF-common\">{name}</span></a>\
         <div class=\"url\"><a class=\"link_tit\">https://{idx}.agency.test</a></div>\
         <p class=\"desc\">{name} 소개</p></div>",
        idx = idx.unwrap_or(0)
    )
}

fn listing(entries: &[String], next: Option<&str>) -> String {
    let paging = next
        .map(|href| {
            format!(
                "<div class=\"paging\"><a class=\"LF_page_link_current\">1</a>\
                 <a href=\"{href}\">다음</a></div>"
            )
        })
        .unwrap_or_default();
    format!(
        "<html><body><div class=\"conts\"><div class=\"_list\">{}</div>{paging}</div></body></html>",
        entries.concat()
    )
}

const DIRECTORY: &str = r#"<html><body><div id="_LF_agency_dir"><div class="bg_fff fix_1050"><div>
  <div class="category_wrap"><ul>
    <li><a href="/list/general?page=1"><span>종합광고대행사</span><span>2개의 대행사</span></a></li>
    <li><a href="/list/facebook?page=1"><span>페이스북</span><span>2개의 대행사</span></a></li>
    <li><a href="/list/search?page=1"><span>검색광고</span><span>40개의 대행사</span></a></li>
  </ul></div>
</div></div></div></body></html>"#;

/// The fixture directory:
///
/// - 종합광고대행사: one page, 알파 (idx 11, logo at `logo_src`) and 베타 (no idx)
/// - 페이스북: two pages, 감마 (idx 21) then 델타 (idx 22)
/// - 검색광고: listed but never opened by the tests
///
/// Detail pages: 11 and 22 have an intro block, 21 only plain body text.
pub fn fixture_site(logo_src: Option<&str>) -> StaticDriver {
    StaticDriver::default()
        .with_page(&format!("{BASE}/ab-7553"), DIRECTORY)
        .with_page(
            &format!("{BASE}/list/general?page=1"),
            &listing(&[entry("알파", Some(11), logo_src), entry("베타", None, None)], None),
        )
        .with_page(
            &format!("{BASE}/list/facebook?page=1"),
            &listing(&[entry("감마", Some(21), None)], Some("/list/facebook?page=2")),
        )
        .with_page(
            &format!("{BASE}/list/facebook?page=2"),
            &listing(&[entry("델타", Some(22), None)], None),
        )
        .with_page(
            &format!("{BASE}/ab-7554-11"),
            "<html><body><div class=\"intro\">알파는 데이터 기반 광고 대행사입니다.</div></body></html>",
        )
        .with_page(
            &format!("{BASE}/ab-7554-21"),
            "<html><body><h1>감마</h1>\n<p>  소셜   광고 전문 </p></body></html>",
        )
        .with_page(
            &format!("{BASE}/ab-7554-22"),
            "<html><body><div class=\"cont_main\"><div class=\"intro_box\">델타 소개</div></div></body></html>",
        )
}
