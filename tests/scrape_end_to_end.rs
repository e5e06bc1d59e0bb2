// Full sessions against the fixture directory site.

#[path = "helpers.rs"]
mod helpers;

use std::sync::Arc;

use agency_directory::{run_scrape_with, SessionStatus};
use helpers::{fixture_site, reopen, resources, test_config, BASE};
use httptest::{matchers::*, responders::*, Expectation, Server};
use tempfile::TempDir;

#[tokio::test]
async fn test_single_category_session_stores_agencies_details_and_csv() {
    let logo_server = Server::run();
    logo_server.expect(
        Expectation::matching(request::method_path("GET", "/alpha.png"))
            .times(1)
            .respond_with(status_code(200).body(vec![0x89, b'P', b'N', b'G'])),
    );
    let logo_url = logo_server.url("/alpha.png").to_string();

    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(dir.path(), &["종합광고대행사"], 0);
    let driver = Arc::new(fixture_site(Some(&logo_url)));

    let report = run_scrape_with(&config, resources(&config, driver.clone()).await)
        .await
        .expect("Run should produce a report");

    assert!(report.succeeded(), "failure: {:?}", report.failure);
    let session = &report.session;
    assert_eq!(session.status, SessionStatus::Completed);
    assert!(session.ended_at.is_some());
    assert_eq!(session.categories_total, 1);
    assert_eq!(session.categories_scraped, 1);
    assert_eq!(session.agencies_total, 2);
    assert_eq!(session.agencies_scraped, 2);
    assert_eq!(session.details_total, 1);
    assert_eq!(session.details_scraped, 1);

    let export = report.export.expect("Completed run exports");
    assert_eq!(export.categories, 3);
    assert_eq!(export.agencies, 2);
    assert_eq!(export.sessions, 1);
    for file in ["categories.csv", "agencies.csv", "scraping_status.csv"] {
        assert!(dir.path().join(file).exists(), "{file} missing");
    }

    assert!(driver.is_closed(), "Browser session should be released");
    assert!(!driver.visited(&format!("{BASE}/list/facebook?page=1")));

    let store = reopen(&config).await;
    let agencies = store.all_agencies().await.expect("agencies");
    let alpha = agencies.iter().find(|a| a.name == "알파").expect("알파 stored");
    assert_eq!(alpha.idx.as_deref(), Some("11"));
    assert_eq!(alpha.detail_url.as_deref(), Some("https://site.test/ab-7554-11"));
    assert!(alpha.detailed_scraped);
    assert_eq!(
        alpha.detail_description.as_deref(),
        Some("알파는 데이터 기반 광고 대행사입니다.")
    );
    let logo_path = alpha.local_logo_path.as_deref().expect("logo saved");
    assert!(std::path::Path::new(logo_path).exists());
    assert!(logo_path.ends_with("종합광고대행사_알파.png"));

    let beta = agencies.iter().find(|a| a.name == "베타").expect("베타 stored");
    assert_eq!(beta.idx, None);
    assert_eq!(beta.detail_url, None);
    assert!(!beta.detailed_scraped);
    assert_eq!(beta.description.as_deref(), Some("베타 소개"));
    store.close().await;
}

#[tokio::test]
async fn test_pagination_and_body_text_fallback() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(dir.path(), &["페이스북"], 0);
    let driver = Arc::new(fixture_site(None));

    let report = run_scrape_with(&config, resources(&config, driver.clone()).await)
        .await
        .expect("Run should produce a report");

    assert!(report.succeeded(), "failure: {:?}", report.failure);
    assert_eq!(report.session.agencies_scraped, 2);
    assert_eq!(report.session.details_scraped, 2);
    assert!(driver.visited(&format!("{BASE}/list/facebook?page=2")));

    let store = reopen(&config).await;
    let agencies = store.all_agencies().await.expect("agencies");
    let gamma = agencies.iter().find(|a| a.name == "감마").expect("감마 stored");
    assert_eq!(gamma.detail_description.as_deref(), Some("감마 소셜 광고 전문"));
    let delta = agencies.iter().find(|a| a.name == "델타").expect("델타 stored");
    assert_eq!(delta.detail_description.as_deref(), Some("델타 소개"));
    store.close().await;
}

#[tokio::test]
async fn test_cap_limits_agencies_and_skips_later_pages() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(dir.path(), &["페이스북"], 1);
    let driver = Arc::new(fixture_site(None));

    let report = run_scrape_with(&config, resources(&config, driver.clone()).await)
        .await
        .expect("Run should produce a report");

    assert!(report.succeeded());
    assert_eq!(report.session.agencies_scraped, 1);
    assert!(!driver.visited(&format!("{BASE}/list/facebook?page=2")));

    let store = reopen(&config).await;
    assert_eq!(store.count_agencies().await.expect("count"), 1);
    let categories = store.all_categories().await.expect("categories");
    let facebook = categories.iter().find(|c| c.name == "페이스북").expect("stored");
    assert!(facebook.scraped);
    store.close().await;
}

#[tokio::test]
async fn test_unreachable_directory_fails_session_and_releases_browser() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(dir.path(), &["종합광고대행사"], 0);
    let driver = Arc::new(helpers::StaticDriver::default());

    let report = run_scrape_with(&config, resources(&config, driver.clone()).await)
        .await
        .expect("Run should produce a report");

    assert!(!report.succeeded());
    assert_eq!(report.session.status, SessionStatus::Failed);
    assert!(report.session.ended_at.is_some());
    assert!(report.failure.is_some());
    assert!(report.export.is_none());
    assert!(driver.is_closed());

    let store = reopen(&config).await;
    let sessions = store.sessions().await.expect("sessions");
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].status, SessionStatus::Failed);
    store.close().await;
}

#[tokio::test]
async fn test_empty_selection_still_completes() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(dir.path(), &["존재하지않는분류"], 0);
    let driver = Arc::new(fixture_site(None));

    let report = run_scrape_with(&config, resources(&config, driver.clone()).await)
        .await
        .expect("Run should produce a report");

    assert!(report.succeeded());
    assert_eq!(report.session.categories_total, 0);
    assert_eq!(report.session.agencies_scraped, 0);
    assert_eq!(report.export.map(|e| e.categories), Some(3));
}

#[tokio::test]
async fn test_status_csv_shows_the_finished_session() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(dir.path(), &["종합광고대행사"], 0);
    let driver = Arc::new(fixture_site(None));

    let report = run_scrape_with(&config, resources(&config, driver).await)
        .await
        .expect("Run should produce a report");
    assert!(report.succeeded());

    let bytes = std::fs::read(dir.path().join("scraping_status.csv")).expect("status csv");
    let mut reader = csv::Reader::from_reader(&bytes[3..]);
    let headers = reader.headers().expect("headers").clone();
    let column = |name: &str| headers.iter().position(|h| h == name).expect("column");
    let (status, ended) = (column("status"), column("session_end"));

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.expect("record")).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][status], "completed");
    assert!(!rows[0][ended].is_empty(), "end time missing");
}
