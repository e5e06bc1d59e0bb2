//! Agency logo download.
//!
//! Logos are saved under a deterministic name, `<category>_<agency>.png`. A
//! file that already exists under that name is never fetched again.

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::config::LOGO_FETCH_TIMEOUT_SECS;
use crate::utils::sanitize::logo_file_name;

/// Resolves a possibly-relative logo `src` against the site origin.
fn resolve_logo_url(src: &str, base_url: &str) -> Option<String> {
    if src.starts_with("http://") || src.starts_with("https://") {
        return Some(src.to_string());
    }

    // Protocol-relative URL
    if let Some(rest) = src.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }

    url::Url::parse(base_url)
        .ok()
        .and_then(|base| base.join(src).ok())
        .map(String::from)
}

/// Streams the response body for `url` into `dest`.
///
/// Returns `Ok(false)` when the server answered with a non-success status.
/// The body goes to a `.part` file first, so an interrupted download never
/// leaves a file under the final name.
async fn fetch_to_file(client: &reqwest::Client, url: &str, dest: &Path) -> anyhow::Result<bool> {
    let response = client
        .get(url)
        .timeout(Duration::from_secs(LOGO_FETCH_TIMEOUT_SECS))
        .send()
        .await?;

    if !response.status().is_success() {
        log::warn!("Failed to download logo: HTTP status {} for {url}", response.status());
        return Ok(false);
    }

    let partial = dest.with_extension("png.part");
    let mut file = tokio::fs::File::create(&partial).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;
    drop(file);
    tokio::fs::rename(&partial, dest).await?;
    Ok(true)
}

/// Downloads an agency logo into `logos_dir`, unless it is already there.
///
/// # Arguments
///
/// * `client` - HTTP client used for the download
/// * `logo_src` - Logo `src` as found on the listing page
/// * `base_url` - Origin that a relative `src` is resolved against
/// * `logos_dir` - Target directory
/// * `category_name`, `agency_name` - Make up the file name
///
/// # Returns
///
/// The local path of the logo, or `None` when nothing could be saved.
/// Failures are logged, never returned: a missing logo does not affect the
/// rest of the entry.
pub async fn download_logo(
    client: &reqwest::Client,
    logo_src: &str,
    base_url: &str,
    logos_dir: &Path,
    category_name: &str,
    agency_name: &str,
) -> Option<String> {
    let path = logos_dir.join(logo_file_name(category_name, agency_name));
    let path_str = path.to_string_lossy().to_string();

    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        log::debug!("Logo for {agency_name} already exists at {path_str}");
        return Some(path_str);
    }

    let Some(url) = resolve_logo_url(logo_src, base_url) else {
        log::warn!("Cannot resolve logo URL {logo_src:?} for {agency_name}");
        return None;
    };

    log::debug!("Downloading logo for {agency_name} from {url}");
    match fetch_to_file(client, &url, &path).await {
        Ok(true) => {
            log::info!("Logo saved to {path_str}");
            Some(path_str)
        }
        Ok(false) => None,
        Err(e) => {
            log::warn!("Error downloading logo for {agency_name}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{matchers::*, responders::*, Expectation, Server};
    use tempfile::TempDir;

    #[test]
    fn test_resolve_logo_url() {
        let base = "https://www.i-boss.co.kr";
        assert_eq!(
            resolve_logo_url("/upload/a.png", base).as_deref(),
            Some("https://www.i-boss.co.kr/upload/a.png")
        );
        assert_eq!(
            resolve_logo_url("//cdn.example/a.png", base).as_deref(),
            Some("https://cdn.example/a.png")
        );
        assert_eq!(
            resolve_logo_url("http://cdn.example/a.png", base).as_deref(),
            Some("http://cdn.example/a.png")
        );
    }

    #[tokio::test]
    async fn test_second_download_reuses_existing_file() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/logo.png"))
                .times(1)
                .respond_with(status_code(200).body("PNGDATA")),
        );
        let dir = TempDir::new().expect("temp dir");
        let client = reqwest::Client::new();
        let src = server.url("/logo.png").to_string();

        let first = download_logo(&client, &src, "https://unused.test", dir.path(), "검색/광고", "알파")
            .await
            .expect("first download");
        let second = download_logo(&client, &src, "https://unused.test", dir.path(), "검색/광고", "알파")
            .await
            .expect("existing file");

        assert_eq!(first, second);
        assert!(first.ends_with("검색_광고_알파.png"));
        let bytes = std::fs::read(&first).expect("logo file");
        assert_eq!(bytes, b"PNGDATA");
    }

    #[tokio::test]
    async fn test_relative_src_resolves_against_base() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/upload/b.png"))
                .respond_with(status_code(200).body("B")),
        );
        let dir = TempDir::new().expect("temp dir");
        let base = server.url("/").to_string();

        let path = download_logo(&reqwest::Client::new(), "/upload/b.png", &base, dir.path(), "A", "B")
            .await
            .expect("download");
        assert!(Path::new(&path).exists());
    }

    #[tokio::test]
    async fn test_non_success_status_saves_nothing() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/missing.png"))
                .respond_with(status_code(404)),
        );
        let dir = TempDir::new().expect("temp dir");
        let src = server.url("/missing.png").to_string();

        let result = download_logo(&reqwest::Client::new(), &src, "https://unused.test", dir.path(), "A", "B").await;
        assert!(result.is_none());
        assert!(!dir.path().join("A_B.png").exists());
    }
}
