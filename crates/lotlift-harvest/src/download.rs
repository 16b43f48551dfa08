//! Photo downloads to a per-listing folder.

use crate::error::{HarvestError, Result};
use lotlift_browser::jittered;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Per-request timeout; listing CDNs occasionally stall on full-size photos
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Outcome of one download batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    /// Photos written to disk
    pub downloaded: usize,
    /// Photos attempted
    pub total: usize,
    /// Per-item failure messages, in batch order
    pub errors: Vec<String>,
}

impl DownloadReport {
    /// Human-readable summary line.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("Downloaded {}/{} photos", self.downloaded, self.total)
    }
}

/// Download each URL into `dir` as `image_NN.<ext>`.
///
/// Individual failures are collected in the report and never abort the
/// batch. Items are spaced by roughly `delay_ms`.
pub async fn download_images(urls: &[String], dir: &Path, delay_ms: u64) -> Result<DownloadReport> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| HarvestError::DownloadDir {
            path: dir.to_path_buf(),
            source,
        })?;

    let client = Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?;

    let mut downloaded = 0;
    let mut errors = Vec::new();
    for (index, url) in urls.iter().enumerate() {
        let target = dir.join(filename_for(index, url));
        match fetch_one(&client, url, &target).await {
            Ok(()) => {
                debug!("saved {url} as {}", target.display());
                downloaded += 1;
            }
            Err(message) => {
                warn!("download failed for {url}: {message}");
                errors.push(format!("image {}: {message}", index + 1));
            }
        }
        tokio::time::sleep(jittered(delay_ms)).await;
    }

    Ok(DownloadReport {
        downloaded,
        total: urls.len(),
        errors,
    })
}

async fn fetch_one(client: &Client, url: &str, target: &Path) -> std::result::Result<(), String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| e.to_string())?
        .error_for_status()
        .map_err(|e| e.to_string())?;
    let bytes = response.bytes().await.map_err(|e| e.to_string())?;
    tokio::fs::write(target, &bytes)
        .await
        .map_err(|e| e.to_string())
}

/// Folder name derived from a listing title: alphanumerics, spaces, and
/// hyphens survive, whitespace runs become underscores.
#[must_use]
pub fn folder_name(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();
    let parts: Vec<&str> = kept.split_whitespace().collect();
    parts.join("_")
}

/// `image_NN.<ext>` with a two-digit 1-based index.
fn filename_for(index: usize, url: &str) -> String {
    format!("image_{:02}.{}", index + 1, extension_for(url))
}

/// File extension taken from the URL path, defaulting to jpg.
fn extension_for(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "jpeg" => "jpeg",
        "png" => "png",
        "webp" => "webp",
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_numbering() {
        assert_eq!(
            filename_for(0, "https://photos.example.com/a.jpg"),
            "image_01.jpg"
        );
        assert_eq!(
            filename_for(9, "https://photos.example.com/b.webp"),
            "image_10.webp"
        );
    }

    #[test]
    fn test_extension_from_path_not_query() {
        assert_eq!(
            extension_for("https://photos.example.com/a.png?fmt=jpeg"),
            "png"
        );
        assert_eq!(extension_for("https://photos.example.com/a.JPEG"), "jpeg");
        assert_eq!(extension_for("https://photos.example.com/photo"), "jpg");
    }

    #[test]
    fn test_folder_name_sanitized() {
        assert_eq!(
            folder_name("2018 Chevrolet Equinox Premier"),
            "2018_Chevrolet_Equinox_Premier"
        );
        assert_eq!(folder_name("Mercedes-Benz C300 (loaded!)"), "Mercedes-Benz_C300_loaded");
        assert_eq!(folder_name("  spaced   out  "), "spaced_out");
    }

    #[test]
    fn test_report_summary() {
        let report = DownloadReport {
            downloaded: 8,
            total: 10,
            errors: vec!["image 3: timed out".to_string(), "image 7: 404".to_string()],
        };
        assert_eq!(report.summary(), "Downloaded 8/10 photos");
    }

    #[tokio::test]
    async fn test_empty_batch_creates_directory() {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let dir = tmp.path().join("2018_Chevrolet_Equinox");
        let report = download_images(&[], &dir, 0).await.expect("download");
        assert_eq!(report.downloaded, 0);
        assert_eq!(report.total, 0);
        assert!(report.errors.is_empty());
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_failures_collected_not_fatal() {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let urls = vec!["not-a-url".to_string()];
        let report = download_images(&urls, tmp.path(), 0).await.expect("download");
        assert_eq!(report.downloaded, 0);
        assert_eq!(report.total, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("image 1:"));
    }
}
