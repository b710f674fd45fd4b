//! # Boundary Sources
//!
//! The store depends on one collaborator contract: fetch a dataset by
//! logical name and get back bytes, or fail. Three implementations ship
//! with the crate:
//!
//! - [`FileBoundarySource`] — `<root>/<name>.geojson`, then `<root>/<name>.json`.
//! - [`HttpBoundarySource`] — `GET <base_url>/<name>.geojson`.
//! - [`StaticBoundarySource`] — an in-memory map, for embedding and tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::BoundaryError;

/// A byte source for boundary datasets.
///
/// Implementations must be `Send + Sync` so a single source can be shared
/// by the store's load tasks behind an `Arc`.
#[async_trait]
pub trait BoundarySource: Send + Sync {
    /// Fetch the raw bytes of `dataset`.
    async fn fetch(&self, dataset: &str) -> Result<Vec<u8>, BoundaryError>;

    /// Short description for logs (path, URL, ...).
    fn describe(&self) -> String;
}

// ─── File ────────────────────────────────────────────────────────────

/// Reads datasets from a directory.
#[derive(Debug, Clone)]
pub struct FileBoundarySource {
    root: PathBuf,
}

impl FileBoundarySource {
    /// Extensions tried in order.
    pub const EXTENSIONS: [&'static str; 2] = ["geojson", "json"];

    /// Serve datasets from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn candidates(&self, dataset: &str) -> impl Iterator<Item = PathBuf> + '_ {
        let dataset = dataset.to_string();
        Self::EXTENSIONS
            .iter()
            .map(move |ext| self.root.join(format!("{dataset}.{ext}")))
    }
}

#[async_trait]
impl BoundarySource for FileBoundarySource {
    async fn fetch(&self, dataset: &str) -> Result<Vec<u8>, BoundaryError> {
        if dataset.is_empty() || dataset.contains(['/', '\\']) || dataset.contains("..") {
            return Err(BoundaryError::fetch(
                dataset,
                "dataset names must be plain file stems",
            ));
        }

        let mut tried = Vec::new();
        for path in self.candidates(dataset) {
            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    debug!(dataset, path = %path.display(), bytes = bytes.len(), "Read boundary dataset");
                    return Ok(bytes);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tried.push(path.display().to_string());
                }
                Err(e) => {
                    return Err(BoundaryError::fetch(
                        dataset,
                        format!("reading {}: {e}", path.display()),
                    ));
                }
            }
        }
        Err(BoundaryError::fetch(
            dataset,
            format!("no dataset file found (tried {})", tried.join(", ")),
        ))
    }

    fn describe(&self) -> String {
        format!("file:{}", self.root.display())
    }
}

// ─── HTTP ────────────────────────────────────────────────────────────

/// Fetches datasets over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpBoundarySource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBoundarySource {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Serve datasets from `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, BoundaryError> {
        Self::with_timeout(base_url, Self::DEFAULT_TIMEOUT)
    }

    /// Serve datasets from `base_url` with a custom timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BoundaryError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BoundaryError::fetch("*", format!("building HTTP client: {e}")))?;
        Ok(Self { base_url, client })
    }

    /// The URL a dataset is fetched from.
    pub fn url_for(&self, dataset: &str) -> String {
        format!("{}/{dataset}.geojson", self.base_url)
    }
}

#[async_trait]
impl BoundarySource for HttpBoundarySource {
    async fn fetch(&self, dataset: &str) -> Result<Vec<u8>, BoundaryError> {
        let url = self.url_for(dataset);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BoundaryError::fetch(dataset, format!("GET {url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BoundaryError::fetch(
                dataset,
                format!("GET {url} returned {status}"),
            ));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| BoundaryError::fetch(dataset, format!("reading body of {url}: {e}")))?;
        debug!(dataset, url = %url, bytes = bytes.len(), "Fetched boundary dataset");
        Ok(bytes.to_vec())
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

// ─── Static ──────────────────────────────────────────────────────────

/// Serves datasets from memory.
#[derive(Debug, Clone, Default)]
pub struct StaticBoundarySource {
    datasets: HashMap<String, Vec<u8>>,
}

impl StaticBoundarySource {
    /// An empty source; every fetch fails until datasets are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_dataset(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }

    /// Add or replace a dataset.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.datasets.insert(name.into(), bytes.into());
    }
}

#[async_trait]
impl BoundarySource for StaticBoundarySource {
    async fn fetch(&self, dataset: &str) -> Result<Vec<u8>, BoundaryError> {
        self.datasets
            .get(dataset)
            .cloned()
            .ok_or_else(|| BoundaryError::fetch(dataset, "dataset not registered"))
    }

    fn describe(&self) -> String {
        format!("static:{} datasets", self.datasets.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[tokio::test]
    async fn test_static_source_roundtrip() {
        let source = StaticBoundarySource::new().with_dataset("national", b"{}".to_vec());
        assert_eq!(source.fetch("national").await.unwrap(), b"{}");
        let err = source.fetch("regions").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Fetch);
        assert_eq!(err.dataset(), "regions");
    }

    #[tokio::test]
    async fn test_file_source_prefers_geojson_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("national.json"), b"json").unwrap();
        std::fs::write(dir.path().join("national.geojson"), b"geojson").unwrap();
        std::fs::write(dir.path().join("regions.json"), b"regions").unwrap();

        let source = FileBoundarySource::new(dir.path());
        assert_eq!(source.fetch("national").await.unwrap(), b"geojson");
        assert_eq!(source.fetch("regions").await.unwrap(), b"regions");
    }

    #[tokio::test]
    async fn test_file_source_missing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileBoundarySource::new(dir.path());
        let err = source.fetch("national").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Fetch);
        assert!(err.to_string().contains("no dataset file found"));
    }

    #[tokio::test]
    async fn test_file_source_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileBoundarySource::new(dir.path());
        assert!(source.fetch("../etc/passwd").await.is_err());
        assert!(source.fetch("a/b").await.is_err());
        assert!(source.fetch("").await.is_err());
    }

    #[test]
    fn test_http_url_for_trims_trailing_slash() {
        let source = HttpBoundarySource::new("https://example.org/boundaries/").unwrap();
        assert_eq!(
            source.url_for("national"),
            "https://example.org/boundaries/national.geojson"
        );
    }
}
