//! Template archive retrieval from a remote URL or a local directory
//!
//! - Remote: one HTTP GET, body buffered in memory and shared by both extractions
//! - Local: the directory stands in for the archive's wrapper directory

use crate::product::ProductConfig;
use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// Template source - either remote archive URL or local directory
#[derive(Debug, Clone)]
pub enum ArchiveSource {
    Remote(Url),
    Local(PathBuf),
}

impl ArchiveSource {
    /// Create a remote source from a product config, honoring the env override
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let url_str = std::env::var(config.archive_url_env())
            .unwrap_or_else(|_| config.default_archive_url().to_string());
        Self::remote(&url_str)
    }

    pub fn remote(url_str: &str) -> Result<Self> {
        let url =
            Url::parse(url_str).with_context(|| format!("Invalid archive URL: {}", url_str))?;
        Ok(Self::Remote(url))
    }

    /// Create a local template source from a path
    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }
}

impl fmt::Display for ArchiveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveSource::Remote(url) => write!(f, "{}", url),
            ArchiveSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// What the fetcher hands to the extractor
#[derive(Debug, Clone)]
pub enum FetchedTemplate {
    /// Complete archive bytes, shareable across extraction tasks
    Archive(Arc<Vec<u8>>),
    /// Template root directory
    Directory(PathBuf),
}

/// Archive fetcher - retrieves the template from remote or local sources
pub struct ArchiveFetcher {
    source: ArchiveSource,
    client: reqwest::Client,
}

impl ArchiveFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(source: ArchiveSource, user_agent: &str) -> Self {
        Self {
            source,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Create a fetcher from a product config
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let source = ArchiveSource::from_config(config)?;
        Ok(Self::new(source, config.user_agent()))
    }

    /// Create a fetcher for a local template directory
    pub fn from_local(path: PathBuf, user_agent: &str) -> Self {
        Self::new(ArchiveSource::local(path), user_agent)
    }

    /// Retrieve the template. Any failure is terminal; there is no retry.
    pub async fn fetch(&self) -> Result<FetchedTemplate> {
        match &self.source {
            ArchiveSource::Remote(url) => {
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .with_context(|| format!("Failed to download template archive from {}", url))?;

                if !response.status().is_success() {
                    anyhow::bail!(
                        "Failed to download template archive from {}: HTTP {}",
                        url,
                        response.status()
                    );
                }

                let bytes = response
                    .bytes()
                    .await
                    .with_context(|| format!("Failed to read template archive from {}", url))?;
                Ok(FetchedTemplate::Archive(Arc::new(bytes.to_vec())))
            }
            ArchiveSource::Local(path) => {
                if !path.is_dir() {
                    anyhow::bail!("Template directory not found: {}", path.display());
                }
                Ok(FetchedTemplate::Directory(path.clone()))
            }
        }
    }

    /// Get the template source
    pub fn source(&self) -> &ArchiveSource {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_rejects_invalid_url() {
        assert!(ArchiveSource::remote("not a url").is_err());
    }

    #[test]
    fn test_remote_accepts_codeload_url() {
        let source = ArchiveSource::remote(
            "https://codeload.github.com/ahmetbicer/create-react-native-new-arch-files/tar.gz/master",
        )
        .unwrap();
        assert!(matches!(source, ArchiveSource::Remote(u) if u.host_str() == Some("codeload.github.com")));
    }

    #[test]
    fn test_source_describes_where_the_template_comes_from() {
        let remote = ArchiveFetcher::new(
            ArchiveSource::remote("https://example.com/files.tar.gz").unwrap(),
            "test",
        );
        assert_eq!(remote.source().to_string(), "https://example.com/files.tar.gz");

        let local = ArchiveFetcher::from_local(PathBuf::from("template"), "test");
        assert!(matches!(local.source(), ArchiveSource::Local(p) if p == &PathBuf::from("template")));
        assert_eq!(local.source().to_string(), "template");
    }

    #[tokio::test]
    async fn test_local_missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = ArchiveFetcher::from_local(dir.path().join("missing"), "test");
        let err = fetcher.fetch().await.unwrap_err();
        assert!(err.to_string().contains("Template directory not found"));
    }

    #[tokio::test]
    async fn test_local_directory_is_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = ArchiveFetcher::from_local(dir.path().to_path_buf(), "test");
        match fetcher.fetch().await.unwrap() {
            FetchedTemplate::Directory(path) => assert_eq!(path, dir.path()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fatal() {
        let source = ArchiveSource::remote("http://127.0.0.1:9/archive.tar.gz").unwrap();
        let fetcher = ArchiveFetcher::new(source, "test");
        assert!(fetcher.fetch().await.is_err());
    }
}
