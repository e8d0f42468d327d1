//! Content-fetching collaborator surface
//!
//! The crawler is external to the core: the API only needs something that
//! turns URLs into `{url, title, content}` tuples, best effort. The HTTP
//! implementation lives in `infrastructure::crawler`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// One fetched page. `error` is set (and `content` empty) when that URL
/// failed; a failed URL never fails the whole crawl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawledPage {
    pub url: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CrawledPage {
    pub fn ok(url: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            content: content.into(),
            error: None,
        }
    }

    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            content: String::new(),
            error: Some(error.into()),
        }
    }
}

/// Fetches site content for workflow context harvesting
#[async_trait]
pub trait ContentFetcher: Send + Sync + std::fmt::Debug {
    /// Lists same-site URLs discovered from a landing page
    async fn discover_urls(&self, url: &str) -> Result<Vec<String>, DomainError>;

    /// Fetches the given URLs concurrently, one result per input URL
    async fn crawl(&self, urls: &[String]) -> Result<Vec<CrawledPage>, DomainError>;
}
