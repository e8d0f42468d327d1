//! HTTP content fetcher
//!
//! Discovers same-site links from a landing page and crawls pages with
//! bounded concurrency. A page that fails to fetch becomes a failed entry in
//! the result, never an error for the whole batch.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::domain::crawler::{ContentFetcher, CrawledPage};
use crate::domain::DomainError;

const MAX_DISCOVERED_URLS: usize = 50;
const MAX_CONTENT_CHARS: usize = 20_000;
const CRAWL_CONCURRENCY: usize = 4;

static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static TEXT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p, h1, h2, h3, h4, h5, h6, li, td, blockquote").unwrap());

#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            user_agent: "botflow-crawler/1.0".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct HttpContentFetcher {
    client: reqwest::Client,
}

impl HttpContentFetcher {
    pub fn new(config: CrawlerConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| DomainError::internal(format!("Failed to build crawler client: {}", e)))?;

        Ok(Self { client })
    }

    async fn fetch_body(&self, url: &str) -> Result<String, DomainError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::provider("crawler", format!("Fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(DomainError::provider(
                "crawler",
                format!("HTTP {} from {}", response.status(), url),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| DomainError::provider("crawler", format!("Failed to read body: {}", e)))
    }

    async fn fetch_page(&self, url: &str) -> CrawledPage {
        match self.fetch_body(url).await {
            Ok(body) => {
                let (title, content) = extract_page_content(&body);
                let title = if title.is_empty() {
                    url.to_string()
                } else {
                    title
                };
                CrawledPage::ok(url, title, content)
            }
            Err(e) => {
                debug!(url = %url, error = %e, "Page crawl failed");
                CrawledPage::failed(url, e.to_string())
            }
        }
    }
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn discover_urls(&self, url: &str) -> Result<Vec<String>, DomainError> {
        let base = Url::parse(url)
            .map_err(|e| DomainError::validation(format!("Invalid URL '{}': {}", url, e)))?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(DomainError::validation(format!(
                "Unsupported URL scheme '{}'",
                base.scheme()
            )));
        }

        let body = self.fetch_body(base.as_str()).await?;
        Ok(extract_same_site_links(&base, &body))
    }

    async fn crawl(&self, urls: &[String]) -> Result<Vec<CrawledPage>, DomainError> {
        let fetches: Vec<_> = urls.iter().map(|url| self.fetch_page(url)).collect();
        let pages = stream::iter(fetches)
            .buffered(CRAWL_CONCURRENCY)
            .collect::<Vec<_>>()
            .await;

        Ok(pages)
    }
}

/// Resolves anchors against the base URL, keeping only same-host pages.
/// The landing page itself is always first.
fn extract_same_site_links(base: &Url, body: &str) -> Vec<String> {
    let html = Html::parse_document(body);
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    let mut landing = base.clone();
    landing.set_fragment(None);
    seen.insert(landing.to_string());
    urls.push(landing.to_string());

    for anchor in html.select(&LINK_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        let Ok(mut resolved) = base.join(href) else {
            continue;
        };
        resolved.set_fragment(None);

        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        if resolved.host_str() != base.host_str() {
            continue;
        }

        if seen.insert(resolved.to_string()) {
            urls.push(resolved.to_string());
        }

        if urls.len() >= MAX_DISCOVERED_URLS {
            break;
        }
    }

    urls
}

/// Pulls the title and readable text out of an HTML document
fn extract_page_content(body: &str) -> (String, String) {
    let html = Html::parse_document(body);

    let title = html
        .select(&TITLE_SELECTOR)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let mut content = String::new();
    for element in html.select(&TEXT_SELECTOR) {
        let text = element.text().collect::<String>();
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            continue;
        }

        if !content.is_empty() {
            content.push('\n');
        }
        content.push_str(&text);

        if content.len() >= MAX_CONTENT_CHARS {
            content.truncate(MAX_CONTENT_CHARS);
            break;
        }
    }

    (title, content)
}
