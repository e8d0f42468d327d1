//! Crawler endpoint request/response types

use serde::{Deserialize, Serialize};

use crate::domain::crawler::CrawledPage;

#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverUrlsBody {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoverUrlsResponse {
    pub success: bool,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrawlBody {
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlResponse {
    pub success: bool,
    pub results: Vec<CrawledPage>,
}
