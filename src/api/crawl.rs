//! Crawler endpoints for workflow-context harvesting

use axum::{extract::State, Json as ResponseJson};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::crawl::{CrawlBody, CrawlResponse, DiscoverUrlsBody, DiscoverUrlsResponse};
use crate::api::types::{ApiError, Json};

const MAX_CRAWL_BATCH: usize = 20;

/// `POST /api/discover-urls` - same-site links from a landing page
pub async fn discover_urls(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    Json(body): Json<DiscoverUrlsBody>,
) -> Result<ResponseJson<DiscoverUrlsResponse>, ApiError> {
    let urls = state.content_fetcher.discover_urls(&body.url).await?;

    Ok(ResponseJson(DiscoverUrlsResponse {
        success: true,
        urls,
    }))
}

/// `POST /api/crawl` - fetch a batch of pages, best effort per URL
pub async fn crawl(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    Json(body): Json<CrawlBody>,
) -> Result<ResponseJson<CrawlResponse>, ApiError> {
    if body.urls.is_empty() {
        return Err(ApiError::bad_request("No URLs to crawl"));
    }
    if body.urls.len() > MAX_CRAWL_BATCH {
        return Err(ApiError::bad_request(format!(
            "At most {} URLs per crawl request",
            MAX_CRAWL_BATCH
        )));
    }

    let results = state.content_fetcher.crawl(&body.urls).await?;

    Ok(ResponseJson(CrawlResponse {
        success: true,
        results,
    }))
}
