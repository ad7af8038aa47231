use std::time::Duration;

use color_eyre::{eyre::eyre, Result};
use url::Url;

use crate::config::Config;

use super::api_types::ApiResponse;
use super::error::{ApiFailure, FetchError};
use super::types::PageResult;

/// Wall-clock limit for a single page request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Flickr REST API client.
///
/// One method does everything: an empty query fetches the public home feed
/// (`flickr.photos.getRecent`), a non-empty query runs a text search
/// (`flickr.photos.search`). Cancellation is cooperative — the caller drops
/// the returned future (by aborting the task driving it) and no completion
/// is ever delivered.
#[derive(Clone)]
pub struct FlickrClient {
  http: reqwest::Client,
  endpoint: Url,
  api_key: String,
  per_page: u32,
}

impl FlickrClient {
  pub fn new(config: &Config) -> Result<Self> {
    let api_key = Config::get_api_key()?;

    let endpoint = Url::parse(&config.flickr.endpoint)
      .map_err(|e| eyre!("Invalid Flickr endpoint {}: {}", config.flickr.endpoint, e))?;

    let http = reqwest::Client::builder()
      .timeout(REQUEST_TIMEOUT)
      .build()
      .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

    Ok(Self {
      http,
      endpoint,
      api_key,
      per_page: config.flickr.per_page,
    })
  }

  /// Fetch one page of photos for `query` (empty = home feed).
  pub async fn fetch_page(&self, query: &str, page: u32) -> Result<PageResult, FetchError> {
    let method = if query.is_empty() {
      "flickr.photos.getRecent"
    } else {
      "flickr.photos.search"
    };

    tracing::debug!(method, page, "fetching page");

    let response = self
      .http
      .get(self.endpoint.clone())
      .query(&[
        ("method", method),
        ("api_key", self.api_key.as_str()),
        ("format", "json"),
        ("nojsoncallback", "1"),
        ("extras", "url_s,url_m,url_l"),
        ("safe_search", "1"),
        ("text", query),
      ])
      .query(&[("per_page", self.per_page), ("page", page)])
      .send()
      .await
      .map_err(FetchError::from_transport)?;

    let body: ApiResponse = response.json().await.map_err(FetchError::from_transport)?;

    if body.stat != "ok" {
      let message = body.message.unwrap_or_else(|| "unknown error".to_string());
      tracing::warn!(%message, "service rejected request");
      return Err(FetchError::Api(ApiFailure::Rejected { message }));
    }

    let photos = body
      .photos
      .ok_or(FetchError::Api(ApiFailure::Malformed))?;

    Ok(photos.into_page_result())
  }
}
