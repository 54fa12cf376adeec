use anyhow::Result;
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use std::time::Duration;
use thiserror::Error;

use crate::models::SearchResponse;

pub const DEFAULT_API_BASE: &str = "https://hn.algolia.com/api/v1";
const API_SEARCH: &str = "/search";
const PARAM_SEARCH: &str = "query";
const PARAM_PAGE: &str = "page";

/// Why a fetch failed. Callers only ever show "fetch failed"; the variants
/// exist so the log says which part broke.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("server responded with {0}")]
    Status(StatusCode),
    #[error("malformed response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Anything that can turn a search URL into a page of results.
pub trait StorySource: Send + Sync {
    fn fetch(&self, url: &str) -> Result<SearchResponse, FetchError>;
}

pub fn search_url(api_base: &str, search_term: &str, page: usize) -> String {
    format!(
        "{}{}?{}={}&{}={}",
        api_base.trim_end_matches('/'),
        API_SEARCH,
        PARAM_SEARCH,
        urlencoding::encode(search_term),
        PARAM_PAGE,
        page
    )
}

/// Pulls the (decoded) search term back out of a URL built by [`search_url`].
pub fn extract_search_term(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == PARAM_SEARCH)
        .map(|(_, value)| value.into_owned())
}

pub struct HackerNewsClient {
    client: Client,
}

impl HackerNewsClient {
    /// `timeout` of `None` means requests wait as long as the server takes.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hacker_stories/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

impl StorySource for HackerNewsClient {
    fn fetch(&self, url: &str) -> Result<SearchResponse, FetchError> {
        let response = self.client.get(url).send().map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.json::<SearchResponse>().map_err(FetchError::Decode)?;
        log::debug!("fetched {} hits (page {}) from {}", body.hits.len(), body.page, url);
        Ok(body)
    }
}
