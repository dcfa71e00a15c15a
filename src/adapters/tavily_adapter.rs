//! Tavily web search adapter for recent news snippets.

use crate::adapters::http;
use crate::domain::error::ProviderError;
use crate::domain::news::NewsItem;
use crate::ports::news_port::NewsPort;
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "tavily";
const BASE_URL: &str = "https://api.tavily.com";

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: String,
    max_results: usize,
    topic: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

pub struct TavilyAdapter {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

impl TavilyAdapter {
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured {
                provider: PROVIDER.to_string(),
            });
        }
        Ok(Self {
            client: http::build_client(PROVIDER, timeout_secs)?,
            api_key: api_key.trim().to_string(),
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

pub fn search_query(symbol: &str) -> String {
    format!("{symbol} stock news analysis current trends")
}

fn into_items(resp: SearchResponse, limit: usize) -> Vec<NewsItem> {
    resp.results
        .into_iter()
        .filter_map(|hit| {
            let content = hit.content?;
            Some(NewsItem {
                content,
                title: hit.title,
                url: hit.url,
            })
        })
        .filter(|item| item.has_content())
        .take(limit)
        .collect()
}

impl NewsPort for TavilyAdapter {
    fn search(&self, symbol: &str, limit: usize) -> Result<Vec<NewsItem>, ProviderError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let request = SearchRequest {
            query: search_query(symbol),
            max_results: limit,
            topic: "news",
        };

        let resp = self
            .client
            .post(format!("{}/search", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| http::classify(PROVIDER, symbol, &e))?;
        let resp = http::check_status(PROVIDER, symbol, resp)?;

        let body: SearchResponse = resp
            .json()
            .map_err(|e| ProviderError::malformed(PROVIDER, e.to_string()))?;
        let items = into_items(body, limit);
        tracing::debug!(symbol, count = items.len(), "tavily results");
        Ok(items)
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

/// Stand-in used when no search key is configured: always returns no news.
pub struct NoNewsAdapter;

impl NewsPort for NoNewsAdapter {
    fn search(&self, _symbol: &str, _limit: usize) -> Result<Vec<NewsItem>, ProviderError> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "none"
    }
}
