//! SearxNG search backend.
//!
//! Self-hosted metasearch: one GET per search against `{base}/search` with
//! `format=json`, hits in the response's `results` array. SearxNG does not
//! rank hits with an explicit position field, so positions are assigned from
//! result order.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use searchrelay_shared::{
    Message, PageResult, RagSettings, Result, SearchRelayError, UpdateSink, WebSearchUpdate,
};

use crate::query::build_search_query;
use crate::{ProviderSearch, SearchProvider};

/// User-Agent string for search requests.
const USER_AGENT: &str = concat!("searchrelay/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Search backend talking to a self-hosted SearxNG instance.
pub struct SearxngProvider {
    base_url: String,
    client: Client,
}

impl SearxngProvider {
    /// Create a provider with its own HTTP client.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SearchRelayError::Network(format!("failed to build HTTP client: {e}")))?;

        let base_url: String = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// Response body of a SearxNG `/search?format=json` call.
#[derive(Debug, Deserialize)]
struct SearxngResponse {
    #[serde(default)]
    results: Vec<SearxngHit>,
}

/// One SearxNG hit. `content` is the snippet and is absent for some engines.
#[derive(Debug, Deserialize)]
struct SearxngHit {
    title: String,
    url: String,
    #[serde(default)]
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// SearchProvider impl
// ---------------------------------------------------------------------------

#[async_trait]
impl SearchProvider for SearxngProvider {
    fn name(&self) -> &str {
        "searxng"
    }

    #[instrument(skip_all, fields(backend = "searxng"))]
    async fn search(
        &self,
        messages: &[Message],
        rag_settings: Option<&RagSettings>,
        query: Option<&str>,
        updates: &UpdateSink,
    ) -> Result<ProviderSearch> {
        let search_query = build_search_query(messages, rag_settings, query)?;
        updates
            .emit(WebSearchUpdate::general_with_args(
                "Searching searxng",
                vec![search_query.clone()],
            ))
            .await?;

        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", search_query.as_str()), ("format", "json")])
            .send()
            .await
            .map_err(|e| SearchRelayError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchRelayError::Network(format!("{url}: HTTP {status}")));
        }

        let body: SearxngResponse = response
            .json()
            .await
            .map_err(|e| SearchRelayError::provider(format!("searxng: invalid response: {e}")))?;

        let pages: Vec<PageResult> = body
            .results
            .into_iter()
            .enumerate()
            .map(|(idx, hit)| PageResult {
                title: hit.title,
                link: hit.url,
                snippet: hit.content.unwrap_or_default(),
                position: idx + 1,
            })
            .collect();
        debug!(query = %search_query, hits = pages.len(), "searxng search completed");

        Ok(ProviderSearch {
            search_query,
            pages,
        })
    }
}
