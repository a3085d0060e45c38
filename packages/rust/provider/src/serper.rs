//! Serper.dev search backend.
//!
//! Hosted Google SERP API: one POST per search with the API key in the
//! `X-API-KEY` header, ranked hits in the response's `organic` array.

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

/// Search backend talking to the Serper.dev API.
pub struct SerperProvider {
    endpoint: String,
    api_key: String,
    requested_results: usize,
    client: Client,
}

impl SerperProvider {
    /// Create a provider with its own HTTP client.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
        requested_results: usize,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SearchRelayError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            requested_results,
            client,
        })
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// Response body of a Serper `/search` call. Fields we never read are ignored.
#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperHit>,
}

/// One organic hit. `snippet` is missing for some result types (e.g. pure
/// sitelink entries), so it maps to an empty string.
#[derive(Debug, Deserialize)]
struct SerperHit {
    title: String,
    link: String,
    #[serde(default)]
    snippet: Option<String>,
    position: usize,
}

impl From<SerperHit> for PageResult {
    fn from(hit: SerperHit) -> Self {
        Self {
            title: hit.title,
            link: hit.link,
            snippet: hit.snippet.unwrap_or_default(),
            position: hit.position,
        }
    }
}

// ---------------------------------------------------------------------------
// SearchProvider impl
// ---------------------------------------------------------------------------

#[async_trait]
impl SearchProvider for SerperProvider {
    fn name(&self) -> &str {
        "serper"
    }

    #[instrument(skip_all, fields(backend = "serper"))]
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
                "Searching serper",
                vec![search_query.clone()],
            ))
            .await?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&serde_json::json!({
                "q": search_query,
                "num": self.requested_results,
            }))
            .send()
            .await
            .map_err(|e| SearchRelayError::Network(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchRelayError::Network(format!(
                "{}: HTTP {status}",
                self.endpoint
            )));
        }

        let body: SerperResponse = response
            .json()
            .await
            .map_err(|e| SearchRelayError::provider(format!("serper: invalid response: {e}")))?;

        let pages: Vec<PageResult> = body.organic.into_iter().map(PageResult::from).collect();
        debug!(query = %search_query, hits = pages.len(), "serper search completed");

        Ok(ProviderSearch {
            search_query,
            pages,
        })
    }
}
