//! Search backends and the provider trait for SearchRelay.
//!
//! This crate provides:
//! - [`SearchProvider`] — the backend trait the pipeline drives
//! - [`SerperProvider`] / [`SearxngProvider`] — hosted and self-hosted backends
//! - [`StaticProvider`] — canned results for tests and offline runs
//! - [`provider_from_config`] — picks a backend from application config

mod query;
pub mod searxng;
pub mod serper;

use std::sync::Arc;

use async_trait::async_trait;

use searchrelay_shared::{
    Message, PageResult, ProviderConfig, RagSettings, Result, SearchRelayError, UpdateSink,
};

pub use query::build_search_query;
pub use searxng::SearxngProvider;
pub use serper::SerperProvider;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Final value of one provider search: the query actually sent and the
/// ranked hits it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSearch {
    /// Query string as sent to the backend.
    pub search_query: String,
    /// Raw hits in the backend's ranking order.
    pub pages: Vec<PageResult>,
}

/// A search backend driven by the pipeline.
///
/// Implementations emit their own progress into `updates` before returning,
/// so the caller sees one flat ordered stream across provider and pipeline.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short backend name for progress updates and tracing.
    fn name(&self) -> &str;

    /// Run one search for the given conversation state.
    async fn search(
        &self,
        messages: &[Message],
        rag_settings: Option<&RagSettings>,
        query: Option<&str>,
        updates: &UpdateSink,
    ) -> Result<ProviderSearch>;
}

impl std::fmt::Debug for dyn SearchProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchProvider")
            .field("name", &self.name())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Static provider
// ---------------------------------------------------------------------------

/// Provider returning a fixed page list. Useful for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    pages: Vec<PageResult>,
}

impl StaticProvider {
    /// Create a provider that always returns `pages`.
    pub fn new(pages: Vec<PageResult>) -> Self {
        Self { pages }
    }
}

#[async_trait]
impl SearchProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn search(
        &self,
        messages: &[Message],
        rag_settings: Option<&RagSettings>,
        query: Option<&str>,
        _updates: &UpdateSink,
    ) -> Result<ProviderSearch> {
        let search_query = build_search_query(messages, rag_settings, query)?;
        Ok(ProviderSearch {
            search_query,
            pages: self.pages.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Build the configured search backend.
///
/// Hosted backends read their API key from the env var named in the config;
/// the key itself is never stored in the config file.
pub fn provider_from_config(config: &ProviderConfig) -> Result<Arc<dyn SearchProvider>> {
    match config.backend.as_str() {
        "serper" => {
            let api_key = std::env::var(&config.api_key_env).map_err(|_| {
                SearchRelayError::config(format!(
                    "Serper API key not found. Set the {} environment variable.",
                    config.api_key_env
                ))
            })?;
            Ok(Arc::new(SerperProvider::new(
                config.serper_endpoint.clone(),
                api_key,
                config.timeout_secs,
                config.requested_results,
            )?))
        }
        "searxng" => {
            let endpoint = config.searxng_endpoint.as_deref().ok_or_else(|| {
                SearchRelayError::config("searxng backend requires searxng_endpoint")
            })?;
            Ok(Arc::new(SearxngProvider::new(
                endpoint,
                config.timeout_secs,
            )?))
        }
        other => Err(SearchRelayError::config(format!(
            "unknown search backend \"{other}\" (expected \"serper\" or \"searxng\")"
        ))),
    }
}
