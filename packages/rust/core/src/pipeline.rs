//! Web search pipeline: search → select → build sources → finalize.
//!
//! The pipeline drives a [`SearchProvider`], filters its hits, builds the
//! used-source records, and streams typed updates to the caller along the
//! way. Every invocation terminates with a `FinalAnswer` update and one
//! [`WebSearch`] value; failures degrade instead of propagating.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use searchrelay_provider::SearchProvider;
use searchrelay_shared::{
    Conversation, Message, RagSettings, Result, ResultSummary, SearchRelayError, UpdateSink,
    UsedSource, WebSearch, WebSearchUpdate,
};

use crate::metrics::{NopMetrics, SearchMetrics};
use crate::select::select_pages;
use crate::sources::build_source;

/// Fixed user-facing label for error updates; the detail rides in `args`.
const ERROR_LABEL: &str = "An error occurred";

/// Channel capacity for [`WebSearchPipeline::stream`]. Capacity one makes
/// every emitted update a suspension point: the pipeline cannot run ahead of
/// the consumer.
const UPDATE_BUFFER: usize = 1;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Inputs for one web search invocation.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Conversation the search belongs to.
    pub conversation: Conversation,
    /// Message history; the last entry's content is the prompt.
    pub messages: Vec<Message>,
    /// Optional RAG settings forwarded to the provider.
    pub rag_settings: Option<RagSettings>,
    /// Optional explicit query override.
    pub query: Option<String>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Orchestrates provider search, result selection, and source construction.
///
/// Cloning is cheap; the provider and metrics sink are shared.
#[derive(Clone)]
pub struct WebSearchPipeline {
    provider: Arc<dyn SearchProvider>,
    metrics: Arc<dyn SearchMetrics>,
}

impl WebSearchPipeline {
    /// Create a pipeline around the given provider, with metrics disabled.
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            provider,
            metrics: Arc::new(NopMetrics),
        }
    }

    /// Replace the metrics sink.
    pub fn with_metrics(mut self, metrics: Arc<dyn SearchMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Run one search, emitting updates into `updates` and returning the
    /// terminal value.
    ///
    /// This never returns an error: any failure resolves to a logged detail,
    /// one `Error` update, and a degraded result with the prompt and
    /// timestamps preserved. The one silent exit is the update receiver
    /// dropping mid-run, which abandons the invocation.
    #[instrument(skip_all, fields(conversation_id = %request.conversation.id))]
    pub async fn run(&self, request: &SearchRequest, updates: &UpdateSink) -> WebSearch {
        self.metrics.inc_requests();

        let started_at = Utc::now();
        let prompt = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();

        let mut web_search = WebSearch {
            prompt,
            search_query: String::new(),
            results: Vec::new(),
            context_sources: Vec::new(),
            created_at: started_at,
            updated_at: started_at,
        };

        match self.search_and_build(request, updates).await {
            Ok((search_query, results, context_sources)) => {
                info!(
                    query = %search_query,
                    results = results.len(),
                    "web search complete"
                );
                web_search.search_query = search_query;
                web_search.results = results;
                web_search.context_sources = context_sources;
            }
            Err(e) if e.is_channel_closed() => {
                // The caller stopped listening; abandon quietly.
                return web_search;
            }
            Err(e) => {
                let detail = e.to_string();
                error!("{detail}");
                let _ = updates
                    .emit(WebSearchUpdate::error(ERROR_LABEL, vec![detail]))
                    .await;
            }
        }

        let _ = updates.emit(WebSearchUpdate::final_answer()).await;
        web_search
    }

    /// Spawn [`run`](Self::run) on a fresh bounded channel, returning the
    /// receiving half and the join handle for the terminal value.
    pub fn stream(
        &self,
        request: SearchRequest,
    ) -> (mpsc::Receiver<WebSearchUpdate>, JoinHandle<WebSearch>) {
        let (sink, rx) = UpdateSink::channel(UPDATE_BUFFER);
        let pipeline = self.clone();
        let handle = tokio::spawn(async move { pipeline.run(&request, &sink).await });
        (rx, handle)
    }

    /// Success path: provider search, selection, source construction, and
    /// the `Sources` update. Errors escape to the single decision point in
    /// [`run`](Self::run).
    async fn search_and_build(
        &self,
        request: &SearchRequest,
        updates: &UpdateSink,
    ) -> Result<(String, Vec<ResultSummary>, Vec<UsedSource>)> {
        let search = self
            .provider
            .search(
                &request.messages,
                request.rag_settings.as_ref(),
                request.query.as_deref(),
                updates,
            )
            .await?;

        // Zero hits is decided on the raw list, before any filtering.
        if search.pages.is_empty() {
            return Err(SearchRelayError::NoResults);
        }

        updates
            .emit(WebSearchUpdate::general("Generating search context"))
            .await?;

        let selected = select_pages(search.pages);
        let context_sources: Vec<UsedSource> = selected.iter().map(build_source).collect();
        let results: Vec<ResultSummary> = selected
            .iter()
            .map(|p| ResultSummary {
                title: p.title.clone(),
                link: p.link.clone(),
                position: p.position,
            })
            .collect();

        updates
            .emit(WebSearchUpdate::sources(context_sources.clone()))
            .await?;

        Ok((search.search_query, results, context_sources))
    }
}
