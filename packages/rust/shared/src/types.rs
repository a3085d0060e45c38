//! Core domain types for SearchRelay web searches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use searchrelay_markdown::MarkdownNode;

// ---------------------------------------------------------------------------
// ConversationId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for conversation identifiers (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub Uuid);

impl ConversationId {
    /// Generate a new time-sortable conversation identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ConversationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// Conversation & messages
// ---------------------------------------------------------------------------

/// The conversation a web search runs on behalf of.
///
/// The pipeline reads nothing from it; it travels with the request for log
/// correlation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier for this conversation.
    pub id: ConversationId,
    /// Optional display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One message in the conversation history.
///
/// The last message's content is the prompt a web search runs for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message author.
    pub role: MessageRole,
    /// Message text.
    pub content: String,
}

impl Message {
    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Build an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Retrieval settings attached to an assistant, passed through to the
/// provider unmodified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RagSettings {
    /// Domains the search is restricted to, rendered as `site:` filters.
    #[serde(default)]
    pub allowed_domains: Vec<String>,
}

// ---------------------------------------------------------------------------
// Search hits & sources
// ---------------------------------------------------------------------------

/// One raw search hit as returned by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// Hit title.
    pub title: String,
    /// Hit URL.
    pub link: String,
    /// Text snippet for the hit; may be empty.
    #[serde(default)]
    pub snippet: String,
    /// 1-based rank assigned by the provider, preserved verbatim downstream.
    pub position: usize,
}

/// Structured representation of a selected page's content.
///
/// Web search populates only `title` and `markdown_tree`; the remaining
/// metadata fields belong to scraped pages and stay absent here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedPage {
    /// Page title.
    pub title: String,
    /// Document tree holding the extracted text.
    pub markdown_tree: MarkdownNode,
    /// Site name from page metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    /// Author from page metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Description from page metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Publication timestamp from page metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last-modified timestamp from page metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// A selected search result enriched with its document representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsedSource {
    /// Hit title, copied verbatim.
    pub title: String,
    /// Hit URL, copied verbatim.
    pub link: String,
    /// Structured page content.
    pub page: ScrapedPage,
    /// Context string for answer generation; always the hit's snippet,
    /// byte-for-byte.
    pub context: String,
}

/// Compact summary of a selected result, index-aligned with its
/// [`UsedSource`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    /// Hit title.
    pub title: String,
    /// Hit URL.
    pub link: String,
    /// Provider rank, unchanged by filtering and truncation.
    pub position: usize,
}

// ---------------------------------------------------------------------------
// WebSearch
// ---------------------------------------------------------------------------

/// Terminal value of one web search invocation.
///
/// Constructed exactly once per run: fully populated on success, or with
/// empty `search_query`/`results`/`context_sources` when the run degraded.
/// `created_at` and `updated_at` are captured together at invocation start
/// and never recomputed on either path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearch {
    /// The prompt the search ran for (last message's content).
    pub prompt: String,
    /// The query sent to the provider; empty on the degraded path.
    pub search_query: String,
    /// Summaries of the selected results.
    pub results: Vec<ResultSummary>,
    /// The built sources, one per selected result.
    pub context_sources: Vec<UsedSource>,
    /// When the invocation started.
    pub created_at: DateTime<Utc>,
    /// Capture-once update timestamp, equal to `created_at`.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchrelay_markdown::snippet_tree;

    fn make_source(title: &str, link: &str, snippet: &str) -> UsedSource {
        UsedSource {
            title: title.into(),
            link: link.into(),
            page: ScrapedPage {
                title: title.into(),
                markdown_tree: snippet_tree(title, link, snippet),
                site_name: None,
                author: None,
                description: None,
                created_at: None,
                modified_at: None,
            },
            context: snippet.into(),
        }
    }

    #[test]
    fn conversation_id_roundtrip() {
        let id = ConversationId::new();
        let s = id.to_string();
        let parsed: ConversationId = s.parse().expect("parse ConversationId");
        assert_eq!(id, parsed);
    }

    #[test]
    fn web_search_serialization() {
        let now = Utc::now();
        let search = WebSearch {
            prompt: "What is the tokio runtime?".into(),
            search_query: "what is the tokio runtime".into(),
            results: vec![ResultSummary {
                title: "Tokio".into(),
                link: "https://tokio.rs/".into(),
                position: 1,
            }],
            context_sources: vec![make_source(
                "Tokio",
                "https://tokio.rs/",
                "An asynchronous runtime for Rust.",
            )],
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string_pretty(&search).expect("serialize");
        let parsed: WebSearch = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.results.len(), parsed.context_sources.len());
        assert_eq!(parsed.context_sources[0].context, "An asynchronous runtime for Rust.");
        assert_eq!(parsed.created_at, parsed.updated_at);
    }

    #[test]
    fn absent_page_metadata_is_skipped() {
        let source = make_source("Rust", "https://rust-lang.org/", "A language");
        let json = serde_json::to_value(&source).expect("serialize");
        assert!(json["page"].get("site_name").is_none());
        assert!(json["page"].get("author").is_none());
        assert!(json["page"].get("created_at").is_none());
        assert_eq!(json["page"]["markdown_tree"]["type"], "root");
    }

    #[test]
    fn page_result_snippet_defaults_empty() {
        let json = r#"{"title":"T","link":"https://example.com/","position":4}"#;
        let hit: PageResult = serde_json::from_str(json).expect("deserialize");
        assert_eq!(hit.snippet, "");
        assert_eq!(hit.position, 4);
    }

    #[test]
    fn web_search_fixture_validates() {
        let fixture =
            std::fs::read_to_string("../../../fixtures/json/websearch.fixture.json")
                .expect("read fixture");
        let parsed: WebSearch =
            serde_json::from_str(&fixture).expect("deserialize fixture web search");
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results.len(), parsed.context_sources.len());
        assert_eq!(parsed.results[0].position, 1);
        assert_eq!(parsed.created_at, parsed.updated_at);
        // Each source's context mirrors its tree's paragraph leaf.
        for source in &parsed.context_sources {
            assert_eq!(
                source.page.markdown_tree.children[0].content,
                source.context
            );
        }
    }
}
