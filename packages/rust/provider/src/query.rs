//! Search query construction.
//!
//! The query sent to a backend starts from an explicit override or, absent
//! one, the content of the last conversation message. Allowed-domain RAG
//! settings are folded in as `site:` operators.

use std::sync::LazyLock;

use regex::Regex;

use searchrelay_shared::{Message, RagSettings, Result, SearchRelayError};

/// Collapses runs of whitespace (including newlines) to single spaces.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Build the query string for one search.
///
/// An explicit `query` wins. Otherwise the last message's content is used;
/// an empty history is an error since there is nothing to search for.
pub fn build_search_query(
    messages: &[Message],
    rag_settings: Option<&RagSettings>,
    query: Option<&str>,
) -> Result<String> {
    let base = match query {
        Some(q) => q.to_string(),
        None => messages
            .last()
            .map(|m| m.content.clone())
            .ok_or(SearchRelayError::EmptyMessages)?,
    };

    let mut search_query = WHITESPACE_RE.replace_all(base.trim(), " ").into_owned();

    if let Some(settings) = rag_settings {
        if !settings.allowed_domains.is_empty() {
            let domain_filter = settings
                .allowed_domains
                .iter()
                .map(|d| format!("site:{d}"))
                .collect::<Vec<_>>()
                .join(" OR ");
            search_query = format!("{search_query} {domain_filter}");
        }
    }

    Ok(search_query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_query_wins() {
        let messages = vec![Message::user("ignore me")];
        let query = build_search_query(&messages, None, Some("rust async runtime")).unwrap();
        assert_eq!(query, "rust async runtime");
    }

    #[test]
    fn falls_back_to_last_message() {
        let messages = vec![
            Message::user("first question"),
            Message::assistant("an answer"),
            Message::user("what is the tokio runtime?"),
        ];
        let query = build_search_query(&messages, None, None).unwrap();
        assert_eq!(query, "what is the tokio runtime?");
    }

    #[test]
    fn collapses_whitespace() {
        let messages = vec![Message::user("  what\nis \t tokio  ")];
        let query = build_search_query(&messages, None, None).unwrap();
        assert_eq!(query, "what is tokio");
    }

    #[test]
    fn appends_domain_filters() {
        let messages = vec![Message::user("channels")];
        let settings = RagSettings {
            allowed_domains: vec!["tokio.rs".into(), "docs.rs".into()],
        };
        let query = build_search_query(&messages, Some(&settings), None).unwrap();
        assert_eq!(query, "channels site:tokio.rs OR site:docs.rs");
    }

    #[test]
    fn empty_history_is_an_error() {
        let err = build_search_query(&[], None, None).unwrap_err();
        assert!(matches!(err, SearchRelayError::EmptyMessages));
    }

    #[test]
    fn explicit_query_needs_no_messages() {
        let query = build_search_query(&[], None, Some("standalone query")).unwrap();
        assert_eq!(query, "standalone query");
    }
}
