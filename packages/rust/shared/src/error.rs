//! Error types for SearchRelay.
//!
//! Library crates use [`SearchRelayError`] via `thiserror`. The pipeline in
//! `searchrelay-core` is the single boundary where these surface: every
//! variant degrades into a logged detail plus an error update, and nothing
//! propagates past it to the caller.

use std::path::PathBuf;

/// Top-level error type for all SearchRelay operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchRelayError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Network/HTTP error while talking to a search backend.
    #[error("network error: {0}")]
    Network(String),

    /// The search backend failed with a message of its own.
    /// Displays as the bare message; the pipeline reports it verbatim.
    #[error("{0}")]
    Provider(String),

    /// The provider completed but returned zero pages.
    #[error("No results found for this search query")]
    NoResults,

    /// The message history was empty, so no prompt could be derived.
    #[error("message history is empty")]
    EmptyMessages,

    /// The update receiver was dropped before the run finished.
    #[error("update channel closed")]
    ChannelClosed,
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SearchRelayError>;

impl SearchRelayError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a network error from any displayable message.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a provider error from any displayable message.
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the caller stopped listening for updates.
    pub fn is_channel_closed(&self) -> bool {
        matches!(self, Self::ChannelClosed)
    }
}
