//! Shared types, error model, and configuration for SearchRelay.
//!
//! This crate is the foundation depended on by all other SearchRelay crates.
//! It provides:
//! - [`SearchRelayError`] — the unified error type
//! - Domain types ([`WebSearch`], [`Message`], [`PageResult`], [`ConversationId`])
//! - The update stream ([`WebSearchUpdate`], [`UpdateSink`])
//! - Configuration ([`AppConfig`], [`ProviderConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;
pub mod update;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ProviderConfig, SearchConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from, validate_api_key, validate_config,
};
pub use error::{Result, SearchRelayError};
pub use types::{
    Conversation, ConversationId, Message, MessageRole, PageResult, RagSettings, ResultSummary,
    ScrapedPage, UsedSource, WebSearch,
};
pub use update::{UpdateSink, WebSearchUpdate};
