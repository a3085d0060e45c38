//! Core pipeline orchestration for SearchRelay.
//!
//! This crate ties provider search, result selection, and source
//! construction into the streaming web search workflow.

pub mod metrics;
pub mod pipeline;
pub mod select;
pub mod sources;
