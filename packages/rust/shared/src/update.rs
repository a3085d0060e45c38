//! Streaming update protocol for web searches.
//!
//! A running search talks to its caller through a bounded channel of
//! [`WebSearchUpdate`] events. The pipeline and its provider write into the
//! same [`UpdateSink`] in program order, so the caller sees one flat, ordered
//! event sequence no matter which layer produced each event. Every send is a
//! suspension point: with a small buffer the receiver's pace is the run's
//! pace, and a dropped receiver cancels the run at its next send.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::{Result, SearchRelayError};
use crate::types::UsedSource;

// ---------------------------------------------------------------------------
// Update events
// ---------------------------------------------------------------------------

/// One event in a web search's update stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WebSearchUpdate {
    /// Free-form progress text, informational only.
    General {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        args: Option<Vec<String>>,
    },
    /// The built source list. Emitted exactly once per run, only on success,
    /// always before [`WebSearchUpdate::FinalAnswer`].
    Sources { sources: Vec<UsedSource> },
    /// Failure report: a fixed user-facing label plus the detail string in
    /// `args`. Emitted at most once per run, only on the degraded path.
    Error { message: String, args: Vec<String> },
    /// Terminal sentinel, no payload. Always the last event of a run.
    FinalAnswer,
}

impl WebSearchUpdate {
    /// Progress text without arguments.
    pub fn general(message: impl Into<String>) -> Self {
        Self::General {
            message: message.into(),
            args: None,
        }
    }

    /// Progress text with rendering arguments.
    pub fn general_with_args(message: impl Into<String>, args: Vec<String>) -> Self {
        Self::General {
            message: message.into(),
            args: Some(args),
        }
    }

    /// The sources-ready event.
    pub fn sources(sources: Vec<UsedSource>) -> Self {
        Self::Sources { sources }
    }

    /// A failure event with a generic label and detail arguments.
    pub fn error(message: impl Into<String>, args: Vec<String>) -> Self {
        Self::Error {
            message: message.into(),
            args,
        }
    }

    /// The terminal sentinel.
    pub fn final_answer() -> Self {
        Self::FinalAnswer
    }
}

// ---------------------------------------------------------------------------
// UpdateSink
// ---------------------------------------------------------------------------

/// Sending half of a web search's update stream.
///
/// Clonable; the pipeline hands the same sink to its provider so nested
/// progress interleaves with its own in emission order.
#[derive(Debug, Clone)]
pub struct UpdateSink {
    tx: mpsc::Sender<WebSearchUpdate>,
}

impl UpdateSink {
    /// Wrap an existing channel sender.
    pub fn new(tx: mpsc::Sender<WebSearchUpdate>) -> Self {
        Self { tx }
    }

    /// Create a sink together with its receiving half.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<WebSearchUpdate>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    /// Emit one update, waiting until the receiver has room for it.
    ///
    /// Fails with [`SearchRelayError::ChannelClosed`] once the receiver is
    /// gone; a running search treats that as cancellation.
    pub async fn emit(&self, update: WebSearchUpdate) -> Result<()> {
        self.tx
            .send(update)
            .await
            .map_err(|_| SearchRelayError::ChannelClosed)
    }

    /// Whether the receiving half has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_serialization_shape() {
        let update = WebSearchUpdate::general("Searching serper");
        let json = serde_json::to_value(&update).expect("serialize");
        assert_eq!(json["type"], "general");
        assert_eq!(json["message"], "Searching serper");
        assert!(json.get("args").is_none());

        let update =
            WebSearchUpdate::error("An error occurred", vec!["network timeout".into()]);
        let json = serde_json::to_value(&update).expect("serialize");
        assert_eq!(json["type"], "error");
        assert_eq!(json["args"][0], "network timeout");

        let update = WebSearchUpdate::final_answer();
        let json = serde_json::to_value(&update).expect("serialize");
        assert_eq!(json["type"], "final_answer");
    }

    #[test]
    fn general_args_roundtrip() {
        let update = WebSearchUpdate::general_with_args(
            "Searching serper",
            vec!["rust async traits".into()],
        );
        let json = serde_json::to_string(&update).expect("serialize");
        let parsed: WebSearchUpdate = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, update);
    }

    #[tokio::test]
    async fn sink_preserves_emission_order() {
        let (sink, mut rx) = UpdateSink::channel(8);
        sink.emit(WebSearchUpdate::general("one")).await.unwrap();
        sink.emit(WebSearchUpdate::general("two")).await.unwrap();
        drop(sink);

        assert_eq!(rx.recv().await.unwrap(), WebSearchUpdate::general("one"));
        assert_eq!(rx.recv().await.unwrap(), WebSearchUpdate::general("two"));
        // Sender dropped: the stream ends.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn emit_fails_after_receiver_drops() {
        let (sink, rx) = UpdateSink::channel(1);
        drop(rx);

        let err = sink
            .emit(WebSearchUpdate::final_answer())
            .await
            .unwrap_err();
        assert!(err.is_channel_closed());
        assert!(sink.is_closed());
    }

    #[tokio::test]
    async fn cloned_sinks_share_one_stream() {
        let (sink, mut rx) = UpdateSink::channel(8);
        let nested = sink.clone();

        nested.emit(WebSearchUpdate::general("provider")).await.unwrap();
        sink.emit(WebSearchUpdate::general("pipeline")).await.unwrap();
        drop(sink);
        drop(nested);

        assert_eq!(
            rx.recv().await.unwrap(),
            WebSearchUpdate::general("provider")
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            WebSearchUpdate::general("pipeline")
        );
        assert!(rx.recv().await.is_none());
    }
}
