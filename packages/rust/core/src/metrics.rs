//! Metrics sink trait, decoupling the pipeline from any metrics backend.
//!
//! The pipeline takes an injected sink rather than touching process-global
//! counter state; tests and headless runs use [`NopMetrics`].

use std::sync::atomic::{AtomicU64, Ordering};

/// Sink for web search metrics.
pub trait SearchMetrics: Send + Sync + std::fmt::Debug {
    /// Counts one search invocation, independent of its outcome.
    fn inc_requests(&self);
}

/// A no-op sink for tests and runs where metrics are not needed.
#[derive(Debug, Clone, Copy)]
pub struct NopMetrics;

impl SearchMetrics for NopMetrics {
    fn inc_requests(&self) {}
}

/// In-process monotonic counter backed by an atomic.
#[derive(Debug, Default)]
pub struct RequestCounter {
    requests: AtomicU64,
}

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total invocations counted so far.
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }
}

impl SearchMetrics for RequestCounter {
    fn inc_requests(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_monotonic() {
        let counter = RequestCounter::new();
        assert_eq!(counter.requests(), 0);
        counter.inc_requests();
        counter.inc_requests();
        assert_eq!(counter.requests(), 2);
    }

    #[test]
    fn counter_is_shareable_across_threads() {
        let counter = std::sync::Arc::new(RequestCounter::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = counter.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        counter.inc_requests();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread join");
        }
        assert_eq!(counter.requests(), 400);
    }
}
