#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure analytics system that folds world events into per-board play totals.

mod summary;

pub use summary::PlaySummary;

use fuseblocks_core::Event;

/// Analytics system that maintains a running summary of the current board.
#[derive(Debug, Default)]
pub struct Analytics {
    summary: PlaySummary,
}

impl Analytics {
    /// Creates a new analytics system with an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the totals folded from every event observed so far.
    #[must_use]
    pub const fn summary(&self) -> PlaySummary {
        self.summary
    }

    /// Consumes world events and updates the running summary.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            self.summary.absorb(event);
        }
    }
}
