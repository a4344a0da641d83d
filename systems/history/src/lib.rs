#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure history system that records board checkpoints and replays them on undo.

use std::collections::VecDeque;

use fuseblocks_core::{Command, Event, GridSnapshot};

/// Maximum number of checkpoints retained before the oldest is discarded.
pub const UNDO_DEPTH: usize = 32;

/// History system that captures a checkpoint whenever a move is accepted.
#[derive(Debug, Default)]
pub struct History {
    checkpoints: VecDeque<GridSnapshot>,
}

impl History {
    /// Creates a new history system with no recorded checkpoints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of checkpoints currently available for undo.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.checkpoints.len()
    }

    /// Consumes world events and records checkpoints for accepted moves.
    ///
    /// The `capture` closure should mirror the world's grid snapshot query.
    /// Call this once per command application with the events it produced, so
    /// the capture still observes the board as it stood before the accepted
    /// move commits.
    pub fn handle<F>(&mut self, events: &[Event], mut capture: F)
    where
        F: FnMut() -> GridSnapshot,
    {
        for event in events {
            match event {
                Event::MoveAccepted { .. } => self.record(capture()),
                Event::GridConfigured { .. } => self.checkpoints.clear(),
                _ => {}
            }
        }
    }

    /// Produces the command that rewinds the board to the latest checkpoint.
    ///
    /// Returns `None` when no checkpoint is available. Undoing past a win is
    /// allowed; the world re-evaluates the win condition when it restores.
    #[must_use]
    pub fn undo(&mut self) -> Option<Command> {
        self.checkpoints
            .pop_back()
            .map(|snapshot| Command::RestoreSnapshot { snapshot })
    }

    fn record(&mut self, snapshot: GridSnapshot) {
        if self.checkpoints.len() >= UNDO_DEPTH {
            let _ = self.checkpoints.pop_front();
        }
        self.checkpoints.push_back(snapshot);
    }
}
