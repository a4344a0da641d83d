use fuseblocks_core::Event;

/// Running totals for a single board, reset whenever the grid is reconfigured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaySummary {
    /// Number of move requests admitted into the queue.
    pub moves_queued: u32,
    /// Number of queued moves the grid accepted and executed.
    pub moves_accepted: u32,
    /// Number of move requests rejected at any stage.
    pub moves_rejected: u32,
    /// Number of merge groups formed, including locked ones.
    pub merges: u32,
    /// Number of merge groups that fused onto a static anchor.
    pub locked_merges: u32,
    /// Number of snapshot restores applied to the board.
    pub undos: u32,
    /// Number of simulation ticks observed.
    pub ticks: u64,
    /// Whether the board currently counts as solved.
    pub won: bool,
}

impl PlaySummary {
    pub(crate) fn absorb(&mut self, event: &Event) {
        match event {
            Event::GridConfigured { .. } => *self = Self::default(),
            Event::MoveQueued { .. } => {
                self.moves_queued = self.moves_queued.saturating_add(1);
            }
            Event::MoveAccepted { .. } => {
                self.moves_accepted = self.moves_accepted.saturating_add(1);
            }
            Event::MoveRejected { .. } => {
                self.moves_rejected = self.moves_rejected.saturating_add(1);
            }
            Event::TilesMerged { locked, .. } => {
                self.merges = self.merges.saturating_add(1);
                if *locked {
                    self.locked_merges = self.locked_merges.saturating_add(1);
                }
            }
            Event::GridRestored { .. } => {
                self.undos = self.undos.saturating_add(1);
                self.won = false;
            }
            Event::TimeAdvanced { .. } => {
                self.ticks = self.ticks.saturating_add(1);
            }
            Event::LevelWon { .. } => self.won = true,
            _ => {}
        }
    }
}
