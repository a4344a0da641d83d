#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system that translates pointer drags into queued move requests.

use fuseblocks_core::{CellCoord, Command, Direction, LevelStatus};

/// Pointer gesture distilled from adapter-provided frame input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Gesture {
    /// Cell under the pointer when the press began, if any.
    pub pressed: Option<CellCoord>,
    /// Cell under the pointer when the press ended, if any.
    pub released: Option<CellCoord>,
}

impl Gesture {
    /// Creates a new gesture descriptor with explicit field values.
    #[must_use]
    pub const fn new(pressed: Option<CellCoord>, released: Option<CellCoord>) -> Self {
        Self { pressed, released }
    }

    /// Interprets the gesture as a horizontal drag.
    ///
    /// Returns the pressed cell and the drag direction when the press and
    /// release lie on the same row but in different columns. Vertical and
    /// in-place gestures carry no move intent.
    #[must_use]
    pub fn drag(&self) -> Option<(CellCoord, Direction)> {
        let pressed = self.pressed?;
        let released = self.released?;

        if pressed.row() != released.row() || pressed.column() == released.column() {
            return None;
        }

        let direction = if released.column() < pressed.column() {
            Direction::Left
        } else {
            Direction::Right
        };
        Some((pressed, direction))
    }
}

/// Input system that turns completed drags into move queue commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct Input;

impl Input {
    /// Creates a new input system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Consumes the frame's gesture and emits move requests.
    ///
    /// A drag is forwarded only while the level is running with no move set
    /// in flight, and only when `movable_at` confirms the pressed cell holds
    /// a tile the player can move. The `movable_at` closure should mirror the
    /// semantics of the world's grid view; the world still re-validates each
    /// request when it leaves the queue, because the grid may change while
    /// earlier requests resolve.
    pub fn handle<F>(
        &self,
        gesture: Gesture,
        status: LevelStatus,
        mut movable_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(CellCoord) -> bool,
    {
        if !status.running() || status.busy() {
            return;
        }

        let Some((cell, direction)) = gesture.drag() else {
            return;
        };

        if !movable_at(cell) {
            return;
        }

        out.push(Command::QueueMove { cell, direction });
    }
}
