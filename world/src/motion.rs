use std::time::Duration;

use fuseblocks_core::{CellCoord, Direction};

use crate::grid::{Grid, Tile};
use crate::{FALL_CELLS_PER_SECOND, SHIFT_CELLS_PER_SECOND};

/// Travel axis of the in-flight move set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MoveAxis {
    /// Player-initiated horizontal shift.
    Shift(Direction),
    /// Gravity-initiated drop of one row.
    Fall,
}

/// The set of tiles currently traveling toward their target cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ActiveMove {
    pub(crate) axis: MoveAxis,
    pub(crate) cells: Vec<CellCoord>,
}

/// Marks every cell in the move set as traveling one column sideways.
pub(crate) fn begin_shift(grid: &mut Grid, cells: &[CellCoord], direction: Direction) {
    for &cell in cells {
        let Some(destination) = cell.shifted(direction) else {
            continue;
        };
        if let Some(tile) = grid.tile_mut(cell) {
            tile.target = destination;
            tile.progress = 0.0;
            tile.in_motion = true;
        }
    }
}

/// Marks every cell in the move set as traveling one row downward.
pub(crate) fn begin_fall(grid: &mut Grid, cells: &[CellCoord]) {
    for &cell in cells {
        let Some(destination) = cell.below() else {
            continue;
        };
        if let Some(tile) = grid.tile_mut(cell) {
            tile.target = destination;
            tile.progress = 0.0;
            tile.in_motion = true;
        }
    }
}

/// Advances animation progress for the move set by one time slice.
///
/// Progress drives completion gating only; a tile whose progress passes 1 is
/// snapped to rest immediately. Returns true once every tile of the set has
/// finished traveling, after which [`commit`] relocates the tiles. Advancing
/// an already finished set changes nothing.
pub(crate) fn advance(grid: &mut Grid, active: &ActiveMove, dt: Duration) -> bool {
    let speed = match active.axis {
        MoveAxis::Shift(_) => SHIFT_CELLS_PER_SECOND,
        MoveAxis::Fall => FALL_CELLS_PER_SECOND,
    };
    let step = speed * dt.as_secs_f32();

    let mut completed = true;
    for &cell in &active.cells {
        let Some(tile) = grid.tile_mut(cell) else {
            continue;
        };
        if !tile.in_motion {
            continue;
        }
        tile.progress += step;
        if tile.progress > 1.0 {
            tile.progress = 0.0;
            tile.in_motion = false;
        } else {
            completed = false;
        }
    }
    completed
}

/// Relocates a finished move set to its target cells.
///
/// Runs in two passes over the whole set: first every source cell is cleared
/// to a fresh empty tile, then every traveler is written into its target.
/// Clearing everything before writing anything keeps rigid groups intact
/// when a tile's target is another member's source.
pub(crate) fn commit(grid: &mut Grid, active: &ActiveMove) {
    let mut travelers: Vec<(CellCoord, Tile)> = Vec::with_capacity(active.cells.len());
    for &cell in &active.cells {
        if let Some(tile) = grid.tile(cell) {
            travelers.push((tile.target, *tile));
        }
    }

    for &cell in &active.cells {
        if let Some(slot) = grid.tile_mut(cell) {
            *slot = Tile::vacant(cell);
        }
    }

    for (destination, mut tile) in travelers {
        tile.target = destination;
        tile.progress = 0.0;
        tile.in_motion = false;
        if let Some(slot) = grid.tile_mut(destination) {
            *slot = tile;
        }
    }
}
