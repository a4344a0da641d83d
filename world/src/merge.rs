use std::collections::{BTreeSet, VecDeque};

use fuseblocks_core::{CellCoord, TileFlags, TileIdentity, TileKind};

use crate::grid::Grid;
use crate::pieces::{collect_pieces, neighbors};

/// One group of tiles fused by a merge pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MergedGroup {
    pub(crate) identity: TileIdentity,
    pub(crate) cells: Vec<CellCoord>,
    pub(crate) locked: bool,
}

/// Fuses touching mergeable tiles that share an identity.
///
/// Floods four-connected runs of mergeable tiles per identity. A run longer
/// than one tile is applied only when it changes something: a member not yet
/// fused, or a mix of static and movable members. Applying a run marks every
/// member fused, and the presence of any static member reclassifies the
/// whole run static, permanently clearing its movability. Returns the groups
/// that were applied this pass.
pub(crate) fn resolve(grid: &mut Grid) -> Vec<MergedGroup> {
    let columns = grid.columns();
    let rows = grid.rows();
    let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
    let mut visited: Vec<bool> = vec![false; capacity];
    let mut groups: Vec<MergedGroup> = Vec::new();
    let mut frontier: VecDeque<CellCoord> = VecDeque::new();

    for row in 0..rows {
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            let Some(index) = grid.index(cell) else {
                continue;
            };
            if visited[index] {
                continue;
            }
            let Some(tile) = grid.tile(cell) else {
                continue;
            };
            let Some(identity) = tile.identity else {
                continue;
            };
            if !tile.is_mergeable() {
                continue;
            }

            visited[index] = true;
            let mut cells = vec![cell];
            frontier.push_back(cell);
            while let Some(current) = frontier.pop_front() {
                for neighbor in neighbors(current) {
                    let Some(neighbor_index) = grid.index(neighbor) else {
                        continue;
                    };
                    if visited[neighbor_index] {
                        continue;
                    }
                    let Some(neighbor_tile) = grid.tile(neighbor) else {
                        continue;
                    };
                    if !neighbor_tile.is_mergeable() || neighbor_tile.identity != Some(identity) {
                        continue;
                    }
                    visited[neighbor_index] = true;
                    cells.push(neighbor);
                    frontier.push_back(neighbor);
                }
            }

            if cells.len() < 2 {
                continue;
            }
            cells.sort_by_key(|member| (member.row(), member.column()));

            let mut any_static = false;
            let mut any_movable = false;
            let mut any_unfused = false;
            for member in &cells {
                if let Some(member_tile) = grid.tile(*member) {
                    any_static = any_static || member_tile.is_static();
                    any_movable = any_movable || member_tile.is_movable();
                    any_unfused = any_unfused || !member_tile.is_merged();
                }
            }
            if !any_unfused && !(any_static && any_movable) {
                continue;
            }

            for member in &cells {
                if let Some(member_tile) = grid.tile_mut(*member) {
                    member_tile.flags.insert(TileFlags::MERGED);
                    if any_static {
                        member_tile.kind = TileKind::Static;
                    }
                }
            }
            groups.push(MergedGroup {
                identity,
                cells,
                locked: any_static,
            });
        }
    }

    groups
}

/// Piece and identity counts that decide the win condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct WinTally {
    pub(crate) pieces: u32,
    pub(crate) identities: u32,
}

impl WinTally {
    pub(crate) fn is_won(&self) -> bool {
        self.pieces > 0 && self.pieces == self.identities
    }
}

/// Counts pieces and distinct identities on the current grid.
pub(crate) fn tally(grid: &Grid) -> WinTally {
    let map = collect_pieces(grid);
    let mut identities: BTreeSet<TileIdentity> = BTreeSet::new();
    for piece in &map.pieces {
        if let Some(identity) = piece.identity {
            let _ = identities.insert(identity);
        }
    }
    WinTally {
        pieces: map.pieces.len() as u32,
        identities: identities.len() as u32,
    }
}
