use fuseblocks_core::{CellCoord, Direction, MoveRejection};

use crate::grid::Grid;
use crate::pieces::PieceMap;

/// Result of resolving one queued move against a settled grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The move is legal; these source cells shift one column together.
    Accepted {
        /// Every displaced tile in row-major order, pushed pieces included.
        cells: Vec<CellCoord>,
    },
    /// The move is illegal; the grid was left untouched.
    Rejected {
        /// Specific reason the move failed.
        reason: MoveRejection,
    },
}

/// Expands a move request into the full set of pieces it drags along.
///
/// Starting from the piece under the origin cell, every tile's neighbor in
/// the travel direction is inspected: an empty cell permits the tile, a
/// movable piece joins the move set and is inspected in turn, and anything
/// else refuses the whole request. The expansion reaches a fixed point
/// because each piece enters the set at most once. Resolution never mutates
/// the grid, so a rejection leaves no trace.
pub(crate) fn resolve(
    grid: &Grid,
    pieces: &PieceMap,
    origin: CellCoord,
    direction: Direction,
) -> Outcome {
    let Some(origin_index) = pieces.piece_index(grid, origin) else {
        return Outcome::Rejected {
            reason: MoveRejection::NotMovable,
        };
    };
    if !pieces.pieces[origin_index].movable {
        return Outcome::Rejected {
            reason: MoveRejection::NotMovable,
        };
    }

    let mut selected: Vec<usize> = vec![origin_index];
    let mut cursor = 0;
    while cursor < selected.len() {
        let piece_index = selected[cursor];
        cursor += 1;
        for &cell in &pieces.pieces[piece_index].cells {
            let Some(destination) = cell.shifted(direction) else {
                return Outcome::Rejected {
                    reason: MoveRejection::Blocked,
                };
            };
            match pieces.piece_index(grid, destination) {
                Some(neighbor_index) if selected.contains(&neighbor_index) => {}
                Some(neighbor_index) => {
                    if !pieces.pieces[neighbor_index].movable {
                        return Outcome::Rejected {
                            reason: MoveRejection::Blocked,
                        };
                    }
                    selected.push(neighbor_index);
                }
                None => match grid.tile(destination) {
                    Some(tile) if tile.is_empty() => {}
                    Some(_) | None => {
                        return Outcome::Rejected {
                            reason: MoveRejection::Blocked,
                        };
                    }
                },
            }
        }
    }

    let mut cells: Vec<CellCoord> = Vec::new();
    for &piece_index in &selected {
        cells.extend(pieces.pieces[piece_index].cells.iter().copied());
    }
    cells.sort_by_key(|cell| (cell.row(), cell.column()));
    Outcome::Accepted { cells }
}
