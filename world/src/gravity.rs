use fuseblocks_core::CellCoord;

use crate::grid::{Grid, Tile};
use crate::pieces::PieceMap;

/// Determines which pieces fall one row on an otherwise settled grid.
///
/// Support spreads upward to a fixed point: static tiles and the floor seed
/// the support mask, any piece with at least one supported tile is frozen
/// into the mask, and the iteration repeats until no further piece settles.
/// Whatever remains unsupported falls exactly one row this pass; taller drops
/// resolve across consecutive passes. Returns the falling source cells in
/// row-major order, empty when the grid is already at rest.
pub(crate) fn resolve(grid: &Grid, pieces: &PieceMap) -> Vec<CellCoord> {
    let mut support: Vec<bool> = grid.tiles().iter().map(Tile::is_static).collect();
    let mut candidates: Vec<usize> = pieces
        .pieces
        .iter()
        .enumerate()
        .filter_map(|(index, piece)| piece.movable.then_some(index))
        .collect();

    loop {
        let mut settled_any = false;
        candidates.retain(|&piece_index| {
            let piece = &pieces.pieces[piece_index];
            let supported = piece.cells.iter().any(|cell| match cell.below() {
                None => true,
                Some(below) => match grid.index(below) {
                    None => true,
                    Some(below_index) => support[below_index],
                },
            });
            if supported {
                for cell in &piece.cells {
                    if let Some(index) = grid.index(*cell) {
                        support[index] = true;
                    }
                }
                settled_any = true;
            }
            !supported
        });
        if !settled_any {
            break;
        }
    }

    let mut cells: Vec<CellCoord> = Vec::new();
    for piece_index in candidates {
        cells.extend(pieces.pieces[piece_index].cells.iter().copied());
    }
    cells.sort_by_key(|cell| (cell.row(), cell.column()));
    cells
}
