use std::collections::VecDeque;

use fuseblocks_core::{CellCoord, TileIdentity};

use crate::grid::{Grid, Tile};

/// Contiguous group of tiles the resolvers treat as one rigid unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Piece {
    pub(crate) identity: Option<TileIdentity>,
    pub(crate) cells: Vec<CellCoord>,
    pub(crate) movable: bool,
}

/// Canonical partition of the grid into pieces.
///
/// Pieces are recomputed from tile state at every resolution point and never
/// persisted, so the partition can never drift out of sync with the grid.
#[derive(Clone, Debug, Default)]
pub(crate) struct PieceMap {
    pub(crate) pieces: Vec<Piece>,
    by_cell: Vec<Option<usize>>,
}

impl PieceMap {
    pub(crate) fn piece_index(&self, grid: &Grid, cell: CellCoord) -> Option<usize> {
        let index = grid.index(cell)?;
        self.by_cell.get(index).copied().flatten()
    }
}

/// Groups the grid into pieces by flooding fused tiles.
///
/// Movable tiles and mergeable statics each belong to exactly one piece;
/// empty cells and plain walls belong to none. A fused tile floods through
/// its four-connected neighbors that share both its identity and the fused
/// state, so a compound spanning static and movable members forms a single
/// piece whose movability is the conjunction over all members. The scan runs
/// in row-major order and piece cells are sorted the same way, making the
/// partition identical for identical grids.
pub(crate) fn collect_pieces(grid: &Grid) -> PieceMap {
    let columns = grid.columns();
    let rows = grid.rows();
    let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
    let mut by_cell: Vec<Option<usize>> = vec![None; capacity];
    let mut pieces: Vec<Piece> = Vec::new();
    let mut frontier: VecDeque<CellCoord> = VecDeque::new();

    for row in 0..rows {
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            let Some(index) = grid.index(cell) else {
                continue;
            };
            if by_cell[index].is_some() {
                continue;
            }
            let Some(tile) = grid.tile(cell) else {
                continue;
            };
            if !participates(tile) {
                continue;
            }

            let piece_index = pieces.len();
            let identity = tile.identity;
            let mut cells = vec![cell];
            let mut movable = tile.is_movable();
            by_cell[index] = Some(piece_index);

            if tile.is_merged() && identity.is_some() {
                frontier.push_back(cell);
                while let Some(current) = frontier.pop_front() {
                    for neighbor in neighbors(current) {
                        let Some(neighbor_index) = grid.index(neighbor) else {
                            continue;
                        };
                        if by_cell[neighbor_index].is_some() {
                            continue;
                        }
                        let Some(neighbor_tile) = grid.tile(neighbor) else {
                            continue;
                        };
                        if !neighbor_tile.is_merged() || neighbor_tile.identity != identity {
                            continue;
                        }
                        by_cell[neighbor_index] = Some(piece_index);
                        movable = movable && neighbor_tile.is_movable();
                        cells.push(neighbor);
                        frontier.push_back(neighbor);
                    }
                }
            }

            cells.sort_by_key(|member| (member.row(), member.column()));
            pieces.push(Piece {
                identity,
                cells,
                movable,
            });
        }
    }

    PieceMap { pieces, by_cell }
}

fn participates(tile: &Tile) -> bool {
    tile.is_movable() || (tile.is_static() && tile.is_mergeable())
}

/// Four-connected neighbors of a cell in north, east, south, west order.
pub(crate) fn neighbors(cell: CellCoord) -> impl Iterator<Item = CellCoord> {
    let north = cell
        .row()
        .checked_sub(1)
        .map(|row| CellCoord::new(cell.column(), row));
    let east = cell
        .column()
        .checked_add(1)
        .map(|column| CellCoord::new(column, cell.row()));
    let south = cell
        .row()
        .checked_add(1)
        .map(|row| CellCoord::new(cell.column(), row));
    let west = cell
        .column()
        .checked_sub(1)
        .map(|column| CellCoord::new(column, cell.row()));
    [north, east, south, west].into_iter().flatten()
}
