use fuseblocks_core::{CellCoord, GridSnapshot, TileFlags, TileIdentity, TileKind, TileSeed};

/// One cell of the dense grid: persistent seed state plus motion bookkeeping.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Tile {
    pub(crate) kind: TileKind,
    pub(crate) flags: TileFlags,
    pub(crate) identity: Option<TileIdentity>,
    pub(crate) target: CellCoord,
    pub(crate) progress: f32,
    pub(crate) in_motion: bool,
}

impl Tile {
    pub(crate) fn from_seed(seed: TileSeed, cell: CellCoord) -> Self {
        Self {
            kind: seed.kind(),
            flags: seed.flags(),
            identity: seed.identity(),
            target: cell,
            progress: 0.0,
            in_motion: false,
        }
    }

    pub(crate) fn vacant(cell: CellCoord) -> Self {
        Self::from_seed(TileSeed::empty(), cell)
    }

    pub(crate) fn seed(&self) -> TileSeed {
        TileSeed::new(self.kind, self.flags, self.identity)
    }

    pub(crate) fn is_empty(&self) -> bool {
        matches!(self.kind, TileKind::Empty)
    }

    pub(crate) fn is_static(&self) -> bool {
        matches!(self.kind, TileKind::Static)
    }

    pub(crate) fn is_movable(&self) -> bool {
        matches!(self.kind, TileKind::Movable)
    }

    pub(crate) fn is_mergeable(&self) -> bool {
        self.flags.contains(TileFlags::MERGEABLE)
    }

    pub(crate) fn is_merged(&self) -> bool {
        self.flags.contains(TileFlags::MERGED)
    }
}

/// Dense row-major storage backing the simulation.
///
/// Every cell holds exactly one [`Tile`]; vacancy is expressed by an empty
/// tile rather than an absence. Cells outside the configured dimensions
/// behave as solid wall, which callers observe as `None` lookups.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let mut tiles = Vec::with_capacity(capacity);
        for row in 0..rows {
            for column in 0..columns {
                tiles.push(Tile::vacant(CellCoord::new(column, row)));
            }
        }
        Self {
            columns,
            rows,
            tiles,
        }
    }

    pub(crate) const fn columns(&self) -> u32 {
        self.columns
    }

    pub(crate) const fn rows(&self) -> u32 {
        self.rows
    }

    pub(crate) fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    pub(crate) fn tile(&self, cell: CellCoord) -> Option<&Tile> {
        self.index(cell).and_then(|index| self.tiles.get(index))
    }

    pub(crate) fn tile_mut(&mut self, cell: CellCoord) -> Option<&mut Tile> {
        self.index(cell)
            .and_then(move |index| self.tiles.get_mut(index))
    }

    pub(crate) fn place(&mut self, cell: CellCoord, seed: TileSeed) -> bool {
        match self.tile_mut(cell) {
            Some(slot) => {
                *slot = Tile::from_seed(seed, cell);
                true
            }
            None => false,
        }
    }

    pub(crate) fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub(crate) fn capture(&self) -> GridSnapshot {
        let seeds = self.tiles.iter().map(Tile::seed).collect();
        GridSnapshot::new(self.columns, self.rows, seeds)
    }

    pub(crate) fn restore(snapshot: &GridSnapshot) -> Option<Self> {
        if !snapshot.is_consistent() {
            return None;
        }

        let mut grid = Self::new(snapshot.columns(), snapshot.rows());
        let mut seeds = snapshot.tiles().iter();
        for row in 0..grid.rows {
            for column in 0..grid.columns {
                let seed = seeds.next()?;
                let cell = CellCoord::new(column, row);
                if !grid.place(cell, *seed) {
                    return None;
                }
            }
        }
        Some(grid)
    }
}
