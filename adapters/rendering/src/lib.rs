#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Fuseblocks adapters.

use bitflags::bitflags;
use fuseblocks_core::{CellCoord, TileColor, TileIdentity, TileKind};
use glam::Vec2;
use std::{error::Error, fmt};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Fill used for static wall tiles.
pub const WALL_FILL: Color = Color::from_rgb_u8(84, 84, 84);

/// Color used when drawing grid lines.
pub const GRID_LINE_COLOR: Color = Color::from_rgb_u8(60, 60, 60);

/// Solid color used to clear each frame.
pub const BACKGROUND_COLOR: Color = Color::from_rgb_u8(24, 24, 28);

/// Amount merged tiles are lightened to read as a single fused slab.
pub const MERGED_LIGHTEN: f32 = 0.25;

const NUMBERED_FILLS: [Color; 7] = [
    Color::from_rgb_u8(239, 83, 80),
    Color::from_rgb_u8(255, 167, 38),
    Color::from_rgb_u8(255, 238, 88),
    Color::from_rgb_u8(102, 187, 106),
    Color::from_rgb_u8(38, 198, 218),
    Color::from_rgb_u8(92, 107, 192),
    Color::from_rgb_u8(171, 71, 188),
];

/// Fill assigned to a merge identity.
///
/// Colored identities map onto fixed hues; numbered identities cycle through
/// a seven-entry palette so every digit stays distinguishable.
#[must_use]
pub fn identity_fill(identity: TileIdentity) -> Color {
    match identity {
        TileIdentity::Color { color } => match color {
            TileColor::Red => Color::from_rgb_u8(229, 57, 53),
            TileColor::Green => Color::from_rgb_u8(67, 160, 71),
            TileColor::Blue => Color::from_rgb_u8(30, 136, 229),
        },
        TileIdentity::Numbered { id } => NUMBERED_FILLS[id as usize % NUMBERED_FILLS.len()],
    }
}

/// Position of a tile in world units, interpolated along its active motion.
///
/// A resting tile sits at its cell origin. A moving tile is blended towards
/// its target cell by the provided progress, which is clamped so an overshoot
/// on the final integration step never renders past the destination.
#[must_use]
pub fn tile_position(
    cell: CellCoord,
    target: Option<CellCoord>,
    progress: f32,
    tile_length: f32,
) -> Vec2 {
    let origin = cell_origin(cell, tile_length);
    match target {
        Some(target) => origin.lerp(cell_origin(target, tile_length), progress.clamp(0.0, 1.0)),
        None => origin,
    }
}

fn cell_origin(cell: CellCoord, tile_length: f32) -> Vec2 {
    Vec2::new(cell.column() as f32, cell.row() as f32) * tile_length
}

bitflags! {
    /// Edges along which a tile is fused to a neighbor of the same group.
    ///
    /// Backends drop the border between fused neighbors so a merged piece
    /// reads as one connected slab.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EdgeMask: u8 {
        /// The tile above belongs to the same fused group.
        const NORTH = 1 << 0;
        /// The tile to the right belongs to the same fused group.
        const EAST = 1 << 1;
        /// The tile below belongs to the same fused group.
        const SOUTH = 1 << 2;
        /// The tile to the left belongs to the same fused group.
        const WEST = 1 << 3;
    }
}

/// Computes the fused edges of a cell.
///
/// The `fused_with` closure should report whether the queried neighbor cell
/// belongs to the same fused group; it is never invoked for coordinates that
/// would leave the addressable grid.
#[must_use]
pub fn fused_edges<F>(cell: CellCoord, mut fused_with: F) -> EdgeMask
where
    F: FnMut(CellCoord) -> bool,
{
    let mut edges = EdgeMask::empty();

    if let Some(row) = cell.row().checked_sub(1) {
        if fused_with(CellCoord::new(cell.column(), row)) {
            edges.insert(EdgeMask::NORTH);
        }
    }
    if let Some(column) = cell.column().checked_add(1) {
        if fused_with(CellCoord::new(column, cell.row())) {
            edges.insert(EdgeMask::EAST);
        }
    }
    if let Some(row) = cell.row().checked_add(1) {
        if fused_with(CellCoord::new(cell.column(), row)) {
            edges.insert(EdgeMask::SOUTH);
        }
    }
    if let Some(column) = cell.column().checked_sub(1) {
        if fused_with(CellCoord::new(column, cell.row())) {
            edges.insert(EdgeMask::WEST);
        }
    }

    edges
}

/// Describes the board grid that frames every scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single tile expressed in world units.
    pub tile_length: f32,
    /// Color used when drawing grid lines.
    pub line_color: Color,
    /// Solid color painted behind the tiles.
    pub background: Color,
}

impl GridPresentation {
    /// Creates a new grid descriptor.
    ///
    /// Returns an error when `tile_length` is not strictly positive.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_length: f32,
        line_color: Color,
        background: Color,
    ) -> Result<Self, RenderingError> {
        if tile_length <= 0.0 {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
            line_color,
            background,
        })
    }

    /// Calculates the total width of the grid.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Calculates the total height of the grid.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }
}

/// Single tile prepared for presentation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileVisual {
    /// Cell the tile currently occupies in the grid.
    pub cell: CellCoord,
    /// Kind of the presented tile.
    pub kind: TileKind,
    /// Merge identity of the tile, if it carries one.
    pub identity: Option<TileIdentity>,
    /// Fill color resolved from the tile's identity and merge state.
    pub fill: Color,
    /// Position of the tile's top-left corner in world units.
    pub position: Vec2,
    /// Whether the tile is currently animating towards a target cell.
    pub in_motion: bool,
    /// Edges along which the tile is fused to its neighbors.
    pub edges: EdgeMask,
}

/// Scene description combining the board grid and its tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Grid that frames the play area.
    pub grid: GridPresentation,
    /// Tiles visible on the board, in row-major order.
    pub tiles: Vec<TileVisual>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub const fn new(grid: GridPresentation, tiles: Vec<TileVisual>) -> Self {
        Self { grid, tiles }
    }

    /// Reports whether any tile in the scene is still animating.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.tiles.iter().any(|tile| tile.in_motion)
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Tile length must be strictly positive to give tiles an area.
    InvalidTileLength {
        /// Provided length that failed validation.
        tile_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileLength { tile_length } => {
                write!(f, "tile_length must be positive (received {tile_length})")
            }
        }
    }
}

impl Error for RenderingError {}
