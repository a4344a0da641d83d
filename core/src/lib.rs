#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Fuseblocks engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Fuseblocks.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the grid with an empty field of the provided dimensions.
    ConfigureGrid {
        /// Number of columns laid out in the grid.
        columns: u32,
        /// Number of rows laid out in the grid.
        rows: u32,
    },
    /// Writes a single tile seed into the grid during level assembly.
    PlaceTile {
        /// Cell that receives the tile.
        cell: CellCoord,
        /// Seed describing the tile to place.
        tile: TileSeed,
    },
    /// Seals level assembly and arms the simulation.
    StartLevel,
    /// Requests that the piece occupying a cell shift one column sideways.
    QueueMove {
        /// Cell occupied by the piece the player grabbed.
        cell: CellCoord,
        /// Direction of the requested shift.
        direction: Direction,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Replaces the entire grid with a previously captured snapshot.
    RestoreSnapshot {
        /// Settled grid state to restore.
        snapshot: GridSnapshot,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the grid was replaced with an empty field.
    GridConfigured {
        /// Number of columns laid out in the grid.
        columns: u32,
        /// Number of rows laid out in the grid.
        rows: u32,
    },
    /// Confirms that a tile seed was written into the grid.
    TilePlaced {
        /// Cell that received the tile.
        cell: CellCoord,
    },
    /// Reports that a tile placement request was rejected.
    TilePlacementRejected {
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Announces that level assembly finished and the simulation is live.
    LevelStarted {
        /// Number of distinct merge identities present at start.
        identities: u32,
        /// Number of pieces present at start.
        pieces: u32,
    },
    /// Confirms that a move request entered the pending queue.
    MoveQueued {
        /// Cell occupied by the piece the player grabbed.
        cell: CellCoord,
        /// Direction of the requested shift.
        direction: Direction,
    },
    /// Confirms that a queued move was resolved and its pieces set in motion.
    MoveAccepted {
        /// Cell that originated the move request.
        cell: CellCoord,
        /// Direction of the accepted shift.
        direction: Direction,
        /// Number of tiles displaced by the move, pushed pieces included.
        tiles: u32,
    },
    /// Reports that a move request was refused.
    MoveRejected {
        /// Cell that originated the move request.
        cell: CellCoord,
        /// Direction of the refused shift.
        direction: Direction,
        /// Specific reason the move failed.
        reason: MoveRejection,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a group of tiles fused into one compound piece.
    TilesMerged {
        /// Identity shared by the fused tiles.
        identity: TileIdentity,
        /// Cells of every tile in the fused group, in row-major order.
        cells: Vec<CellCoord>,
        /// Indicates whether the fused group became permanently static.
        locked: bool,
    },
    /// Announces that every identity collapsed into a single piece.
    LevelWon {
        /// Number of pieces remaining on the winning grid.
        pieces: u32,
    },
    /// Confirms that the grid was replaced from a snapshot.
    GridRestored {
        /// Number of columns in the restored grid.
        columns: u32,
        /// Number of rows in the restored grid.
        rows: u32,
    },
}

/// Horizontal directions a piece can be shifted by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Signed column delta applied when moving one cell in this direction.
    #[must_use]
    pub const fn column_offset(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the neighboring cell one column over in the provided direction.
    ///
    /// Yields `None` when the shift would leave the coordinate space.
    #[must_use]
    pub fn shifted(self, direction: Direction) -> Option<CellCoord> {
        let column = match direction {
            Direction::Left => self.column.checked_sub(1)?,
            Direction::Right => self.column.checked_add(1)?,
        };
        Some(Self::new(column, self.row))
    }

    /// Returns the cell directly beneath this one.
    #[must_use]
    pub fn below(self) -> Option<CellCoord> {
        let row = self.row.checked_add(1)?;
        Some(Self::new(self.column, row))
    }
}

/// Hues available to colored block families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileColor {
    /// Red block family.
    Red,
    /// Green block family.
    Green,
    /// Blue block family.
    Blue,
}

/// Merge identity shared by tiles that can fuse with one another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileIdentity {
    /// Colored block family keyed by hue.
    Color {
        /// Hue shared by every member of the family.
        color: TileColor,
    },
    /// Numbered block family keyed by the digit printed on its tiles.
    Numbered {
        /// Digit that identifies the family.
        id: u8,
    },
}

impl TileIdentity {
    /// Creates the identity shared by blocks of the provided color.
    #[must_use]
    pub const fn colored(color: TileColor) -> Self {
        Self::Color { color }
    }

    /// Creates the identity shared by numbered blocks with the given digit.
    #[must_use]
    pub const fn numbered(id: u8) -> Self {
        Self::Numbered { id }
    }
}

/// Base classification assigned to every grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Vacant cell that pieces may move through.
    Empty,
    /// Immovable cell that blocks movement and supports pieces above it.
    Static,
    /// Cell holding a block that moves and falls.
    Movable,
}

bitflags::bitflags! {
    /// Modifier flags layered on top of a tile's base classification.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TileFlags: u8 {
        /// Tile participates in merge detection with same-identity neighbors.
        const MERGEABLE = 1 << 0;
        /// Tile already belongs to a merged compound piece.
        const MERGED = 1 << 1;
    }
}

/// Loadable description of a single grid cell.
///
/// Seeds capture the persistent identity of a tile without any motion state.
/// Legal shapes are an empty cell (no identity, no flags), a plain wall
/// (`Static` without identity), an anchor (`Static` plus `MERGEABLE` with
/// identity), and movable blocks (`Movable` with identity, `MERGEABLE` and
/// optionally `MERGED`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSeed {
    kind: TileKind,
    flags: TileFlags,
    identity: Option<TileIdentity>,
}

impl TileSeed {
    /// Creates a seed from explicit classification, flags, and identity.
    #[must_use]
    pub const fn new(kind: TileKind, flags: TileFlags, identity: Option<TileIdentity>) -> Self {
        Self {
            kind,
            flags,
            identity,
        }
    }

    /// Creates the seed for an empty cell.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            kind: TileKind::Empty,
            flags: TileFlags::empty(),
            identity: None,
        }
    }

    /// Creates the seed for an immovable wall without merge identity.
    #[must_use]
    pub const fn wall() -> Self {
        Self {
            kind: TileKind::Static,
            flags: TileFlags::empty(),
            identity: None,
        }
    }

    /// Creates the seed for a movable block carrying the provided identity.
    #[must_use]
    pub const fn movable(identity: TileIdentity) -> Self {
        Self {
            kind: TileKind::Movable,
            flags: TileFlags::MERGEABLE,
            identity: Some(identity),
        }
    }

    /// Creates the seed for a static anchor that fuses with same-identity
    /// blocks without ever moving itself.
    #[must_use]
    pub const fn anchored(identity: TileIdentity) -> Self {
        Self {
            kind: TileKind::Static,
            flags: TileFlags::MERGEABLE,
            identity: Some(identity),
        }
    }

    /// Base classification of the tile.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// Modifier flags layered on the classification.
    #[must_use]
    pub const fn flags(&self) -> TileFlags {
        self.flags
    }

    /// Merge identity carried by the tile, if any.
    #[must_use]
    pub const fn identity(&self) -> Option<TileIdentity> {
        self.identity
    }

    /// Reports whether the seed describes an empty cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, TileKind::Empty)
    }

    /// Reports whether the tile can be displaced by moves or gravity.
    #[must_use]
    pub fn is_movable(&self) -> bool {
        matches!(self.kind, TileKind::Movable)
    }

    /// Reports whether the tile participates in merge detection.
    #[must_use]
    pub fn is_mergeable(&self) -> bool {
        self.flags.contains(TileFlags::MERGEABLE)
    }

    /// Reports whether the tile already belongs to a merged compound.
    #[must_use]
    pub fn is_merged(&self) -> bool {
        self.flags.contains(TileFlags::MERGED)
    }
}

/// Serialized capture of a settled grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    columns: u32,
    rows: u32,
    tiles: Vec<TileSeed>,
}

impl GridSnapshot {
    /// Creates a snapshot from dimensions and row-major tile seeds.
    #[must_use]
    pub fn new(columns: u32, rows: u32, tiles: Vec<TileSeed>) -> Self {
        Self {
            columns,
            rows,
            tiles,
        }
    }

    /// Number of columns captured by the snapshot.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows captured by the snapshot.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Row-major tile seeds captured by the snapshot.
    #[must_use]
    pub fn tiles(&self) -> &[TileSeed] {
        &self.tiles
    }

    /// Reports whether the tile list matches the captured dimensions.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        u64::from(self.columns) * u64::from(self.rows) == self.tiles.len() as u64
    }
}

/// Reasons a tile placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies beyond the configured grid bounds.
    OutOfBounds,
}

/// Reasons a move request may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// The pending move queue is at capacity, so the request was discarded.
    QueueFull,
    /// The targeted cell holds no piece that can move.
    NotMovable,
    /// A wall or static piece blocks the path of the shift.
    Blocked,
    /// The level was already won, so input is no longer accepted.
    LevelComplete,
}

/// Whole-level summary exposed to adapters and systems.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelStatus {
    started: bool,
    busy: bool,
    won: bool,
}

impl LevelStatus {
    /// Creates a status summary from its component facts.
    #[must_use]
    pub const fn new(started: bool, busy: bool, won: bool) -> Self {
        Self { started, busy, won }
    }

    /// Reports whether level assembly has been sealed by `StartLevel`.
    #[must_use]
    pub const fn started(&self) -> bool {
        self.started
    }

    /// Reports whether a move set is currently in flight.
    #[must_use]
    pub const fn busy(&self) -> bool {
        self.busy
    }

    /// Reports whether the win condition has been reached.
    #[must_use]
    pub const fn won(&self) -> bool {
        self.won
    }

    /// Reports whether the level currently accepts player moves.
    #[must_use]
    pub const fn running(&self) -> bool {
        self.started && !self.won
    }
}
