#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level catalog and character-map parsing for Fuseblocks boards.

use fuseblocks_core::{CellCoord, Command, Event, TileColor, TileIdentity, TileSeed};
use fuseblocks_world::{self as world, World};
use thiserror::Error;

/// Marker that turns the following tile code into a static anchor.
const ANCHOR_MARKER: char = 's';

/// Declarative description of a board layout ready to be loaded into a world.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelBlueprint {
    name: String,
    columns: u32,
    rows: u32,
    tiles: Vec<(CellCoord, TileSeed)>,
}

impl LevelBlueprint {
    /// Creates a blueprint from explicit dimensions and tile placements.
    #[must_use]
    pub fn new<T>(name: T, columns: u32, rows: u32, tiles: Vec<(CellCoord, TileSeed)>) -> Self
    where
        T: Into<String>,
    {
        Self {
            name: name.into(),
            columns,
            rows,
            tiles,
        }
    }

    /// Human-readable name shown when listing the catalog.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of columns the board occupies.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows the board occupies.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Tiles placed by the blueprint, in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[(CellCoord, TileSeed)] {
        &self.tiles
    }

    /// Command sequence that realises the blueprint inside a world.
    ///
    /// The sequence configures the grid, places every tile and finally starts
    /// the level so pre-assembled groups fuse before the first input arrives.
    #[must_use]
    pub fn commands(&self) -> Vec<Command> {
        let mut commands = Vec::with_capacity(self.tiles.len().saturating_add(2));
        commands.push(Command::ConfigureGrid {
            columns: self.columns,
            rows: self.rows,
        });
        for (cell, tile) in &self.tiles {
            commands.push(Command::PlaceTile {
                cell: *cell,
                tile: *tile,
            });
        }
        commands.push(Command::StartLevel);
        commands
    }
}

/// Parses a character map into a level blueprint.
///
/// Each line of the map describes one row of the board. A space leaves the
/// cell empty, `x` places a wall, `r`, `g` and `b` place movable colored
/// tiles, `0` through `6` place movable numbered tiles, and an `s` prefix
/// turns the following code into a static anchor of the same identity.
pub fn parse_level(name: &str, map: &str) -> Result<LevelBlueprint, LevelError> {
    let mut tiles = Vec::new();
    let mut columns = 0_u32;
    let mut row = 0_u32;

    for line in map.lines() {
        let line = line.trim_end_matches('\r');
        let mut column = 0_u32;
        let mut codes = line.chars();

        while let Some(code) = codes.next() {
            let seed = if code == ANCHOR_MARKER {
                let anchored = codes.next().ok_or(LevelError::DanglingAnchor { row })?;
                let identity = identity_for(anchored)
                    .ok_or(LevelError::UnanchorableCode { code: anchored, row })?;
                Some(TileSeed::anchored(identity))
            } else {
                seed_for(code).ok_or(LevelError::UnknownCode { code, row })?
            };

            if let Some(seed) = seed {
                tiles.push((CellCoord::new(column, row), seed));
            }
            column += 1;
        }

        if row == 0 {
            columns = column;
        } else if column != columns {
            return Err(LevelError::RaggedRow {
                row,
                expected: columns,
                found: column,
            });
        }
        row += 1;
    }

    if row == 0 || columns == 0 {
        return Err(LevelError::EmptyMap);
    }

    Ok(LevelBlueprint::new(name, columns, row, tiles))
}

fn seed_for(code: char) -> Option<Option<TileSeed>> {
    match code {
        ' ' => Some(None),
        'x' => Some(Some(TileSeed::wall())),
        _ => identity_for(code).map(|identity| Some(TileSeed::movable(identity))),
    }
}

fn identity_for(code: char) -> Option<TileIdentity> {
    match code {
        'r' => Some(TileIdentity::colored(TileColor::Red)),
        'g' => Some(TileIdentity::colored(TileColor::Green)),
        'b' => Some(TileIdentity::colored(TileColor::Blue)),
        '0'..='6' => {
            let id = u8::try_from(u32::from(code) - u32::from('0')).ok()?;
            Some(TileIdentity::numbered(id))
        }
        _ => None,
    }
}

/// Applies a blueprint's command sequence to the provided world.
///
/// Events produced while loading are appended to `out_events`. A placement
/// rejection aborts the load, since a blueprint that does not fit its own
/// grid cannot produce a playable board.
pub fn load_level(
    world: &mut World,
    blueprint: &LevelBlueprint,
    out_events: &mut Vec<Event>,
) -> Result<(), LevelError> {
    for command in blueprint.commands() {
        let mut events = Vec::new();
        world::apply(world, command, &mut events);
        for event in &events {
            if let Event::TilePlacementRejected { cell, .. } = event {
                return Err(LevelError::PlacementFailed {
                    column: cell.column(),
                    row: cell.row(),
                });
            }
        }
        out_events.append(&mut events);
    }
    Ok(())
}

/// Returns the built-in level catalog in play order.
#[must_use]
pub fn builtin_levels() -> Vec<LevelBlueprint> {
    let maps: [(&str, &str); 3] = [
        ("first contact", "r r"),
        ("drop zone", concat!("b  \n", "x  \n", "  b")),
        ("anchor yard", concat!("r  r  \n", "sr  b b")),
    ];

    maps.iter()
        .map(|(name, map)| parse_level(name, map).expect("built-in level maps always parse"))
        .collect()
}

/// Errors produced while parsing or loading level blueprints.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// The map contained no rows or no columns.
    #[error("level map contains no cells")]
    EmptyMap,
    /// A row held a different number of cells than the first row.
    #[error("row {row} holds {found} cells where {expected} were expected")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: u32,
        /// Cell count established by the first row.
        expected: u32,
        /// Cell count found in the offending row.
        found: u32,
    },
    /// A tile code was not part of the level alphabet.
    #[error("unrecognised tile code '{code}' in row {row}")]
    UnknownCode {
        /// Offending character.
        code: char,
        /// Zero-based index of the row containing the code.
        row: u32,
    },
    /// An anchor marker ended a row without naming a tile.
    #[error("anchor marker at the end of row {row} names no tile")]
    DanglingAnchor {
        /// Zero-based index of the row containing the marker.
        row: u32,
    },
    /// An anchor marker was followed by a code without a merge identity.
    #[error("anchor marker in row {row} cannot anchor '{code}'")]
    UnanchorableCode {
        /// Offending character following the marker.
        code: char,
        /// Zero-based index of the row containing the marker.
        row: u32,
    },
    /// The world rejected one of the blueprint's tile placements.
    #[error("tile at column {column}, row {row} was rejected by the world")]
    PlacementFailed {
        /// Column of the rejected placement.
        column: u32,
        /// Row of the rejected placement.
        row: u32,
    },
}
