#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives scripted Fuseblocks sessions.

mod board_transfer;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{bail, Context};
use clap::Parser;
use fuseblocks_core::{
    CellCoord, Command, Direction, Event, MoveRejection, TileColor, TileFlags, TileIdentity,
    TileKind,
};
use fuseblocks_rendering::{
    fused_edges, identity_fill, tile_position, EdgeMask, GridPresentation, Scene, TileVisual,
    BACKGROUND_COLOR, GRID_LINE_COLOR, MERGED_LIGHTEN, WALL_FILL,
};
use fuseblocks_system_analytics::{Analytics, PlaySummary};
use fuseblocks_system_history::History;
use fuseblocks_system_input::{Gesture, Input};
use fuseblocks_system_levels::{builtin_levels, load_level, parse_level};
use fuseblocks_world::{apply, query, World};

use crate::board_transfer::BoardTransfer;

/// Duration of one simulated tick applied while the board settles.
const TICK: Duration = Duration::from_millis(100);

/// Upper bound on settling ticks applied after each script step.
const MAX_SETTLE_TICKS: u32 = 256;

/// Side length of a rendered tile expressed in world units.
const TILE_LENGTH: f32 = 32.0;

/// Plays a Fuseblocks board from the command line.
#[derive(Debug, Parser)]
#[command(name = "fuseblocks")]
struct Args {
    /// Index of the built-in level to play.
    #[arg(long, default_value_t = 0, conflicts_with_all = ["map", "restore"])]
    level: usize,

    /// Path to a character-map file describing the board to play.
    #[arg(long, conflicts_with = "restore")]
    map: Option<PathBuf>,

    /// Board string produced by --share, restoring that board instead.
    #[arg(long)]
    restore: Option<String>,

    /// Whitespace-separated steps: COLxROW followed by L or R shifts the
    /// piece at that cell, U undoes the latest move.
    #[arg(long)]
    script: Option<String>,

    /// Prints a board string for the final grid, suitable for --restore.
    #[arg(long)]
    share: bool,
}

/// One parsed step of a move script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScriptStep {
    /// Shifts the piece occupying a cell one column sideways.
    Move {
        /// Cell occupied by the piece to shift.
        cell: CellCoord,
        /// Direction of the requested shift.
        direction: Direction,
    },
    /// Rewinds the board to the checkpoint before the latest move.
    Undo,
}

/// Pure systems driven alongside the world during a session.
#[derive(Debug, Default)]
struct Systems {
    input: Input,
    history: History,
    analytics: Analytics,
}

/// Entry point for the Fuseblocks command-line interface.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut world = World::new();
    let mut systems = Systems::default();

    println!("{}", query::welcome_banner(&world));

    let events = load_board(&args, &mut world, &mut systems)?;
    report(&events);
    let events = settle(&mut world, &mut systems)?;
    report(&events);
    println!("{}", render_board(&build_scene(&world)?));

    if let Some(script) = &args.script {
        for step in parse_script(script)? {
            match step {
                ScriptStep::Move { cell, direction } => {
                    run_move(&mut world, &mut systems, cell, direction)?;
                }
                ScriptStep::Undo => run_undo(&mut world, &mut systems)?,
            }
            println!("{}", render_board(&build_scene(&world)?));
        }
    }

    print_summary(systems.analytics.summary());

    if args.share {
        let transfer = BoardTransfer {
            snapshot: query::grid_snapshot(&world),
        };
        println!("board string: {}", transfer.encode());
    }

    if query::level_status(&world).won() {
        println!("board solved");
    } else {
        println!("board not solved");
    }
    Ok(())
}

/// Loads the board selected by the command-line arguments.
fn load_board(args: &Args, world: &mut World, systems: &mut Systems) -> anyhow::Result<Vec<Event>> {
    let mut events = Vec::new();

    if let Some(code) = &args.restore {
        let transfer = BoardTransfer::decode(code).context("could not decode the board string")?;
        apply(
            world,
            Command::RestoreSnapshot {
                snapshot: transfer.snapshot,
            },
            &mut events,
        );
        apply(world, Command::StartLevel, &mut events);
        route(&events, world, systems);
        return Ok(events);
    }

    let blueprint = if let Some(path) = &args.map {
        let map = fs::read_to_string(path)
            .with_context(|| format!("could not read level map {}", path.display()))?;
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("custom");
        parse_level(name, &map)?
    } else {
        let catalog = builtin_levels();
        catalog
            .get(args.level)
            .with_context(|| {
                format!(
                    "level index {} is out of range (the catalog holds {})",
                    args.level,
                    catalog.len()
                )
            })?
            .clone()
    };

    println!("level: {}", blueprint.name());
    load_level(world, &blueprint, &mut events)?;
    route(&events, world, systems);
    Ok(events)
}

/// Queues one scripted move through the input system and settles the board.
fn run_move(
    world: &mut World,
    systems: &mut Systems,
    cell: CellCoord,
    direction: Direction,
) -> anyhow::Result<()> {
    let released = cell.shifted(direction).with_context(|| {
        format!(
            "move at {}x{} cannot leave the grid",
            cell.column(),
            cell.row()
        )
    })?;

    let status = query::level_status(world);
    let mut commands = Vec::new();
    let view = query::grid_view(world);
    systems.input.handle(
        Gesture::new(Some(cell), Some(released)),
        status,
        |cell| {
            view.tile(cell)
                .is_some_and(|tile| tile.kind == TileKind::Movable)
        },
        &mut commands,
    );

    if commands.is_empty() {
        let reason = if status.running() {
            "nothing movable there"
        } else {
            "the board is no longer accepting moves"
        };
        println!("ignored move at {}x{}: {reason}", cell.column(), cell.row());
        return Ok(());
    }

    for command in commands {
        let events = pump(world, command, systems);
        report(&events);
    }
    let events = settle(world, systems)?;
    report(&events);
    Ok(())
}

/// Rewinds the board to the latest checkpoint and settles it.
fn run_undo(world: &mut World, systems: &mut Systems) -> anyhow::Result<()> {
    let Some(command) = systems.history.undo() else {
        println!("nothing to undo");
        return Ok(());
    };

    let events = pump(world, command, systems);
    report(&events);
    let events = settle(world, systems)?;
    report(&events);
    Ok(())
}

/// Ticks the world until motion stops and no resolvable move is pending.
fn settle(world: &mut World, systems: &mut Systems) -> anyhow::Result<Vec<Event>> {
    let mut collected = Vec::new();

    for _ in 0..MAX_SETTLE_TICKS {
        collected.extend(pump(world, Command::Tick { dt: TICK }, systems));
        let status = query::level_status(world);
        if !status.busy() && (query::pending_moves(world) == 0 || !status.running()) {
            return Ok(collected);
        }
    }

    bail!("board did not settle within {MAX_SETTLE_TICKS} ticks")
}

/// Applies one command and routes its events through every system.
fn pump(world: &mut World, command: Command, systems: &mut Systems) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, command, &mut events);
    route(&events, world, systems);
    events
}

/// Feeds a batch of events to the history and statistics systems.
fn route(events: &[Event], world: &World, systems: &mut Systems) {
    systems
        .history
        .handle(events, || query::grid_snapshot(world));
    systems.analytics.handle(events);
}

/// Parses a whitespace-separated move script.
fn parse_script(script: &str) -> anyhow::Result<Vec<ScriptStep>> {
    script.split_whitespace().map(parse_step).collect()
}

fn parse_step(token: &str) -> anyhow::Result<ScriptStep> {
    if token.eq_ignore_ascii_case("u") {
        return Ok(ScriptStep::Undo);
    }

    let direction = match token.chars().last() {
        Some('L' | 'l') => Direction::Left,
        Some('R' | 'r') => Direction::Right,
        _ => bail!("script step '{token}' must end in L or R, or be U"),
    };

    let coordinates = &token[..token.len() - 1];
    let (column, row) = coordinates
        .split_once(['x', 'X'])
        .with_context(|| format!("script step '{token}' is missing its COLxROW cell"))?;
    let column = column
        .parse::<u32>()
        .with_context(|| format!("script step '{token}' has an unreadable column"))?;
    let row = row
        .parse::<u32>()
        .with_context(|| format!("script step '{token}' has an unreadable row"))?;

    Ok(ScriptStep::Move {
        cell: CellCoord::new(column, row),
        direction,
    })
}

/// Prints the events a player would want to hear about.
fn report(events: &[Event]) {
    for event in events {
        match event {
            Event::LevelStarted { identities, pieces } => {
                println!("{pieces} pieces on the board, {identities} identities to fuse");
            }
            Event::MoveAccepted {
                cell,
                direction,
                tiles,
            } => println!(
                "shifted {} tile(s) {} from {}x{}",
                tiles,
                direction_label(*direction),
                cell.column(),
                cell.row()
            ),
            Event::MoveRejected {
                cell,
                direction,
                reason,
            } => println!(
                "move {} from {}x{} rejected: {}",
                direction_label(*direction),
                cell.column(),
                cell.row(),
                rejection_label(*reason)
            ),
            Event::TilesMerged { cells, locked, .. } => println!(
                "{} tiles fused{}",
                cells.len(),
                if *locked { " and locked in place" } else { "" }
            ),
            Event::LevelWon { pieces } => {
                println!("level solved with {pieces} piece(s) remaining");
            }
            Event::GridRestored { columns, rows } => {
                println!("restored a {columns}x{rows} board");
            }
            _ => {}
        }
    }
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Left => "left",
        Direction::Right => "right",
    }
}

fn rejection_label(reason: MoveRejection) -> &'static str {
    match reason {
        MoveRejection::QueueFull => "the move queue is full",
        MoveRejection::NotMovable => "no movable piece occupies that cell",
        MoveRejection::Blocked => "the shift runs into something solid",
        MoveRejection::LevelComplete => "the level is already solved",
    }
}

/// Prints the session totals gathered by the statistics system.
fn print_summary(summary: PlaySummary) {
    println!(
        "moves: {} queued, {} accepted, {} rejected; merges: {} ({} locked); undos: {}; ticks: {}",
        summary.moves_queued,
        summary.moves_accepted,
        summary.moves_rejected,
        summary.merges,
        summary.locked_merges,
        summary.undos,
        summary.ticks
    );
}

/// Builds a presentation scene from the world's current grid view.
fn build_scene(world: &World) -> anyhow::Result<Scene> {
    let view = query::grid_view(world);
    let (columns, rows) = view.dimensions();
    let grid =
        GridPresentation::new(columns, rows, TILE_LENGTH, GRID_LINE_COLOR, BACKGROUND_COLOR)?;

    let tiles = view
        .iter()
        .filter(|tile| tile.kind != TileKind::Empty)
        .map(|tile| {
            let fill = match tile.identity {
                Some(identity) => {
                    let fill = identity_fill(identity);
                    if tile.flags.contains(TileFlags::MERGED) {
                        fill.lighten(MERGED_LIGHTEN)
                    } else {
                        fill
                    }
                }
                None => WALL_FILL,
            };
            let edges = if tile.flags.contains(TileFlags::MERGED) {
                fused_edges(tile.cell, |neighbor| {
                    view.tile(neighbor).is_some_and(|other| {
                        other.identity == tile.identity && other.flags.contains(TileFlags::MERGED)
                    })
                })
            } else {
                EdgeMask::empty()
            };

            TileVisual {
                cell: tile.cell,
                kind: tile.kind,
                identity: tile.identity,
                fill,
                position: tile_position(
                    tile.cell,
                    tile.in_motion.then_some(tile.target),
                    tile.progress,
                    TILE_LENGTH,
                ),
                in_motion: tile.in_motion,
                edges,
            }
        })
        .collect();

    Ok(Scene::new(grid, tiles))
}

/// Formats a scene as an ASCII board.
///
/// Each cell prints as a glyph plus a connector column: `-` joins cells fused
/// along their shared edge. Walls print as `#`, anchors and locked tiles as
/// uppercase codes, movable tiles as lowercase codes, empty cells as `.`.
fn render_board(scene: &Scene) -> String {
    let columns = scene.grid.columns as usize;
    let rows = scene.grid.rows as usize;
    let mut cells = vec![('.', ' '); columns.saturating_mul(rows)];

    for tile in &scene.tiles {
        let column = tile.cell.column() as usize;
        let row = tile.cell.row() as usize;
        if let Some(slot) = cells.get_mut(row.saturating_mul(columns).saturating_add(column)) {
            let connector = if tile.edges.contains(EdgeMask::EAST) {
                '-'
            } else {
                ' '
            };
            *slot = (tile_glyph(tile), connector);
        }
    }

    let mut board = String::with_capacity(rows.saturating_mul(columns.saturating_mul(2)));
    for row in 0..rows {
        for column in 0..columns {
            let (glyph, connector) = cells[row * columns + column];
            board.push(glyph);
            if column + 1 < columns {
                board.push(connector);
            }
        }
        board.push('\n');
    }
    board
}

fn tile_glyph(tile: &TileVisual) -> char {
    match (tile.kind, tile.identity) {
        (TileKind::Static, None) => '#',
        (TileKind::Static, Some(identity)) => identity_glyph(identity).to_ascii_uppercase(),
        (_, Some(identity)) => identity_glyph(identity),
        (_, None) => '.',
    }
}

fn identity_glyph(identity: TileIdentity) -> char {
    match identity {
        TileIdentity::Color { color } => match color {
            TileColor::Red => 'r',
            TileColor::Green => 'g',
            TileColor::Blue => 'b',
        },
        TileIdentity::Numbered { id } => char::from(b'0'.saturating_add(id % 10)),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_script, parse_step, render_board, ScriptStep};
    use fuseblocks_core::{CellCoord, Direction, TileColor, TileIdentity, TileKind};
    use fuseblocks_rendering::{
        identity_fill, EdgeMask, GridPresentation, Scene, TileVisual, BACKGROUND_COLOR,
        GRID_LINE_COLOR, WALL_FILL,
    };
    use glam::Vec2;

    #[test]
    fn scripts_parse_moves_and_undos() {
        let steps = parse_script("0x0R 3x1L u").expect("script parses");

        assert_eq!(
            steps,
            vec![
                ScriptStep::Move {
                    cell: CellCoord::new(0, 0),
                    direction: Direction::Right,
                },
                ScriptStep::Move {
                    cell: CellCoord::new(3, 1),
                    direction: Direction::Left,
                },
                ScriptStep::Undo,
            ]
        );
    }

    #[test]
    fn malformed_script_steps_are_rejected() {
        assert!(parse_step("0x0").is_err());
        assert!(parse_step("00R").is_err());
        assert!(parse_step("axbR").is_err());
        assert!(parse_step("w").is_err());
    }

    #[test]
    fn boards_render_glyphs_and_fused_connectors() {
        let grid = GridPresentation::new(3, 1, 32.0, GRID_LINE_COLOR, BACKGROUND_COLOR)
            .expect("valid grid");
        let red = TileIdentity::colored(TileColor::Red);
        let tiles = vec![
            TileVisual {
                cell: CellCoord::new(0, 0),
                kind: TileKind::Movable,
                identity: Some(red),
                fill: identity_fill(red),
                position: Vec2::ZERO,
                in_motion: false,
                edges: EdgeMask::EAST,
            },
            TileVisual {
                cell: CellCoord::new(1, 0),
                kind: TileKind::Movable,
                identity: Some(red),
                fill: identity_fill(red),
                position: Vec2::new(32.0, 0.0),
                in_motion: false,
                edges: EdgeMask::WEST,
            },
        ];

        assert_eq!(render_board(&Scene::new(grid, tiles)), "r-r .\n");
    }

    #[test]
    fn locked_tiles_render_uppercase() {
        let grid = GridPresentation::new(2, 1, 32.0, GRID_LINE_COLOR, BACKGROUND_COLOR)
            .expect("valid grid");
        let blue = TileIdentity::colored(TileColor::Blue);
        let tiles = vec![
            TileVisual {
                cell: CellCoord::new(0, 0),
                kind: TileKind::Static,
                identity: Some(blue),
                fill: identity_fill(blue),
                position: Vec2::ZERO,
                in_motion: false,
                edges: EdgeMask::empty(),
            },
            TileVisual {
                cell: CellCoord::new(1, 0),
                kind: TileKind::Static,
                identity: None,
                fill: WALL_FILL,
                position: Vec2::new(32.0, 0.0),
                in_motion: false,
                edges: EdgeMask::empty(),
            },
        ];

        assert_eq!(render_board(&Scene::new(grid, tiles)), "B #\n");
    }
}
