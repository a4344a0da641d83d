#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Fuseblocks.

use std::time::Duration;

use fuseblocks_core::{
    Command, Event, MoveRejection, PlacementError, WELCOME_BANNER,
};

mod gravity;
mod grid;
mod merge;
mod motion;
mod moves;
mod pieces;
mod queue;

use grid::Grid;
use merge::MergedGroup;
use motion::{ActiveMove, MoveAxis};
use queue::{MoveQueue, QueuedMove};

const DEFAULT_GRID_COLUMNS: u32 = 8;
const DEFAULT_GRID_ROWS: u32 = 8;

const MOVE_QUEUE_CAPACITY: usize = 8;

const SHIFT_CELLS_PER_SECOND: f32 = 6.0;
const FALL_CELLS_PER_SECOND: f32 = 10.0;

/// Represents the authoritative Fuseblocks world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    queue: MoveQueue,
    active: Option<ActiveMove>,
    started: bool,
    won: bool,
    tick_index: u64,
}

impl World {
    /// Creates a new Fuseblocks world ready for level assembly.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            grid: Grid::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS),
            queue: MoveQueue::new(),
            active: None,
            started: false,
            won: false,
            tick_index: 0,
        }
    }

    fn step(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if let Some(active) = self.active.take() {
            if motion::advance(&mut self.grid, &active, dt) {
                motion::commit(&mut self.grid, &active);
            } else {
                self.active = Some(active);
                return;
            }
        }

        if !self.started || self.won {
            return;
        }

        let partition = pieces::collect_pieces(&self.grid);
        let falling = gravity::resolve(&self.grid, &partition);
        if !falling.is_empty() {
            motion::begin_fall(&mut self.grid, &falling);
            self.active = Some(ActiveMove {
                axis: MoveAxis::Fall,
                cells: falling,
            });
            return;
        }

        self.settle(out_events);
        if self.won {
            return;
        }

        let Some(request) = self.queue.pop() else {
            return;
        };
        self.resolve_request(request, out_events);
    }

    fn resolve_request(&mut self, request: QueuedMove, out_events: &mut Vec<Event>) {
        let partition = pieces::collect_pieces(&self.grid);
        match moves::resolve(&self.grid, &partition, request.cell, request.direction) {
            moves::Outcome::Accepted { cells } => {
                motion::begin_shift(&mut self.grid, &cells, request.direction);
                out_events.push(Event::MoveAccepted {
                    cell: request.cell,
                    direction: request.direction,
                    tiles: cells.len() as u32,
                });
                self.active = Some(ActiveMove {
                    axis: MoveAxis::Shift(request.direction),
                    cells,
                });
            }
            moves::Outcome::Rejected { reason } => {
                out_events.push(Event::MoveRejected {
                    cell: request.cell,
                    direction: request.direction,
                    reason,
                });
            }
        }
    }

    fn settle(&mut self, out_events: &mut Vec<Event>) {
        let groups = merge::resolve(&mut self.grid);
        push_merge_events(&groups, out_events);
        let tally = merge::tally(&self.grid);
        if tally.is_won() && !self.won {
            self.won = true;
            out_events.push(Event::LevelWon {
                pieces: tally.pieces,
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { columns, rows } => {
            world.grid = Grid::new(columns, rows);
            world.queue.clear();
            world.active = None;
            world.started = false;
            world.won = false;
            out_events.push(Event::GridConfigured { columns, rows });
        }
        Command::PlaceTile { cell, tile } => {
            if world.grid.place(cell, tile) {
                out_events.push(Event::TilePlaced { cell });
            } else {
                out_events.push(Event::TilePlacementRejected {
                    cell,
                    reason: PlacementError::OutOfBounds,
                });
            }
        }
        Command::StartLevel => {
            world.started = true;
            world.won = false;
            let groups = merge::resolve(&mut world.grid);
            push_merge_events(&groups, out_events);
            let tally = merge::tally(&world.grid);
            out_events.push(Event::LevelStarted {
                identities: tally.identities,
                pieces: tally.pieces,
            });
            if tally.is_won() {
                world.won = true;
                out_events.push(Event::LevelWon {
                    pieces: tally.pieces,
                });
            }
        }
        Command::QueueMove { cell, direction } => {
            if world.won {
                out_events.push(Event::MoveRejected {
                    cell,
                    direction,
                    reason: MoveRejection::LevelComplete,
                });
            } else if world.queue.push(QueuedMove { cell, direction }) {
                out_events.push(Event::MoveQueued { cell, direction });
            } else {
                out_events.push(Event::MoveRejected {
                    cell,
                    direction,
                    reason: MoveRejection::QueueFull,
                });
            }
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            world.step(dt, out_events);
        }
        Command::RestoreSnapshot { snapshot } => {
            if let Some(grid) = Grid::restore(&snapshot) {
                let columns = grid.columns();
                let rows = grid.rows();
                world.grid = grid;
                world.queue.clear();
                world.active = None;
                world.won = merge::tally(&world.grid).is_won();
                out_events.push(Event::GridRestored { columns, rows });
            }
        }
    }
}

fn push_merge_events(groups: &[MergedGroup], out_events: &mut Vec<Event>) {
    for group in groups {
        out_events.push(Event::TilesMerged {
            identity: group.identity,
            cells: group.cells.clone(),
            locked: group.locked,
        });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use fuseblocks_core::{
        CellCoord, GridSnapshot, LevelStatus, TileFlags, TileIdentity, TileKind,
    };

    use super::{grid, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides a read-only view of the tile grid.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        GridView { grid: &world.grid }
    }

    /// Captures the settled tile state as a serializable snapshot.
    #[must_use]
    pub fn grid_snapshot(world: &World) -> GridSnapshot {
        world.grid.capture()
    }

    /// Summarizes the level's lifecycle for adapters and systems.
    #[must_use]
    pub fn level_status(world: &World) -> LevelStatus {
        LevelStatus::new(world.started, world.active.is_some(), world.won)
    }

    /// Number of player moves waiting in the pending queue.
    #[must_use]
    pub fn pending_moves(world: &World) -> usize {
        world.queue.len()
    }

    /// Read-only view into the dense tile grid.
    #[derive(Clone, Copy, Debug)]
    pub struct GridView<'a> {
        grid: &'a grid::Grid,
    }

    impl<'a> GridView<'a> {
        /// Provides the dimensions of the underlying grid.
        #[must_use]
        pub fn dimensions(&self) -> (u32, u32) {
            (self.grid.columns(), self.grid.rows())
        }

        /// Returns the tile occupying the provided cell, if inside the grid.
        #[must_use]
        pub fn tile(&self, cell: CellCoord) -> Option<TileSnapshot> {
            self.grid.tile(cell).map(|tile| snapshot(cell, tile))
        }

        /// Iterates every tile in row-major order.
        pub fn iter(&self) -> impl Iterator<Item = TileSnapshot> + 'a {
            let grid = self.grid;
            let columns = grid.columns();
            (0..grid.rows()).flat_map(move |row| {
                (0..columns).filter_map(move |column| {
                    let cell = CellCoord::new(column, row);
                    grid.tile(cell).map(|tile| snapshot(cell, tile))
                })
            })
        }
    }

    fn snapshot(cell: CellCoord, tile: &grid::Tile) -> TileSnapshot {
        TileSnapshot {
            cell,
            kind: tile.kind,
            flags: tile.flags,
            identity: tile.identity,
            target: tile.target,
            progress: tile.progress,
            in_motion: tile.in_motion,
        }
    }

    /// Immutable representation of a single tile used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct TileSnapshot {
        /// Cell the tile occupies in the settled grid.
        pub cell: CellCoord,
        /// Base classification of the tile.
        pub kind: TileKind,
        /// Modifier flags layered on the classification.
        pub flags: TileFlags,
        /// Merge identity carried by the tile, if any.
        pub identity: Option<TileIdentity>,
        /// Cell the tile is traveling toward.
        pub target: CellCoord,
        /// Normalized animation progress toward the target cell.
        pub progress: f32,
        /// Indicates whether the tile belongs to the in-flight move set.
        pub in_motion: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::{apply, query, World, MOVE_QUEUE_CAPACITY};
    use fuseblocks_core::{
        CellCoord, Command, Direction, Event, MoveRejection, TileColor, TileIdentity, TileKind,
        TileSeed,
    };
    use std::time::Duration;

    const TICK: Duration = Duration::from_millis(50);

    fn red() -> TileIdentity {
        TileIdentity::colored(TileColor::Red)
    }

    fn green() -> TileIdentity {
        TileIdentity::colored(TileColor::Green)
    }

    fn blue() -> TileIdentity {
        TileIdentity::colored(TileColor::Blue)
    }

    fn configured(columns: u32, rows: u32) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::ConfigureGrid { columns, rows }, &mut events);
        world
    }

    fn place(world: &mut World, column: u32, row: u32, seed: TileSeed) {
        let mut events = Vec::new();
        apply(
            world,
            Command::PlaceTile {
                cell: CellCoord::new(column, row),
                tile: seed,
            },
            &mut events,
        );
        assert!(matches!(events.as_slice(), [Event::TilePlaced { .. }]));
    }

    fn start(world: &mut World) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::StartLevel, &mut events);
        events
    }

    fn queue_move(world: &mut World, column: u32, row: u32, direction: Direction) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::QueueMove {
                cell: CellCoord::new(column, row),
                direction,
            },
            &mut events,
        );
        events
    }

    fn tick(world: &mut World, out_events: &mut Vec<Event>) {
        apply(world, Command::Tick { dt: TICK }, out_events);
    }

    fn run_until_settled(world: &mut World, out_events: &mut Vec<Event>) {
        for _ in 0..128 {
            tick(world, out_events);
            if !query::level_status(world).busy() {
                return;
            }
        }
        panic!("simulation failed to settle");
    }

    fn kind_at(world: &World, column: u32, row: u32) -> TileKind {
        query::grid_view(world)
            .tile(CellCoord::new(column, row))
            .expect("cell inside grid")
            .kind
    }

    fn identity_at(world: &World, column: u32, row: u32) -> Option<TileIdentity> {
        query::grid_view(world)
            .tile(CellCoord::new(column, row))
            .expect("cell inside grid")
            .identity
    }

    #[test]
    fn configure_grid_resets_state_and_reports_dimensions() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureGrid {
                columns: 6,
                rows: 4,
            },
            &mut events,
        );

        assert_eq!(events, vec![Event::GridConfigured { columns: 6, rows: 4 }]);
        assert_eq!(query::grid_view(&world).dimensions(), (6, 4));
        assert!(!query::level_status(&world).started());
    }

    #[test]
    fn place_tile_outside_the_grid_is_rejected() {
        let mut world = configured(3, 3);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceTile {
                cell: CellCoord::new(3, 0),
                tile: TileSeed::wall(),
            },
            &mut events,
        );
        assert!(matches!(
            events.as_slice(),
            [Event::TilePlacementRejected { .. }]
        ));
    }

    #[test]
    fn start_level_reports_piece_and_identity_counts() {
        let mut world = configured(4, 2);
        place(&mut world, 0, 1, TileSeed::movable(red()));
        place(&mut world, 2, 1, TileSeed::movable(red()));
        place(&mut world, 3, 1, TileSeed::movable(blue()));

        let events = start(&mut world);
        assert!(events.contains(&Event::LevelStarted {
            identities: 2,
            pieces: 3,
        }));
        assert!(query::level_status(&world).running());
    }

    #[test]
    fn start_level_fuses_preassembled_groups() {
        let mut world = configured(3, 1);
        place(&mut world, 0, 0, TileSeed::movable(red()));
        place(&mut world, 1, 0, TileSeed::movable(red()));

        let events = start(&mut world);
        assert!(events.iter().any(|event| matches!(
            event,
            Event::TilesMerged { locked: false, .. }
        )));
        assert!(events.contains(&Event::LevelStarted {
            identities: 1,
            pieces: 1,
        }));
        assert!(events.contains(&Event::LevelWon { pieces: 1 }));
        assert!(query::level_status(&world).won());
    }

    #[test]
    fn queued_move_shifts_a_tile_across_ticks() {
        let mut world = configured(4, 1);
        place(&mut world, 0, 0, TileSeed::movable(red()));
        place(&mut world, 3, 0, TileSeed::movable(red()));
        let _ = start(&mut world);

        assert_eq!(
            queue_move(&mut world, 0, 0, Direction::Right),
            vec![Event::MoveQueued {
                cell: CellCoord::new(0, 0),
                direction: Direction::Right,
            }]
        );

        let mut events = Vec::new();
        run_until_settled(&mut world, &mut events);

        assert!(events.contains(&Event::MoveAccepted {
            cell: CellCoord::new(0, 0),
            direction: Direction::Right,
            tiles: 1,
        }));
        assert_eq!(kind_at(&world, 0, 0), TileKind::Empty);
        assert_eq!(identity_at(&world, 1, 0), Some(red()));
    }

    #[test]
    fn push_chain_displaces_every_piece_together() {
        let mut world = configured(6, 1);
        place(&mut world, 0, 0, TileSeed::movable(red()));
        place(&mut world, 1, 0, TileSeed::movable(green()));
        place(&mut world, 4, 0, TileSeed::movable(green()));
        let _ = start(&mut world);

        let _ = queue_move(&mut world, 0, 0, Direction::Right);
        let mut events = Vec::new();
        run_until_settled(&mut world, &mut events);

        assert!(events.contains(&Event::MoveAccepted {
            cell: CellCoord::new(0, 0),
            direction: Direction::Right,
            tiles: 2,
        }));
        assert_eq!(identity_at(&world, 1, 0), Some(red()));
        assert_eq!(identity_at(&world, 2, 0), Some(green()));
    }

    #[test]
    fn blocked_move_leaves_the_grid_untouched() {
        let mut world = configured(4, 1);
        place(&mut world, 0, 0, TileSeed::movable(red()));
        place(&mut world, 1, 0, TileSeed::movable(green()));
        place(&mut world, 2, 0, TileSeed::wall());
        place(&mut world, 3, 0, TileSeed::movable(red()));
        let _ = start(&mut world);

        let before = query::grid_snapshot(&world);
        let _ = queue_move(&mut world, 0, 0, Direction::Right);
        let mut events = Vec::new();
        run_until_settled(&mut world, &mut events);

        assert!(events.contains(&Event::MoveRejected {
            cell: CellCoord::new(0, 0),
            direction: Direction::Right,
            reason: MoveRejection::Blocked,
        }));
        assert_eq!(query::grid_snapshot(&world), before);
    }

    #[test]
    fn stale_queued_move_is_rejected_at_resolution_time() {
        let mut world = configured(5, 1);
        place(&mut world, 0, 0, TileSeed::movable(red()));
        place(&mut world, 4, 0, TileSeed::movable(red()));
        let _ = start(&mut world);

        // Both requests name the starting cell; the first shift vacates it.
        let _ = queue_move(&mut world, 0, 0, Direction::Right);
        let _ = queue_move(&mut world, 0, 0, Direction::Right);

        let mut events = Vec::new();
        run_until_settled(&mut world, &mut events);

        assert!(events.contains(&Event::MoveAccepted {
            cell: CellCoord::new(0, 0),
            direction: Direction::Right,
            tiles: 1,
        }));
        assert!(events.contains(&Event::MoveRejected {
            cell: CellCoord::new(0, 0),
            direction: Direction::Right,
            reason: MoveRejection::NotMovable,
        }));
    }

    #[test]
    fn queue_overflow_rejects_and_preserves_pending_input() {
        let mut world = configured(12, 1);
        place(&mut world, 0, 0, TileSeed::movable(red()));
        place(&mut world, 11, 0, TileSeed::movable(red()));
        let _ = start(&mut world);

        for _ in 0..MOVE_QUEUE_CAPACITY {
            let events = queue_move(&mut world, 0, 0, Direction::Right);
            assert!(matches!(events.as_slice(), [Event::MoveQueued { .. }]));
        }
        let events = queue_move(&mut world, 0, 0, Direction::Right);
        assert_eq!(
            events,
            vec![Event::MoveRejected {
                cell: CellCoord::new(0, 0),
                direction: Direction::Right,
                reason: MoveRejection::QueueFull,
            }]
        );
        assert_eq!(query::pending_moves(&world), MOVE_QUEUE_CAPACITY);
    }

    #[test]
    fn unsupported_tile_falls_to_rest() {
        let mut world = configured(3, 4);
        place(&mut world, 1, 0, TileSeed::movable(red()));
        place(&mut world, 0, 3, TileSeed::movable(red()));
        let _ = start(&mut world);

        let mut events = Vec::new();
        run_until_settled(&mut world, &mut events);

        assert_eq!(kind_at(&world, 1, 0), TileKind::Empty);
        assert_eq!(identity_at(&world, 1, 3), Some(red()));
    }

    #[test]
    fn shift_off_a_ledge_falls_and_fuses() {
        // Pushing the upper red off its wall perch drops it onto the lower
        // red, which fuses the pair into one piece and wins the level.
        let mut world = configured(3, 3);
        place(&mut world, 0, 0, TileSeed::movable(red()));
        place(&mut world, 0, 1, TileSeed::wall());
        place(&mut world, 1, 2, TileSeed::movable(red()));
        let _ = start(&mut world);

        let _ = queue_move(&mut world, 0, 0, Direction::Right);
        let mut events = Vec::new();
        run_until_settled(&mut world, &mut events);

        assert!(events.iter().any(|event| matches!(
            event,
            Event::TilesMerged { locked: false, .. }
        )));
        assert!(events.contains(&Event::LevelWon { pieces: 1 }));
        assert_eq!(identity_at(&world, 1, 1), Some(red()));
        assert_eq!(identity_at(&world, 1, 2), Some(red()));
    }

    #[test]
    fn anchor_contact_locks_the_fused_group() {
        let mut world = configured(7, 1);
        place(&mut world, 0, 0, TileSeed::movable(red()));
        place(&mut world, 2, 0, TileSeed::anchored(red()));
        place(&mut world, 4, 0, TileSeed::movable(blue()));
        place(&mut world, 6, 0, TileSeed::movable(blue()));
        let _ = start(&mut world);

        let _ = queue_move(&mut world, 0, 0, Direction::Right);
        let mut events = Vec::new();
        run_until_settled(&mut world, &mut events);

        assert!(events.iter().any(|event| matches!(
            event,
            Event::TilesMerged { locked: true, .. }
        )));
        assert_eq!(kind_at(&world, 1, 0), TileKind::Static);
        assert_eq!(kind_at(&world, 2, 0), TileKind::Static);

        let _ = queue_move(&mut world, 1, 0, Direction::Left);
        let mut late_events = Vec::new();
        run_until_settled(&mut world, &mut late_events);
        assert!(late_events.contains(&Event::MoveRejected {
            cell: CellCoord::new(1, 0),
            direction: Direction::Left,
            reason: MoveRejection::NotMovable,
        }));
    }

    #[test]
    fn winning_freezes_further_input() {
        let mut world = configured(3, 1);
        place(&mut world, 0, 0, TileSeed::movable(red()));
        place(&mut world, 2, 0, TileSeed::movable(red()));
        let _ = start(&mut world);

        let _ = queue_move(&mut world, 0, 0, Direction::Right);
        let mut events = Vec::new();
        run_until_settled(&mut world, &mut events);
        assert!(events.contains(&Event::LevelWon { pieces: 1 }));

        let rejection = queue_move(&mut world, 1, 0, Direction::Left);
        assert_eq!(
            rejection,
            vec![Event::MoveRejected {
                cell: CellCoord::new(1, 0),
                direction: Direction::Left,
                reason: MoveRejection::LevelComplete,
            }]
        );
    }

    #[test]
    fn win_event_is_emitted_exactly_once() {
        let mut world = configured(3, 1);
        place(&mut world, 0, 0, TileSeed::movable(red()));
        place(&mut world, 1, 0, TileSeed::movable(red()));

        let events = start(&mut world);
        assert_eq!(
            events
                .iter()
                .filter(|event| matches!(event, Event::LevelWon { .. }))
                .count(),
            1
        );

        let mut later = Vec::new();
        for _ in 0..8 {
            tick(&mut world, &mut later);
        }
        assert!(later
            .iter()
            .all(|event| matches!(event, Event::TimeAdvanced { .. })));
    }

    #[test]
    fn settled_grids_stay_settled_across_idle_ticks() {
        let mut world = configured(4, 2);
        place(&mut world, 0, 1, TileSeed::movable(red()));
        place(&mut world, 2, 1, TileSeed::movable(red()));
        let _ = start(&mut world);

        let mut warmup = Vec::new();
        run_until_settled(&mut world, &mut warmup);
        let before = query::grid_snapshot(&world);

        let mut events = Vec::new();
        for _ in 0..16 {
            tick(&mut world, &mut events);
        }
        assert_eq!(query::grid_snapshot(&world), before);
        assert!(events
            .iter()
            .all(|event| matches!(event, Event::TimeAdvanced { .. })));
    }

    #[test]
    fn restore_snapshot_rewinds_grid_and_clears_the_queue() {
        let mut world = configured(4, 1);
        place(&mut world, 0, 0, TileSeed::movable(red()));
        place(&mut world, 3, 0, TileSeed::movable(red()));
        let _ = start(&mut world);
        let checkpoint = query::grid_snapshot(&world);

        let _ = queue_move(&mut world, 0, 0, Direction::Right);
        let mut events = Vec::new();
        run_until_settled(&mut world, &mut events);
        assert_eq!(identity_at(&world, 1, 0), Some(red()));

        let _ = queue_move(&mut world, 1, 0, Direction::Left);
        let mut restore_events = Vec::new();
        apply(
            &mut world,
            Command::RestoreSnapshot {
                snapshot: checkpoint.clone(),
            },
            &mut restore_events,
        );

        assert_eq!(restore_events, vec![Event::GridRestored { columns: 4, rows: 1 }]);
        assert_eq!(query::grid_snapshot(&world), checkpoint);
        assert_eq!(query::pending_moves(&world), 0);
        assert_eq!(identity_at(&world, 0, 0), Some(red()));
    }

    #[test]
    fn restoring_a_pre_win_snapshot_reopens_play() {
        let mut world = configured(3, 1);
        place(&mut world, 0, 0, TileSeed::movable(red()));
        place(&mut world, 2, 0, TileSeed::movable(red()));
        let _ = start(&mut world);
        let checkpoint = query::grid_snapshot(&world);

        let _ = queue_move(&mut world, 0, 0, Direction::Right);
        let mut events = Vec::new();
        run_until_settled(&mut world, &mut events);
        assert!(query::level_status(&world).won());

        let mut restore_events = Vec::new();
        apply(
            &mut world,
            Command::RestoreSnapshot {
                snapshot: checkpoint,
            },
            &mut restore_events,
        );
        assert!(!query::level_status(&world).won());
        assert!(query::level_status(&world).running());
    }

    #[test]
    fn inconsistent_snapshot_is_ignored() {
        let mut world = configured(3, 1);
        place(&mut world, 0, 0, TileSeed::movable(red()));
        let before = query::grid_snapshot(&world);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::RestoreSnapshot {
                snapshot: fuseblocks_core::GridSnapshot::new(5, 5, Vec::new()),
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert_eq!(query::grid_snapshot(&world), before);
    }

    #[test]
    fn moves_resolve_in_submission_order() {
        let mut world = configured(6, 1);
        place(&mut world, 0, 0, TileSeed::movable(red()));
        place(&mut world, 4, 0, TileSeed::movable(red()));
        let _ = start(&mut world);

        let _ = queue_move(&mut world, 0, 0, Direction::Right);
        let _ = queue_move(&mut world, 4, 0, Direction::Right);

        let mut events = Vec::new();
        run_until_settled(&mut world, &mut events);

        let accepted: Vec<CellCoord> = events
            .iter()
            .filter_map(|event| match event {
                Event::MoveAccepted { cell, .. } => Some(*cell),
                _ => None,
            })
            .collect();
        assert_eq!(accepted, vec![CellCoord::new(0, 0), CellCoord::new(4, 0)]);
        assert_eq!(identity_at(&world, 1, 0), Some(red()));
        assert_eq!(identity_at(&world, 5, 0), Some(red()));
    }
}
