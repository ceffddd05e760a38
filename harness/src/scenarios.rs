//! Scenarios: a grid, two endpoints, and a search policy.
//!
//! The built-in set covers the behaviours the search engine distinguishes:
//! straight and diagonal travel, detours, the corner-cutting rule, an
//! unreachable destination, a long winding route, and a route longer than
//! the default expansion ceiling.

use gridwalk_kernel::grid::cell::Cell;
use gridwalk_search::policy::SearchPolicy;

use crate::worlds::tile_grid::{GridParseError, TileGrid};

/// A runnable search problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub id: String,
    pub grid: TileGrid,
    pub start: Cell,
    pub destination: Cell,
    pub policy: SearchPolicy,
}

impl Scenario {
    /// Bind endpoints and policy to a grid. The grid's markers are moved to
    /// `start` and `destination`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        mut grid: TileGrid,
        start: Cell,
        destination: Cell,
        policy: SearchPolicy,
    ) -> Self {
        grid.set_markers(start, destination);
        Self {
            id: id.into(),
            grid,
            start,
            destination,
            policy,
        }
    }

    /// Build from ASCII rows carrying `S` and `D` markers.
    ///
    /// # Errors
    ///
    /// Any [`GridParseError`], including a missing marker.
    pub fn from_rows<S: AsRef<str>>(
        id: impl Into<String>,
        rows: &[S],
        policy: SearchPolicy,
    ) -> Result<Self, GridParseError> {
        let grid = TileGrid::from_rows(rows)?;
        let (start, destination) = grid.endpoints()?;
        Ok(Self::new(id, grid, start, destination, policy))
    }
}

/// All built-in scenarios, in a fixed order.
#[must_use]
pub fn builtin() -> Vec<Scenario> {
    vec![
        open_field(16),
        wall_detour(),
        diagonal_gap(),
        sealed_room(),
        switchback_maze(21),
        long_corridor(2000),
    ]
}

/// Look up a built-in scenario by id.
#[must_use]
pub fn by_id(id: &str) -> Option<Scenario> {
    builtin().into_iter().find(|s| s.id == id)
}

/// `size` × `size` with no obstacles, corner to corner.
#[must_use]
pub fn open_field(size: usize) -> Scenario {
    let far = coord(size.saturating_sub(1));
    Scenario::new(
        "open_field",
        TileGrid::open(size, size),
        Cell::new(0, 0),
        Cell::new(far, far),
        SearchPolicy::default(),
    )
}

/// A vertical wall with a single opening at the bottom.
#[must_use]
pub fn wall_detour() -> Scenario {
    let mut grid = TileGrid::open(10, 10);
    for y in 0..8 {
        grid.set_walkable(Cell::new(5, y), false);
    }
    Scenario::new(
        "wall_detour",
        grid,
        Cell::new(1, 1),
        Cell::new(8, 1),
        SearchPolicy::default(),
    )
}

/// Start and destination touch only diagonally, across two blocking
/// cells. With corner cutting off the route must go around.
#[must_use]
pub fn diagonal_gap() -> Scenario {
    let mut grid = TileGrid::open(4, 4);
    grid.set_walkable(Cell::new(2, 1), false);
    grid.set_walkable(Cell::new(1, 2), false);
    Scenario::new(
        "diagonal_gap",
        grid,
        Cell::new(1, 1),
        Cell::new(2, 2),
        SearchPolicy::default(),
    )
}

/// The destination sits inside a walled box.
#[must_use]
pub fn sealed_room() -> Scenario {
    let mut grid = TileGrid::open(9, 9);
    for x in 5..=7 {
        for y in 5..=7 {
            if (x, y) != (6, 6) {
                grid.set_walkable(Cell::new(x, y), false);
            }
        }
    }
    Scenario::new(
        "sealed_room",
        grid,
        Cell::new(1, 1),
        Cell::new(6, 6),
        SearchPolicy::default(),
    )
}

/// Full-width corridors on even rows joined by alternating end gaps, so
/// the route sweeps back and forth across the whole grid.
#[must_use]
pub fn switchback_maze(size: usize) -> Scenario {
    let mut grid = TileGrid::open(size, size);
    let last = coord(size.saturating_sub(1));
    let gap_in = |y: i32| if (y / 2) % 2 == 0 { last } else { 0 };
    let mut final_gap = 0;
    for y in (1..=last).step_by(2) {
        final_gap = gap_in(y);
        for x in 0..=last {
            if x != final_gap {
                grid.set_walkable(Cell::new(x, y), false);
            }
        }
    }
    let destination_x = if final_gap == 0 { last } else { 0 };
    Scenario::new(
        "switchback_maze",
        grid,
        Cell::new(0, 0),
        Cell::new(destination_x, last),
        SearchPolicy::default(),
    )
}

/// A one-cell-high corridor longer than the default expansion ceiling.
#[must_use]
pub fn long_corridor(length: usize) -> Scenario {
    Scenario::new(
        "long_corridor",
        TileGrid::open(length, 1),
        Cell::new(0, 0),
        Cell::new(coord(length.saturating_sub(1)), 0),
        SearchPolicy::default(),
    )
}

fn coord(v: usize) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}
