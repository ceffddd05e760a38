//! Walkability oracle contract.

use gridwalk_kernel::grid::cell::Cell;

/// Answers "is `(x, y)` traversable?" for any integer coordinate.
///
/// # Contract
///
/// - Total over all `i32` pairs. Coordinates outside whatever bounds the
///   implementation has should answer `false`; the engine never clamps.
/// - Deterministic for the duration of one search. The engine assumes the
///   answer for a cell does not change between two queries.
/// - Cheap: the engine may query the same cell many times per expansion.
///
/// Implementations shared between engines running on different threads
/// must be `Sync`; the engine itself only needs `&self`.
pub trait WalkabilityOracle {
    /// Whether the cell at `(x, y)` can be entered.
    fn is_walkable(&self, x: i32, y: i32) -> bool;

    /// [`is_walkable`](Self::is_walkable) for a [`Cell`].
    fn is_cell_walkable(&self, cell: Cell) -> bool {
        self.is_walkable(cell.x, cell.y)
    }
}

impl<T: WalkabilityOracle + ?Sized> WalkabilityOracle for &T {
    fn is_walkable(&self, x: i32, y: i32) -> bool {
        (**self).is_walkable(x, y)
    }
}

impl<T: WalkabilityOracle + ?Sized> WalkabilityOracle for Box<T> {
    fn is_walkable(&self, x: i32, y: i32) -> bool {
        (**self).is_walkable(x, y)
    }
}

/// Adapter turning a closure into an oracle.
///
/// ```
/// use gridwalk_search::contract::{FnOracle, WalkabilityOracle};
///
/// let oracle = FnOracle(|x: i32, y: i32| x >= 0 && y >= 0);
/// assert!(oracle.is_walkable(0, 3));
/// assert!(!oracle.is_walkable(-1, 3));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnOracle<F>(pub F);

impl<F> WalkabilityOracle for FnOracle<F>
where
    F: Fn(i32, i32) -> bool,
{
    fn is_walkable(&self, x: i32, y: i32) -> bool {
        (self.0)(x, y)
    }
}

/// Unbounded plane where every cell is walkable.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenPlane;

impl WalkabilityOracle for OpenPlane {
    fn is_walkable(&self, _x: i32, _y: i32) -> bool {
        true
    }
}
