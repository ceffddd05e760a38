//! Collinear waypoint elimination.
//!
//! A path is split into maximal runs of constant step direction; each run
//! collapses to its first and last waypoint. The start and the end always
//! survive. Direction is the delta reduced by its gcd, so `(2, 0)` and
//! `(1, 0)` belong to the same run and compressing an already-compressed
//! path changes nothing.

use gridwalk_kernel::grid::cell::{Cell, Direction};

use crate::node::GridPosition;

/// Drop every waypoint that continues the previous step's direction.
///
/// Inputs shorter than three waypoints come back unchanged. The retained
/// waypoints are clones of the input elements, so [`PathNode`] costs are
/// preserved.
///
/// [`PathNode`]: crate::node::PathNode
#[must_use]
pub fn compress<T: GridPosition + Clone>(path: &[T]) -> Vec<T> {
    if path.len() < 3 {
        return path.to_vec();
    }

    let mut out = Vec::with_capacity(path.len());
    out.push(path[0].clone());

    let mut heading: Option<Direction> = None;
    for pair in path.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let step = prev.position().direction_to(next.position());
        match heading {
            Some(current) if current == step => {}
            Some(_) => {
                out.push(prev.clone());
                heading = Some(step);
            }
            None => heading = Some(step),
        }
    }

    if let Some(last) = path.last() {
        out.push(last.clone());
    }
    out
}

/// [`compress`] over bare coordinates.
#[must_use]
pub fn compress_cells(path: &[Cell]) -> Vec<Cell> {
    compress(path)
}

/// Euclidean length of the polyline through `path`.
#[must_use]
pub fn path_cost<T: GridPosition>(path: &[T]) -> f64 {
    path.windows(2)
        .map(|pair| pair[0].position().euclidean_distance(pair[1].position()))
        .sum()
}
