//! `Cell`: integer grid coordinate used as an identity key.
//!
//! Two cells are the same entity iff their `(x, y)` coincide. Search
//! bookkeeping (costs, parent links) is stored next to a `Cell`, never
//! inside it, so hashing and equality cannot accidentally see cost fields.
//!
//! # Canonical form
//!
//! The canonical byte representation is `x` then `y`, each as a 4-byte
//! little-endian `i32` (8 bytes total). [`Cell::to_le_bytes`] is the only
//! encoding used for hashing.
//!
//! # Ordering
//!
//! `Ord` is row-major: `y` first, then `x`. This gives `BTreeMap`/`BTreeSet`
//! keyed by `Cell` a reading-order iteration that matches ASCII grid layout.

use std::cmp::Ordering;
use std::fmt;

/// An integer grid coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    /// Construct from coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell displaced by `(dx, dy)`.
    ///
    /// Saturates at the `i32` limits instead of overflowing, so probing the
    /// neighbours of an extreme coordinate never panics.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Raw displacement `(other.x - self.x, other.y - self.y)` as `i64`.
    #[must_use]
    pub fn delta_to(self, other: Self) -> (i64, i64) {
        (
            i64::from(other.x) - i64::from(self.x),
            i64::from(other.y) - i64::from(self.y),
        )
    }

    /// Step direction from `self` to `other`, reduced by the greatest common
    /// divisor of the displacement.
    ///
    /// Collinear same-sense displacements of any length map to the same
    /// `Direction`. A zero displacement maps to [`Direction::NONE`].
    #[must_use]
    pub fn direction_to(self, other: Self) -> Direction {
        let (dx, dy) = self.delta_to(other);
        Direction::reduced(dx, dy)
    }

    /// Absolute per-axis distance to `other` as `(|dx|, |dy|)`.
    #[must_use]
    pub fn abs_delta(self, other: Self) -> (u64, u64) {
        let (dx, dy) = self.delta_to(other);
        (dx.unsigned_abs(), dy.unsigned_abs())
    }

    /// Manhattan (taxicab) distance to `other`.
    #[must_use]
    pub fn manhattan_distance(self, other: Self) -> u64 {
        let (dx, dy) = self.abs_delta(other);
        dx + dy
    }

    /// Euclidean distance to `other`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn euclidean_distance(self, other: Self) -> f64 {
        let (dx, dy) = self.abs_delta(other);
        (dx as f64).hypot(dy as f64)
    }

    /// Canonical 8-byte encoding: `x` then `y`, little-endian.
    #[must_use]
    pub fn to_le_bytes(self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[..4].copy_from_slice(&self.x.to_le_bytes());
        out[4..].copy_from_slice(&self.y.to_le_bytes());
        out
    }

    /// Decode from the canonical 8-byte encoding.
    #[must_use]
    pub fn from_le_bytes(bytes: [u8; 8]) -> Self {
        let [x0, x1, x2, x3, y0, y1, y2, y3] = bytes;
        Self {
            x: i32::from_le_bytes([x0, x1, x2, x3]),
            y: i32::from_le_bytes([y0, y1, y2, y3]),
        }
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A step direction with coprime components.
///
/// Built only through [`Direction::reduced`] (or [`Cell::direction_to`]), so
/// `(2, 0)` and `(1, 0)` compare equal once reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    dx: i64,
    dy: i64,
}

impl Direction {
    /// The zero direction (repeated waypoint).
    pub const NONE: Self = Self { dx: 0, dy: 0 };

    /// Reduce `(dx, dy)` by its greatest common divisor.
    #[must_use]
    pub fn reduced(dx: i64, dy: i64) -> Self {
        let g = gcd(dx.unsigned_abs(), dy.unsigned_abs());
        if g == 0 {
            return Self::NONE;
        }
        // g divides both components, so the quotient magnitudes fit in i64.
        #[allow(clippy::cast_possible_wrap)]
        let g = g as i64;
        Self {
            dx: dx / g,
            dy: dy / g,
        }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn dx(self) -> i64 {
        self.dx
    }

    /// Vertical component.
    #[must_use]
    pub const fn dy(self) -> i64 {
        self.dy
    }

    /// `true` if both components are non-zero.
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        self.dx != 0 && self.dy != 0
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}
