//! `TileGrid`: a bounded walkability bitmap parsed from ASCII rows.
//!
//! # Glyphs
//!
//! | Glyph | Meaning |
//! |-------|---------|
//! | `#` | blocked |
//! | `.` | walkable |
//! | `S` | walkable, start marker |
//! | `D` | walkable, destination marker |
//!
//! Row `i` of the text is `y = i`; column `j` is `x = j`. Coordinates
//! outside `0..width` × `0..height` are never walkable.

use gridwalk_kernel::grid::cell::Cell;
use gridwalk_search::contract::WalkabilityOracle;

/// Error parsing an ASCII grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridParseError {
    /// No rows, or a row with no columns.
    Empty,
    /// A row's width differs from the first row's.
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A glyph outside the table above.
    UnknownGlyph { row: usize, column: usize, glyph: char },
    /// `S` or `D` appears more than once.
    DuplicateMarker { marker: char },
    /// `S` or `D` is required but absent.
    MissingMarker { marker: char },
    /// Dimensions do not fit an `i32` coordinate.
    TooLarge { width: usize, height: usize },
}

impl std::fmt::Display for GridParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "grid is empty"),
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "row {row} has width {found}, expected {expected}"),
            Self::UnknownGlyph { row, column, glyph } => {
                write!(f, "unknown glyph {glyph:?} at row {row}, column {column}")
            }
            Self::DuplicateMarker { marker } => write!(f, "marker {marker:?} appears more than once"),
            Self::MissingMarker { marker } => write!(f, "marker {marker:?} is missing"),
            Self::TooLarge { width, height } => write!(f, "grid {width}x{height} is too large"),
        }
    }
}

impl std::error::Error for GridParseError {}

/// Bounded walkability bitmap, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    walkable: Vec<bool>,
    start: Option<Cell>,
    destination: Option<Cell>,
}

impl TileGrid {
    /// A fully walkable `width` × `height` grid with no markers.
    #[must_use]
    pub fn open(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            walkable: vec![true; width * height],
            start: None,
            destination: None,
        }
    }

    /// Parse newline-separated rows. Leading and trailing blank lines and
    /// surrounding whitespace on each row are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GridParseError`] for empty input, ragged rows, unknown
    /// glyphs, or a repeated `S`/`D`.
    pub fn parse(text: &str) -> Result<Self, GridParseError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_rows(&rows)
    }

    /// Parse pre-split rows.
    ///
    /// # Errors
    ///
    /// See [`parse`](Self::parse).
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridParseError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().chars().count());
        if height == 0 || width == 0 {
            return Err(GridParseError::Empty);
        }
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(GridParseError::TooLarge { width, height });
        }

        let mut grid = Self::open(width, height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(GridParseError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let cell = Cell::new(to_coord(x), to_coord(y));
                match glyph {
                    '#' => grid.walkable[y * width + x] = false,
                    '.' => {}
                    'S' => set_marker(&mut grid.start, cell, 'S')?,
                    'D' => set_marker(&mut grid.destination, cell, 'D')?,
                    other => {
                        return Err(GridParseError::UnknownGlyph {
                            row: y,
                            column: x,
                            glyph: other,
                        })
                    }
                }
            }
        }
        Ok(grid)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Start marker, if the grid was parsed with one.
    #[must_use]
    pub fn start(&self) -> Option<Cell> {
        self.start
    }

    /// Destination marker, if the grid was parsed with one.
    #[must_use]
    pub fn destination(&self) -> Option<Cell> {
        self.destination
    }

    /// Both markers.
    ///
    /// # Errors
    ///
    /// [`GridParseError::MissingMarker`] naming the first absent marker.
    pub fn endpoints(&self) -> Result<(Cell, Cell), GridParseError> {
        let start = self.start.ok_or(GridParseError::MissingMarker { marker: 'S' })?;
        let destination = self
            .destination
            .ok_or(GridParseError::MissingMarker { marker: 'D' })?;
        Ok((start, destination))
    }

    /// Set (or move) the start and destination markers.
    pub fn set_markers(&mut self, start: Cell, destination: Cell) {
        self.start = Some(start);
        self.destination = Some(destination);
    }

    /// Mark a cell blocked or walkable. Out-of-range cells are ignored.
    pub fn set_walkable(&mut self, cell: Cell, walkable: bool) {
        if let Some(i) = self.index(cell) {
            self.walkable[i] = walkable;
        }
    }

    /// Number of walkable cells.
    #[must_use]
    pub fn walkable_count(&self) -> usize {
        self.walkable.iter().filter(|w| **w).count()
    }

    /// Render back to rows, overlaying `route` with `*` (markers win).
    #[must_use]
    pub fn render(&self, route: &[Cell]) -> String {
        let mut glyphs: Vec<char> = self
            .walkable
            .iter()
            .map(|&w| if w { '.' } else { '#' })
            .collect();
        for &cell in route {
            if let Some(i) = self.index(cell) {
                glyphs[i] = '*';
            }
        }
        for (marker, glyph) in [(self.start, 'S'), (self.destination, 'D')] {
            if let Some(i) = marker.and_then(|c| self.index(c)) {
                glyphs[i] = glyph;
            }
        }

        let mut out = String::with_capacity(self.walkable.len() + self.height);
        if self.width == 0 {
            for _ in 0..self.height {
                out.push('\n');
            }
            return out;
        }
        for row in glyphs.chunks(self.width) {
            out.extend(row);
            out.push('\n');
        }
        out
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        let x = usize::try_from(cell.x).ok()?;
        let y = usize::try_from(cell.y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

impl WalkabilityOracle for TileGrid {
    fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.index(Cell::new(x, y))
            .is_some_and(|i| self.walkable[i])
    }
}

/// Checked against `i32` in `from_rows`.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn to_coord(v: usize) -> i32 {
    v as i32
}

fn set_marker(slot: &mut Option<Cell>, cell: Cell, marker: char) -> Result<(), GridParseError> {
    if slot.is_some() {
        return Err(GridParseError::DuplicateMarker { marker });
    }
    *slot = Some(cell);
    Ok(())
}
