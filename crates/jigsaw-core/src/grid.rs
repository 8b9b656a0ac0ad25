//! Mapping between continuous board coordinates and discrete grid cells.
//!
//! The board is a square of side `board_size` split into `N × N` cells, where
//! `N` is the [`GridSize`]. Cells are addressed by `(col, row)` and enumerated
//! in row-major order, which is also the solved order of the puzzle pieces.

use serde::{Deserialize, Serialize};

use crate::{CropRect, Point};

/// Fraction of one cell side under which two positions are considered the same
/// spot.
///
/// Used both for cell occupancy and for deciding that a snapped piece reached
/// its target.
pub const CELL_EPSILON_FACTOR: f64 = 0.01;

/// Error returned when constructing a [`GridSize`] from an invalid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridSizeError {
    /// The grid must have at least two cells per side.
    #[display("grid size must be at least 2, got {size}")]
    TooSmall {
        /// The rejected value.
        size: u8,
    },
}

/// Number of cells along one side of the board.
///
/// Always at least [`GridSize::MIN`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display, Serialize, Deserialize,
)]
#[display("{_0}")]
#[serde(try_from = "u8", into = "u8")]
pub struct GridSize(u8);

impl GridSize {
    /// Smallest supported grid size.
    pub const MIN: u8 = 2;

    /// Creates a grid size.
    ///
    /// # Errors
    ///
    /// Returns [`GridSizeError::TooSmall`] if `size` is less than [`GridSize::MIN`].
    pub const fn new(size: u8) -> Result<Self, GridSizeError> {
        if size < Self::MIN {
            return Err(GridSizeError::TooSmall { size });
        }
        Ok(Self(size))
    }

    /// Returns the number of cells along one side.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the total number of cells (`N²`).
    #[must_use]
    #[inline]
    pub fn cell_count(self) -> usize {
        usize::from(self.0) * usize::from(self.0)
    }

    /// Returns all cells in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        let n = self.0;
        (0..n).flat_map(move |row| (0..n).map(move |col| Cell::new(col, row)))
    }

    /// Returns `true` if `(col, row)` addresses a cell of this grid.
    #[must_use]
    #[inline]
    pub fn contains(self, col: i32, row: i32) -> bool {
        let n = i32::from(self.0);
        (0..n).contains(&col) && (0..n).contains(&row)
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn clamp_axis(self, raw: f64) -> u8 {
        let max = f64::from(self.0 - 1);
        // `NaN as u8` saturates to 0, so a degenerate board still yields a valid cell.
        raw.round().clamp(0.0, max) as u8
    }
}

impl TryFrom<u8> for GridSize {
    type Error = GridSizeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GridSize> for u8 {
    fn from(value: GridSize) -> Self {
        value.0
    }
}

/// A discrete board cell, addressed by column and row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display, Serialize, Deserialize,
)]
#[display("({col}, {row})")]
pub struct Cell {
    /// Column, from the left edge.
    pub col: u8,
    /// Row, from the top edge.
    pub row: u8,
}

impl Cell {
    /// Creates a cell reference.
    #[must_use]
    #[inline]
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }
}

/// Geometry of a square board split into a square grid.
///
/// # Example
///
/// ```
/// use jigsaw_core::{BoardGeometry, Cell, GridSize, Point};
///
/// let board = BoardGeometry::new(300.0, GridSize::new(3).unwrap());
/// assert_eq!(board.cell_side(), 100.0);
///
/// // Points outside the board are clamped to the nearest edge cell.
/// assert_eq!(board.cell_of(Point::new(-40.0, 999.0)), Cell::new(0, 2));
/// assert!(!board.contains(Point::new(-40.0, 999.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardGeometry {
    board_size: f64,
    grid_size: GridSize,
}

impl BoardGeometry {
    /// Creates the geometry for a board of side `board_size`.
    ///
    /// Negative or non-finite sizes are clamped to zero.
    #[must_use]
    pub fn new(board_size: f64, grid_size: GridSize) -> Self {
        let board_size = if board_size.is_finite() {
            board_size.max(0.0)
        } else {
            0.0
        };
        Self {
            board_size,
            grid_size,
        }
    }

    /// Returns the side length of the board.
    #[must_use]
    #[inline]
    pub fn board_size(&self) -> f64 {
        self.board_size
    }

    /// Returns the grid size.
    #[must_use]
    #[inline]
    pub fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    /// Returns the side length of one cell.
    #[must_use]
    #[inline]
    pub fn cell_side(&self) -> f64 {
        self.board_size / f64::from(self.grid_size.get())
    }

    /// Returns the distance under which two positions count as coincident.
    #[must_use]
    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.cell_side() * CELL_EPSILON_FACTOR
    }

    /// Returns the cell whose center is nearest to `point`.
    ///
    /// Each axis is divided by the cell side, shifted by half a cell, rounded
    /// and clamped into the grid, so every input maps to a valid cell.
    #[must_use]
    pub fn cell_of(&self, point: Point) -> Cell {
        let side = self.cell_side();
        Cell::new(
            self.grid_size.clamp_axis(point.x / side - 0.5),
            self.grid_size.clamp_axis(point.y / side - 0.5),
        )
    }

    /// Returns the pixel-space center of `cell`.
    #[must_use]
    pub fn center_of(&self, cell: Cell) -> Point {
        let side = self.cell_side();
        Point::new(
            (f64::from(cell.col) + 0.5) * side,
            (f64::from(cell.row) + 0.5) * side,
        )
    }

    /// Returns `true` if `point` lies on the board, edges included.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        let range = 0.0..=self.board_size;
        range.contains(&point.x) && range.contains(&point.y)
    }

    /// Returns the row-major index of `cell`.
    #[must_use]
    #[inline]
    pub fn cell_index(&self, cell: Cell) -> usize {
        usize::from(cell.row) * usize::from(self.grid_size.get()) + usize::from(cell.col)
    }

    /// Returns the cell at row-major `index`, or `None` if out of range.
    #[must_use]
    pub fn cell_at_index(&self, index: usize) -> Option<Cell> {
        if index >= self.grid_size.cell_count() {
            return None;
        }
        let n = usize::from(self.grid_size.get());
        let col = u8::try_from(index % n).ok()?;
        let row = u8::try_from(index / n).ok()?;
        Some(Cell::new(col, row))
    }

    /// Returns the normalized source-image crop rectangle of `cell`.
    #[must_use]
    pub fn crop_rect(&self, cell: Cell) -> CropRect {
        let n = f64::from(self.grid_size.get());
        CropRect::new(f64::from(cell.col) / n, f64::from(cell.row) / n, 1.0 / n, 1.0 / n)
    }
}
