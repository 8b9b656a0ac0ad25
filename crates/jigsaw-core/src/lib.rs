//! Core board geometry for the jigsaw puzzle engine.
//!
//! This crate provides the small, allocation-free building blocks used by the
//! layout generator and the game session:
//!
//! 1. **Geometry** - [`geometry`]: pixel-space [`Point`]s, drag
//!    [`Translation`]s and normalized [`CropRect`]s.
//! 2. **Grid mapping** - [`grid`]: the square [`BoardGeometry`] that maps
//!    pixel-space points to discrete [`Cell`]s and back.
//! 3. **Occupancy** - [`occupancy`]: the ring-expansion search for the nearest
//!    [`Cell`] not already taken by another piece.
//!
//! # Examples
//!
//! ```
//! use jigsaw_core::{BoardGeometry, Cell, GridSize, Point};
//!
//! let board = BoardGeometry::new(300.0, GridSize::new(3).unwrap());
//!
//! // A point near the middle of the board maps to the center cell.
//! let cell = board.cell_of(Point::new(162.0, 158.0));
//! assert_eq!(cell, Cell::new(1, 1));
//! assert_eq!(board.center_of(cell), Point::new(150.0, 150.0));
//! ```

pub mod geometry;
pub mod grid;
pub mod occupancy;

pub use self::{
    geometry::{CropRect, Point, Translation},
    grid::{BoardGeometry, Cell, GridSize, GridSizeError},
    occupancy::{Occupancy, PositionOccupancy, nearest_free_cell},
};
