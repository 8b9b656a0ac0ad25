//! Pixel-space geometry primitives.
//!
//! All coordinates are board-local: the origin is the top-left corner of the
//! board and the unit is whatever the presentation layer measures drag
//! translations in.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point in board pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// The board origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Creates a new point.
    #[must_use]
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the Euclidean distance between `self` and `other`.
    #[must_use]
    #[inline]
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Returns `true` if `other` lies within `epsilon` (inclusive) of `self`.
    #[must_use]
    #[inline]
    pub fn is_near(self, other: Self, epsilon: f64) -> bool {
        self.distance_to(other) <= epsilon
    }
}

/// A drag translation, measured from the point where the gesture began.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Translation {
    /// Horizontal offset.
    pub dx: f64,
    /// Vertical offset.
    pub dy: f64,
}

impl Translation {
    /// The empty translation.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a new translation.
    #[must_use]
    #[inline]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

impl Add<Translation> for Point {
    type Output = Point;

    fn add(self, rhs: Translation) -> Self::Output {
        Point::new(self.x + rhs.dx, self.y + rhs.dy)
    }
}

impl Sub for Point {
    type Output = Translation;

    fn sub(self, rhs: Point) -> Self::Output {
        Translation::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A crop rectangle in unit-square image coordinates.
///
/// `(0, 0)` is the top-left corner of the source image and `(1, 1)` the
/// bottom-right one. The engine never touches pixel data; the renderer scales
/// this rectangle to the decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl CropRect {
    /// Creates a new crop rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}
