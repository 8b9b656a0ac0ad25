use jigsaw_core::{Cell, CropRect, Point};

/// Identifier of a piece.
///
/// Unique within the [`Session`](crate::Session) that created it, across all
/// the games it hosts, so an id left over from an earlier game never matches
/// a piece of the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("#{_0}")]
pub struct PieceId(u64);

impl PieceId {
    /// Creates an id from its raw value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// One jigsaw fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub(crate) id: PieceId,
    pub(crate) index: usize,
    pub(crate) target_cell: Cell,
    pub(crate) crop_rect: CropRect,
    pub(crate) target_position: Point,
    pub(crate) current_position: Point,
    pub(crate) locked: bool,
}

impl Piece {
    /// Returns the piece id.
    #[must_use]
    pub fn id(&self) -> PieceId {
        self.id
    }

    /// Returns the position of the piece in row-major solved order.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the cell the piece belongs in.
    #[must_use]
    pub fn target_cell(&self) -> Cell {
        self.target_cell
    }

    /// Returns the source-image crop rectangle, in unit-square coordinates.
    #[must_use]
    pub fn crop_rect(&self) -> CropRect {
        self.crop_rect
    }

    /// Returns the center the piece must reach to be solved.
    #[must_use]
    pub fn target_position(&self) -> Point {
        self.target_position
    }

    /// Returns the center where the piece currently sits.
    #[must_use]
    pub fn current_position(&self) -> Point {
        self.current_position
    }

    /// Returns `true` once the piece is locked at its target.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn lock(&mut self) {
        self.current_position = self.target_position;
        self.locked = true;
    }
}
