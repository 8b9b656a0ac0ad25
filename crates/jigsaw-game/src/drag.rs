use jigsaw_core::Point;

use crate::PieceId;

/// State of the drag gesture.
///
/// The anchor only exists while a piece is being dragged.
#[derive(Debug, Clone, Copy, Default, PartialEq, derive_more::IsVariant)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A piece is being dragged.
    Dragging {
        /// The dragged piece.
        piece: PieceId,
        /// Center of the piece when the drag began.
        anchor: Point,
    },
}

impl DragState {
    /// Returns the dragged piece, if any.
    #[must_use]
    pub fn piece(&self) -> Option<PieceId> {
        match self {
            Self::Idle => None,
            Self::Dragging { piece, .. } => Some(*piece),
        }
    }

    /// Returns the drag anchor, if any.
    #[must_use]
    pub fn anchor(&self) -> Option<Point> {
        match self {
            Self::Idle => None,
            Self::Dragging { anchor, .. } => Some(*anchor),
        }
    }
}

/// Interaction phase of a session, derived from selection and drag state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum InteractionPhase {
    /// Nothing selected.
    Idle,
    /// A piece is selected but not moving.
    Selected(PieceId),
    /// A piece is being dragged.
    Dragging(PieceId),
}

impl InteractionPhase {
    pub(crate) fn new(selected: Option<PieceId>, drag: DragState) -> Self {
        match (drag.piece(), selected) {
            (Some(piece), _) => Self::Dragging(piece),
            (None, Some(piece)) => Self::Selected(piece),
            (None, None) => Self::Idle,
        }
    }
}
