use std::time::Duration;

use jigsaw_core::Cell;
use jigsaw_generator::LayoutSeed;
use serde::{Deserialize, Serialize};

use crate::{LevelId, PieceId};

/// Outcome of a completed session, handed to persistence and achievements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    /// The completed level.
    pub level_id: LevelId,
    /// Time from session start to the last lock.
    pub elapsed: Duration,
    /// Number of counted moves.
    pub moves: u32,
}

/// A notable change in a session.
///
/// Presentation layers map these to cues (a click on lock, a fanfare on
/// completion); none of them is required for the session to work.
#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum SessionEvent {
    /// A new game started.
    Started {
        /// The level being played.
        level_id: LevelId,
        /// Number of pieces on the board.
        piece_count: usize,
        /// Seed of the initial layout.
        seed: LayoutSeed,
    },
    /// A piece was selected.
    PieceSelected {
        /// The selected piece.
        piece: PieceId,
    },
    /// A piece snapped onto its target and locked.
    PieceLocked {
        /// The locked piece.
        piece: PieceId,
        /// The cell it locked into.
        cell: Cell,
    },
    /// Every piece is locked.
    Completed(CompletionEvent),
}

/// Receives [`SessionEvent`]s.
///
/// Implemented for every `FnMut(&SessionEvent)` closure.
pub trait SessionObserver {
    /// Called after the session state has been updated.
    fn on_event(&mut self, event: &SessionEvent);
}

impl<F> SessionObserver for F
where
    F: FnMut(&SessionEvent),
{
    fn on_event(&mut self, event: &SessionEvent) {
        self(event);
    }
}
