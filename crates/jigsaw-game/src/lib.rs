//! Jigsaw puzzle session management.
//!
//! This crate owns the live state of a single puzzle session: piece positions,
//! the drag gesture state machine, snapping and locking, completion detection,
//! and move/time bookkeeping.
//!
//! # Overview
//!
//! - [`Session`]: the session controller and drag/snap state machine.
//! - [`Level`]: the level descriptor a session is started from.
//! - [`Piece`]: one jigsaw fragment and its placement state.
//! - [`SessionEvent`] / [`SessionObserver`]: notifications for presentation
//!   and persistence collaborators.
//! - [`LevelProgress`]: best time and moves merged from completion events.
//! - [`Clock`]: the time source used for the session timer.
//!
//! # Example
//!
//! ```
//! use jigsaw_core::GridSize;
//! use jigsaw_game::{Level, Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig::default());
//! session.start_game(Level::new("sunflowers", GridSize::new(3).unwrap()), 300.0);
//!
//! // Drag a piece towards its target cell and release it on the board.
//! let piece = session.pieces()[4].clone();
//! session.begin_drag(piece.id());
//! session.update_drag(piece.id(), piece.target_position() - piece.current_position());
//! let locked = session.end_drag(piece.id(), 300.0);
//!
//! assert_eq!(session.move_count(), 1);
//! assert_eq!(session.piece(piece.id()).unwrap().is_locked(), locked);
//! ```

pub use self::{clock::*, config::*, drag::*, event::*, level::*, piece::*, progress::*, session::*};

mod clock;
mod config;
mod drag;
mod event;
mod level;
mod piece;
mod progress;
mod session;
