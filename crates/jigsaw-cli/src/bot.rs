//! Scripted players that drive a [`Session`] through its gesture API.

use jigsaw_core::{Point, Translation};
use jigsaw_game::{Clock, PieceId, Session};
use rand::Rng;
use rand_pcg::Pcg64;

/// How a bot picks its next gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Strategy {
    /// Clears squatters off the board, then drops every piece near its target.
    Greedy,
    /// Drops random pieces near their targets, sometimes missing by a cell.
    Wander,
}

/// Outcome of a bot run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotReport {
    /// Gestures performed.
    pub gestures: u32,
    /// Releases that locked a piece.
    pub locks: u32,
}

/// A scripted player.
#[derive(Debug)]
pub struct Bot {
    strategy: Strategy,
    rng: Pcg64,
    max_gestures: u32,
}

impl Bot {
    /// Creates a bot that gives up after `max_gestures` gestures.
    #[must_use]
    pub fn new(strategy: Strategy, rng: Pcg64, max_gestures: u32) -> Self {
        Self {
            strategy,
            rng,
            max_gestures,
        }
    }

    /// Plays until the session completes or the gesture budget runs out.
    ///
    /// `on_gesture` runs after every gesture, so the caller can advance its
    /// clock.
    pub fn play<C, F>(&mut self, session: &mut Session<C>, mut on_gesture: F) -> BotReport
    where
        C: Clock,
        F: FnMut(&mut Session<C>),
    {
        let mut report = BotReport {
            gestures: 0,
            locks: 0,
        };
        while session.is_active() && report.gestures < self.max_gestures {
            let Some((piece, to)) = self.next_gesture(session) else {
                break;
            };
            if drag(session, piece, to) {
                report.locks += 1;
            }
            report.gestures += 1;
            on_gesture(session);
        }
        report
    }

    fn next_gesture<C>(&mut self, session: &Session<C>) -> Option<(PieceId, Point)> {
        let board = session.board()?;
        let side = board.cell_side();
        let unlocked = session
            .pieces()
            .iter()
            .filter(|piece| !piece.is_locked())
            .collect::<Vec<_>>();

        match self.strategy {
            Strategy::Greedy => {
                let piece = unlocked.first()?;
                let target = piece.target_position();
                let squatter = unlocked.iter().find(|other| {
                    other.id() != piece.id()
                        && other.current_position().is_near(target, board.epsilon())
                });
                if let Some(squatter) = squatter {
                    log::trace!("moving {} off {}", squatter.id(), piece.target_cell());
                    return Some((squatter.id(), Point::new(-side, target.y)));
                }
                let jitter = side * 0.25;
                let offset = Translation::new(
                    self.rng.random_range(-jitter..=jitter),
                    self.rng.random_range(-jitter..=jitter),
                );
                Some((piece.id(), target + offset))
            }
            Strategy::Wander => {
                if unlocked.is_empty() {
                    return None;
                }
                let piece = unlocked[self.rng.random_range(0..unlocked.len())];
                let reach = side * 0.9;
                let offset = Translation::new(
                    self.rng.random_range(-reach..=reach),
                    self.rng.random_range(-reach..=reach),
                );
                Some((piece.id(), piece.target_position() + offset))
            }
        }
    }
}

fn drag<C>(session: &mut Session<C>, piece: PieceId, to: Point) -> bool
where
    C: Clock,
{
    let Some(from) = session.piece(piece).map(|piece| piece.current_position()) else {
        return false;
    };
    let board_size = session.board().map_or(0.0, |board| board.board_size());
    session.select_piece(piece);
    session.begin_drag(piece);
    session.update_drag(piece, to - from);
    session.end_drag(piece, board_size)
}
