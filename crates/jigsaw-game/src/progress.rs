use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::{CompletionEvent, LevelId};

/// Best results for one level, merged from completion events.
///
/// This is the record a persistence layer stores; loading and saving it is
/// left to that layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// The level this record belongs to.
    pub level_id: LevelId,
    /// Whether the level was ever completed.
    pub completed: bool,
    /// Fastest completion.
    pub best_time: Option<Duration>,
    /// Fewest moves in a completion.
    pub best_moves: Option<u32>,
    /// Number of completions recorded.
    pub plays: u32,
    /// Wall-clock time of the latest recorded completion, as supplied by the
    /// caller.
    pub last_played_at: Option<SystemTime>,
}

/// What changed when a completion was recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[expect(clippy::struct_excessive_bools)]
pub struct RecordOutcome {
    /// The event belonged to this level and was merged.
    pub recorded: bool,
    /// First completion of the level.
    pub first_completion: bool,
    /// The event set a new best time.
    pub new_best_time: bool,
    /// The event set a new best move count.
    pub new_best_moves: bool,
}

impl LevelProgress {
    /// Creates an empty record.
    #[must_use]
    pub fn new(level_id: LevelId) -> Self {
        Self {
            level_id,
            completed: false,
            best_time: None,
            best_moves: None,
            plays: 0,
            last_played_at: None,
        }
    }

    /// Merges a completion that happened at `played_at` into the record.
    ///
    /// Events for another level are ignored.
    pub fn record(&mut self, event: &CompletionEvent, played_at: SystemTime) -> RecordOutcome {
        if event.level_id != self.level_id {
            return RecordOutcome::default();
        }

        let first_completion = !self.completed;
        let new_best_time = self.best_time.is_none_or(|best| event.elapsed < best);
        let new_best_moves = self.best_moves.is_none_or(|best| event.moves < best);

        self.completed = true;
        self.plays = self.plays.saturating_add(1);
        self.last_played_at = Some(played_at);
        if new_best_time {
            self.best_time = Some(event.elapsed);
        }
        if new_best_moves {
            self.best_moves = Some(event.moves);
        }

        RecordOutcome {
            recorded: true,
            first_completion,
            new_best_time,
            new_best_moves,
        }
    }
}
