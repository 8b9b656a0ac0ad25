use std::{fmt, time::Duration};

use jigsaw_core::{
    BoardGeometry, Point, PositionOccupancy, Translation, nearest_free_cell,
};
use jigsaw_generator::{LayoutGenerator, LayoutSeed};

use crate::{
    Clock, CompletionEvent, DragState, InteractionPhase, Level, Piece, PieceId, SessionConfig,
    SessionEvent, SessionObserver, SystemClock,
};

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionStatus {
    /// No game in progress.
    #[default]
    Inactive,
    /// A game is being played.
    Active,
    /// Every piece is locked; the game is over.
    Completed,
}

/// A jigsaw puzzle session.
///
/// Owns the pieces of the current game and mediates every change to them:
/// selection, the begin/update/end drag gesture, snapping, locking and
/// completion. Operations are total: calls that do not apply to the current
/// state (an unknown or locked piece, a piece that is not being dragged, no
/// game in progress) are silently ignored.
///
/// Time is read from a [`Clock`]; the session never ticks on its own, so the
/// caller polls [`Session::update_timer`] to refresh the elapsed time.
///
/// # Example
///
/// ```
/// use std::{cell::RefCell, rc::Rc};
///
/// use jigsaw_core::{GridSize, Point};
/// use jigsaw_game::{Level, Session, SessionConfig, SessionEvent};
///
/// let events = Rc::new(RefCell::new(Vec::new()));
/// let mut session = Session::new(SessionConfig::default());
/// session.subscribe({
///     let events = Rc::clone(&events);
///     move |event: &SessionEvent| events.borrow_mut().push(event.clone())
/// });
///
/// session.start_game(Level::new("demo", GridSize::new(3).unwrap()), 300.0);
/// session.auto_complete_game();
///
/// assert!(session.status().is_completed());
/// assert!(events.borrow().last().unwrap().is_completed());
/// ```
pub struct Session<C = SystemClock> {
    clock: C,
    config: SessionConfig,
    generator: LayoutGenerator,
    level: Option<Level>,
    board: Option<BoardGeometry>,
    pieces: Vec<Piece>,
    selected: Option<PieceId>,
    drag: DragState,
    status: SessionStatus,
    move_count: u32,
    started_at: Option<Duration>,
    elapsed: Duration,
    hint_visible: bool,
    seed: Option<LayoutSeed>,
    next_piece_id: u64,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl Session<SystemClock> {
    /// Creates an idle session timed by the system clock.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_clock(SystemClock::default(), config)
    }
}

impl Default for Session<SystemClock> {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl<C> fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.status)
            .field("level", &self.level.as_ref().map(|level| &level.id))
            .field("pieces", &self.pieces.len())
            .field("selected", &self.selected)
            .field("drag", &self.drag)
            .field("move_count", &self.move_count)
            .field("elapsed", &self.elapsed)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl<C> Session<C>
where
    C: Clock,
{
    /// Creates an idle session timed by `clock`.
    #[must_use]
    pub fn with_clock(clock: C, config: SessionConfig) -> Self {
        let generator = LayoutGenerator::new(config.layout);
        Self {
            clock,
            config,
            generator,
            level: None,
            board: None,
            pieces: Vec::new(),
            selected: None,
            drag: DragState::Idle,
            status: SessionStatus::Inactive,
            move_count: 0,
            started_at: None,
            elapsed: Duration::ZERO,
            hint_visible: false,
            seed: None,
            next_piece_id: 0,
            observers: Vec::new(),
        }
    }

    /// Registers an observer that receives every subsequent [`SessionEvent`].
    pub fn subscribe<O>(&mut self, observer: O)
    where
        O: SessionObserver + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    // ----- Session control ---------------------------------------------------

    /// Starts a new game of `level` on a board of side `board_size`, with a
    /// freshly randomized layout.
    ///
    /// Any game in progress is discarded.
    pub fn start_game(&mut self, level: Level, board_size: f64) {
        self.start_game_with_seed(level, board_size, LayoutSeed::random());
    }

    /// Starts a new game whose initial layout is determined by `seed`.
    ///
    /// Pieces are created in row-major order; each piece's index, crop
    /// rectangle and target derive from its cell.
    pub fn start_game_with_seed(&mut self, level: Level, board_size: f64, seed: LayoutSeed) {
        let board = BoardGeometry::new(board_size, level.grid_size);
        let layout = self.generator.generate_with_seed(&board, seed);

        let first_id = self.next_piece_id;
        self.pieces = board
            .grid_size()
            .cells()
            .zip(layout.positions)
            .zip(first_id..)
            .enumerate()
            .map(|(index, ((cell, position), raw_id))| Piece {
                id: PieceId::from_raw(raw_id),
                index,
                target_cell: cell,
                crop_rect: board.crop_rect(cell),
                target_position: board.center_of(cell),
                current_position: position,
                locked: false,
            })
            .collect();
        self.next_piece_id = first_id.saturating_add(self.pieces.len() as u64);

        log::debug!(
            "starting level {} ({}x{}, board {board_size}), seed {seed}",
            level.id,
            level.grid_size,
            level.grid_size,
        );

        let event = SessionEvent::Started {
            level_id: level.id.clone(),
            piece_count: self.pieces.len(),
            seed,
        };

        self.level = Some(level);
        self.board = Some(board);
        self.status = SessionStatus::Active;
        self.move_count = 0;
        self.started_at = Some(self.clock.now());
        self.elapsed = Duration::ZERO;
        self.selected = None;
        self.drag = DragState::Idle;
        self.hint_visible = false;
        self.seed = Some(seed);

        self.emit(&event);
    }

    /// Ends the current game and clears the level and its pieces.
    ///
    /// Move count and elapsed time keep their last values until the next
    /// game starts.
    pub fn end_game(&mut self) {
        if let Some(level) = &self.level {
            log::debug!("ending level {} ({:?})", level.id, self.status);
        }
        self.status = SessionStatus::Inactive;
        self.level = None;
        self.board = None;
        self.pieces.clear();
        self.selected = None;
        self.drag = DragState::Idle;
        self.seed = None;
    }

    /// Shows or hides the solved-image overlay.
    pub fn toggle_hint(&mut self) {
        self.hint_visible = !self.hint_visible;
    }

    /// Moves every piece to its target, locks it, and completes the game.
    pub fn auto_complete_game(&mut self) {
        for piece in &mut self.pieces {
            piece.lock();
        }
        self.selected = None;
        self.drag = DragState::Idle;
        self.check_completion();
    }

    /// Recomputes the elapsed time while the game is active.
    pub fn update_timer(&mut self) {
        if !self.status.is_active() {
            return;
        }
        if let Some(started_at) = self.started_at {
            self.elapsed = self.clock.now().saturating_sub(started_at);
        }
    }

    // ----- Piece interaction -------------------------------------------------

    /// Selects a piece. Locked and unknown pieces are ignored.
    pub fn select_piece(&mut self, id: PieceId) {
        if !self.piece(id).is_some_and(|piece| !piece.is_locked()) {
            return;
        }
        self.selected = Some(id);
        self.emit(&SessionEvent::PieceSelected { piece: id });
    }

    /// Starts dragging a piece from where it currently sits.
    ///
    /// The piece also becomes the selected one. Locked and unknown pieces are
    /// ignored.
    pub fn begin_drag(&mut self, id: PieceId) {
        let Some(piece) = self.piece(id) else {
            return;
        };
        if piece.is_locked() {
            return;
        }
        let anchor = piece.current_position();
        self.selected = Some(id);
        self.drag = DragState::Dragging { piece: id, anchor };
        log::trace!("drag {id} began at ({}, {})", anchor.x, anchor.y);
    }

    /// Moves the dragged piece to the drag anchor offset by `translation`.
    ///
    /// The piece may leave the board; no snapping or occupancy checks happen
    /// until the drag ends. Ignored unless `id` is the dragged piece, and when
    /// the resulting position is not finite.
    pub fn update_drag(&mut self, id: PieceId, translation: Translation) {
        let DragState::Dragging { piece, anchor } = self.drag else {
            return;
        };
        if piece != id {
            return;
        }
        let moved = anchor + translation;
        if !moved.is_finite() {
            log::trace!(
                "drag {id} ignored non-finite translation ({}, {})",
                translation.dx,
                translation.dy
            );
            return;
        }
        if let Some(piece) = self.piece_mut(id).filter(|piece| !piece.is_locked()) {
            piece.current_position = moved;
        }
    }

    /// Releases the dragged piece and returns `true` if it locked.
    ///
    /// Released outside the board, the piece stays where it is and no move is
    /// counted. Released on the board, the move is counted and the piece snaps
    /// to the center of the nearest cell not occupied by another piece; if
    /// that cell is its target it locks, and the completion check runs.
    ///
    /// The drag always ends. Ignored (returning `false`) unless `id` is the
    /// dragged piece.
    pub fn end_drag(&mut self, id: PieceId, board_size: f64) -> bool {
        if self.drag.piece() != Some(id) {
            return false;
        }
        self.drag = DragState::Idle;

        let Some(level) = &self.level else {
            return false;
        };
        let board = BoardGeometry::new(board_size, level.grid_size);
        let Some(index) = self.piece_index(id) else {
            return false;
        };
        if self.pieces[index].is_locked() {
            return false;
        }

        let released = self.pieces[index].current_position;
        if !board.contains(released) {
            log::trace!("drag {id} parked off board at ({}, {})", released.x, released.y);
            return false;
        }

        self.move_count = self.move_count.saturating_add(1);

        let others = self
            .pieces
            .iter()
            .filter(|piece| piece.id != id)
            .map(Piece::current_position)
            .collect::<Vec<Point>>();
        let desired = board.cell_of(released);
        let snapped_cell =
            nearest_free_cell(&board, desired, &PositionOccupancy::new(&board, &others));
        let snapped = board.center_of(snapped_cell);

        let piece = &mut self.pieces[index];
        piece.current_position = snapped;
        log::debug!("drag {id} released: desired cell {desired}, snapped to {snapped_cell}");

        if !snapped.is_near(piece.target_position, board.epsilon()) {
            return false;
        }

        piece.lock();
        let cell = piece.target_cell;
        if self.selected == Some(id) {
            self.selected = None;
        }
        log::debug!("piece {id} locked at {cell}");
        self.emit(&SessionEvent::PieceLocked { piece: id, cell });
        self.check_completion();
        true
    }

    fn check_completion(&mut self) {
        if !self.status.is_active()
            || self.pieces.is_empty()
            || !self.pieces.iter().all(Piece::is_locked)
        {
            return;
        }
        let Some(level) = &self.level else {
            return;
        };

        if let Some(started_at) = self.started_at {
            self.elapsed = self.clock.now().saturating_sub(started_at);
        }
        self.status = SessionStatus::Completed;

        let event = CompletionEvent {
            level_id: level.id.clone(),
            elapsed: self.elapsed,
            moves: self.move_count,
        };
        log::info!(
            "level {} completed in {:?} with {} moves",
            event.level_id,
            event.elapsed,
            event.moves
        );
        self.emit(&SessionEvent::Completed(event));
    }

    fn emit(&mut self, event: &SessionEvent) {
        for observer in &mut self.observers {
            observer.on_event(event);
        }
    }

    fn piece_index(&self, id: PieceId) -> Option<usize> {
        self.pieces.iter().position(|piece| piece.id == id)
    }

    fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.iter_mut().find(|piece| piece.id == id)
    }
}

impl<C> Session<C> {
    // ----- Queries -----------------------------------------------------------

    /// Returns the lifecycle status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Returns `true` while a game is being played.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns `true` once every piece of the current game is locked.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Returns the level being played.
    #[must_use]
    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    /// Returns the board geometry the current game was started with.
    #[must_use]
    pub fn board(&self) -> Option<&BoardGeometry> {
        self.board.as_ref()
    }

    /// Returns the pieces in row-major solved order.
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Returns the piece with the given id.
    #[must_use]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|piece| piece.id == id)
    }

    /// Returns `true` if the piece sits within the configured snap threshold
    /// of its target.
    ///
    /// Presentation layers use this to highlight the target cell while a
    /// piece is dragged; it has no effect on snapping.
    #[must_use]
    pub fn is_over_target(&self, id: PieceId) -> bool {
        let (Some(board), Some(piece)) = (&self.board, self.piece(id)) else {
            return false;
        };
        piece
            .current_position()
            .is_near(piece.target_position(), self.config.snap_threshold(board))
    }

    /// Returns the number of locked pieces.
    #[must_use]
    pub fn locked_count(&self) -> usize {
        self.pieces.iter().filter(|piece| piece.is_locked()).count()
    }

    /// Returns the selected piece.
    #[must_use]
    pub fn selected_piece(&self) -> Option<PieceId> {
        self.selected
    }

    /// Returns the drag gesture state.
    #[must_use]
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Returns the interaction phase.
    #[must_use]
    pub fn phase(&self) -> InteractionPhase {
        InteractionPhase::new(self.selected, self.drag)
    }

    /// Returns the number of counted moves.
    #[must_use]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Returns the elapsed time as of the last timer update or completion.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns `true` if the solved-image overlay should be shown.
    #[must_use]
    pub fn is_hint_visible(&self) -> bool {
        self.hint_visible
    }

    /// Returns the seed of the current layout.
    #[must_use]
    pub fn layout_seed(&self) -> Option<LayoutSeed> {
        self.seed
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the clock.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use jigsaw_core::{Cell, GridSize};
    use proptest::prelude::*;

    use super::*;
    use crate::{LevelId, ManualClock};

    const BOARD: f64 = 300.0;

    fn level(n: u8) -> Level {
        Level::new(format!("test-{n}").as_str(), GridSize::new(n).unwrap())
    }

    fn started(n: u8) -> (Session<ManualClock>, ManualClock) {
        let clock = ManualClock::default();
        let mut session = Session::with_clock(clock.clone(), SessionConfig::default());
        session.start_game_with_seed(level(n), BOARD, LayoutSeed::from_phrase("session-tests"));
        (session, clock)
    }

    /// Moves every piece off the board so that no cell is occupied.
    fn park_all(session: &mut Session<ManualClock>) {
        for (i, piece) in (0u32..).zip(&mut session.pieces) {
            piece.current_position = Point::new(-100.0, -100.0 - f64::from(i) * 10.0);
        }
    }

    fn record_events<C: Clock>(session: &mut Session<C>) -> Rc<RefCell<Vec<SessionEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        session.subscribe({
            let events = Rc::clone(&events);
            move |event: &SessionEvent| events.borrow_mut().push(event.clone())
        });
        events
    }

    fn drag_to(session: &mut Session<ManualClock>, id: PieceId, to: Point) -> bool {
        session.begin_drag(id);
        let from = session.piece(id).unwrap().current_position();
        session.update_drag(id, to - from);
        session.end_drag(id, BOARD)
    }

    #[test]
    fn test_start_game_builds_row_major_pieces() {
        let (session, _) = started(3);
        assert!(session.is_active());
        assert_eq!(session.pieces().len(), 9);
        assert_eq!(session.move_count(), 0);
        assert_eq!(session.phase(), InteractionPhase::Idle);

        let board = *session.board().unwrap();
        for (i, piece) in session.pieces().iter().enumerate() {
            let cell = board.cell_at_index(i).unwrap();
            assert_eq!(piece.index(), i);
            assert_eq!(piece.target_cell(), cell);
            assert_eq!(piece.target_position(), board.center_of(cell));
            assert_eq!(piece.crop_rect(), board.crop_rect(cell));
            assert!(!piece.is_locked());
            assert!(
                piece.current_position().distance_to(piece.target_position()) >= 30.0,
                "piece {i} starts pre-solved"
            );
        }
    }

    #[test]
    fn test_start_game_is_reproducible_for_seed() {
        let (a, _) = started(4);
        let (b, _) = started(4);
        let positions = |s: &Session<ManualClock>| {
            s.pieces()
                .iter()
                .map(Piece::current_position)
                .collect::<Vec<_>>()
        };
        assert_eq!(positions(&a), positions(&b));
        assert_eq!(a.layout_seed(), Some(LayoutSeed::from_phrase("session-tests")));
    }

    #[test]
    fn test_release_near_center_snaps_and_locks() {
        let (mut session, _) = started(3);
        park_all(&mut session);
        let piece = session.pieces()[4].id();
        assert_eq!(session.piece(piece).unwrap().target_position(), Point::new(150.0, 150.0));

        assert!(drag_to(&mut session, piece, Point::new(162.0, 158.0)));

        let piece = session.piece(piece).unwrap();
        assert!(piece.is_locked());
        assert_eq!(piece.current_position(), Point::new(150.0, 150.0));
        assert_eq!(session.move_count(), 1);
        assert_eq!(session.drag_state(), DragState::Idle);
        assert_eq!(session.phase(), InteractionPhase::Idle);
    }

    #[test]
    fn test_release_off_board_parks_piece() {
        let (mut session, _) = started(3);
        park_all(&mut session);
        let piece = session.pieces()[0].id();

        assert!(!drag_to(&mut session, piece, Point::new(-10.0, 50.0)));

        let piece = session.piece(piece).unwrap();
        assert_eq!(piece.current_position(), Point::new(-10.0, 50.0));
        assert!(!piece.is_locked());
        assert_eq!(session.move_count(), 0);
        assert!(session.drag_state().is_idle());
        assert_eq!(session.phase(), InteractionPhase::Selected(piece.id()));
    }

    #[test]
    fn test_release_on_wrong_cell_snaps_without_lock() {
        let (mut session, _) = started(3);
        park_all(&mut session);
        let piece = session.pieces()[0].id();

        assert!(!drag_to(&mut session, piece, Point::new(240.0, 260.0)));

        let piece = session.piece(piece).unwrap();
        assert_eq!(piece.current_position(), Point::new(250.0, 250.0));
        assert!(!piece.is_locked());
        assert_eq!(session.move_count(), 1);
        assert_eq!(session.phase(), InteractionPhase::Selected(piece.id()));
    }

    #[test]
    fn test_occupied_target_diverts_piece() {
        let (mut session, _) = started(3);
        park_all(&mut session);
        let squatter = session.pieces()[0].id();
        let owner = session.pieces()[4].id();

        // Piece 0 snaps into the center cell, which belongs to piece 4.
        assert!(!drag_to(&mut session, squatter, Point::new(149.0, 151.0)));
        assert_eq!(session.piece(squatter).unwrap().current_position(), Point::new(150.0, 150.0));

        // Piece 4 is diverted to the first orthogonal neighbor in scan order.
        assert!(!drag_to(&mut session, owner, Point::new(150.0, 150.0)));
        assert_eq!(session.piece(owner).unwrap().current_position(), Point::new(150.0, 50.0));
        assert_eq!(session.move_count(), 2);

        // Once the squatter leaves, the owner locks.
        assert!(!drag_to(&mut session, squatter, Point::new(-20.0, -20.0)));
        assert!(drag_to(&mut session, owner, Point::new(150.0, 150.0)));
        assert_eq!(session.locked_count(), 1);
        assert_eq!(session.move_count(), 3);
    }

    #[test]
    fn test_locked_piece_is_not_interactive() {
        let (mut session, _) = started(3);
        park_all(&mut session);
        let piece = session.pieces()[4].id();
        assert!(drag_to(&mut session, piece, Point::new(150.0, 150.0)));

        session.select_piece(piece);
        assert_eq!(session.selected_piece(), None);

        session.begin_drag(piece);
        assert!(session.drag_state().is_idle());

        session.update_drag(piece, Translation::new(50.0, 50.0));
        assert!(!session.end_drag(piece, BOARD));
        assert_eq!(session.piece(piece).unwrap().current_position(), Point::new(150.0, 150.0));
        assert_eq!(session.move_count(), 1);
    }

    #[test]
    fn test_gestures_for_other_pieces_are_ignored() {
        let (mut session, _) = started(3);
        let dragged = session.pieces()[0].id();
        let other = session.pieces()[1].id();
        let other_start = session.piece(other).unwrap().current_position();

        // Not dragging anything yet.
        session.update_drag(dragged, Translation::new(5.0, 5.0));
        assert!(!session.end_drag(dragged, BOARD));

        session.begin_drag(dragged);
        session.update_drag(other, Translation::new(40.0, 0.0));
        assert_eq!(session.piece(other).unwrap().current_position(), other_start);
        assert!(!session.end_drag(other, BOARD));
        assert_eq!(session.drag_state().piece(), Some(dragged));
        assert_eq!(session.move_count(), 0);

        // Unknown ids are ignored everywhere.
        let unknown = PieceId::from_raw(u64::MAX);
        session.select_piece(unknown);
        session.begin_drag(unknown);
        assert_eq!(session.drag_state().piece(), Some(dragged));
        assert_eq!(session.selected_piece(), Some(dragged));
    }

    #[test]
    fn test_update_drag_follows_anchor_off_board() {
        let (mut session, _) = started(3);
        let piece = session.pieces()[2].id();
        let anchor = session.piece(piece).unwrap().current_position();

        session.begin_drag(piece);
        assert_eq!(session.drag_state().anchor(), Some(anchor));
        session.update_drag(piece, Translation::new(-1000.0, 20.0));
        session.update_drag(piece, Translation::new(-500.0, 10.0));

        assert_eq!(
            session.piece(piece).unwrap().current_position(),
            anchor + Translation::new(-500.0, 10.0)
        );
        assert_eq!(session.phase(), InteractionPhase::Dragging(piece));
    }

    #[test]
    fn test_update_drag_ignores_non_finite_translation() {
        let (mut session, _) = started(3);
        park_all(&mut session);
        let piece = session.pieces()[4].id();

        session.begin_drag(piece);
        let anchor = session.drag_state().anchor().unwrap();
        session.update_drag(piece, Translation::new(10.0, 20.0));
        for translation in [
            Translation::new(f64::INFINITY, 0.0),
            Translation::new(0.0, f64::NEG_INFINITY),
            Translation::new(f64::NAN, f64::NAN),
            Translation::new(f64::NAN, 5.0),
        ] {
            session.update_drag(piece, translation);
            assert_eq!(
                session.piece(piece).unwrap().current_position(),
                anchor + Translation::new(10.0, 20.0)
            );
        }
        assert!(!session.end_drag(piece, BOARD));

        // The piece is still playable from where it was parked.
        assert!(drag_to(&mut session, piece, Point::new(150.0, 150.0)));
        assert!(session.piece(piece).unwrap().is_locked());
    }

    #[test]
    fn test_select_piece_emits_event() {
        let (mut session, _) = started(3);
        let events = record_events(&mut session);
        let piece = session.pieces()[3].id();

        session.select_piece(piece);

        assert_eq!(session.phase(), InteractionPhase::Selected(piece));
        assert_eq!(*events.borrow(), vec![SessionEvent::PieceSelected { piece }]);
    }

    #[test]
    fn test_completion_by_dragging_every_piece() {
        let (mut session, clock) = started(3);
        park_all(&mut session);
        let events = record_events(&mut session);

        let ids = session.pieces().iter().map(Piece::id).collect::<Vec<_>>();
        for id in ids {
            clock.advance(Duration::from_secs(2));
            let target = session.piece(id).unwrap().target_position();
            assert!(drag_to(&mut session, id, target + Translation::new(7.0, -6.0)));
        }

        assert!(session.is_completed());
        assert!(!session.is_active());
        assert_eq!(session.elapsed(), Duration::from_secs(18));

        let events = events.borrow();
        assert_eq!(events.iter().filter(|e| e.is_piece_locked()).count(), 9);
        assert_eq!(
            events.last(),
            Some(&SessionEvent::Completed(CompletionEvent {
                level_id: LevelId::new("test-3"),
                elapsed: Duration::from_secs(18),
                moves: 9,
            }))
        );
    }

    #[test]
    fn test_auto_complete_fires_completion_once() {
        let (mut session, clock) = started(3);
        let events = record_events(&mut session);
        clock.advance(Duration::from_secs(42));

        session.auto_complete_game();
        session.auto_complete_game();

        assert_eq!(session.locked_count(), 9);
        assert!(session.is_completed());
        assert!(!session.is_active());
        for piece in session.pieces() {
            assert_eq!(piece.current_position(), piece.target_position());
        }

        let completions = events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                SessionEvent::Completed(completion) => Some(completion.clone()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(
            completions,
            vec![CompletionEvent {
                level_id: LevelId::new("test-3"),
                elapsed: Duration::from_secs(42),
                moves: 0,
            }]
        );

        // Elapsed time is frozen after completion.
        clock.advance(Duration::from_secs(10));
        session.update_timer();
        assert_eq!(session.elapsed(), Duration::from_secs(42));
    }

    #[test]
    fn test_auto_complete_clears_drag() {
        let (mut session, _) = started(3);
        let piece = session.pieces()[0].id();
        session.begin_drag(piece);

        session.auto_complete_game();

        assert!(session.drag_state().is_idle());
        assert!(!session.end_drag(piece, BOARD));
        assert_eq!(session.move_count(), 0);
    }

    #[test]
    fn test_update_timer_tracks_clock_while_active() {
        let (mut session, clock) = started(3);
        clock.advance(Duration::from_millis(2500));
        assert_eq!(session.elapsed(), Duration::ZERO);

        session.update_timer();
        assert_eq!(session.elapsed(), Duration::from_millis(2500));

        session.end_game();
        clock.advance(Duration::from_secs(5));
        session.update_timer();
        assert_eq!(session.elapsed(), Duration::from_millis(2500));
    }

    #[test]
    fn test_toggle_hint() {
        let (mut session, _) = started(3);
        assert!(!session.is_hint_visible());
        session.toggle_hint();
        assert!(session.is_hint_visible());
        session.toggle_hint();
        assert!(!session.is_hint_visible());

        session.toggle_hint();
        session.start_game_with_seed(level(3), BOARD, LayoutSeed::from_phrase("again"));
        assert!(!session.is_hint_visible());
    }

    #[test]
    fn test_end_game_clears_state_and_stale_ids() {
        let (mut session, _) = started(3);
        let stale = session.pieces()[0].id();
        session.begin_drag(stale);

        session.end_game();
        assert_eq!(session.status(), SessionStatus::Inactive);
        assert!(session.level().is_none());
        assert!(session.pieces().is_empty());
        assert!(session.drag_state().is_idle());
        assert!(!session.end_drag(stale, BOARD));

        // Nothing to complete without a game.
        session.auto_complete_game();
        assert!(!session.is_completed());

        session.start_game_with_seed(level(3), BOARD, LayoutSeed::from_phrase("second"));
        assert!(session.piece(stale).is_none());
        session.begin_drag(stale);
        assert!(session.drag_state().is_idle());
    }

    #[test]
    fn test_started_event() {
        let clock = ManualClock::default();
        let mut session = Session::with_clock(clock, SessionConfig::default());
        let events = record_events(&mut session);
        let seed = LayoutSeed::from_phrase("events");

        session.start_game_with_seed(level(4), BOARD, seed);

        assert_eq!(
            *events.borrow(),
            vec![SessionEvent::Started {
                level_id: LevelId::new("test-4"),
                piece_count: 16,
                seed,
            }]
        );
    }

    #[test]
    fn test_release_uses_current_board_size() {
        let (mut session, _) = started(3);
        park_all(&mut session);
        let piece = session.pieces()[8].id();

        // On a 600 board the point (250, 250) is in cell (1, 1), not the target (2, 2).
        session.begin_drag(piece);
        let from = session.piece(piece).unwrap().current_position();
        session.update_drag(piece, Point::new(250.0, 250.0) - from);
        assert!(!session.end_drag(piece, 600.0));
        let piece = session.piece(piece).unwrap();
        assert_eq!(piece.current_position(), Point::new(300.0, 300.0));
        assert!(!piece.is_locked());
    }

    #[test]
    fn test_is_over_target_uses_snap_threshold() {
        let (mut session, _) = started(3);
        park_all(&mut session);
        let piece = session.pieces()[0].id();
        assert_eq!(session.piece(piece).unwrap().target_cell(), Cell::new(0, 0));

        session.begin_drag(piece);
        let from = session.piece(piece).unwrap().current_position();
        session.update_drag(piece, Point::new(75.0, 50.0) - from);
        assert!(session.is_over_target(piece));
        session.update_drag(piece, Point::new(85.0, 50.0) - from);
        assert!(!session.is_over_target(piece));

        let mut relaxed = Session::with_clock(
            ManualClock::default(),
            SessionConfig::with_reduced_motion(true),
        );
        relaxed.start_game_with_seed(level(3), BOARD, LayoutSeed::from_phrase("session-tests"));
        park_all(&mut relaxed);
        let piece = relaxed.pieces()[0].id();
        relaxed.begin_drag(piece);
        let from = relaxed.piece(piece).unwrap().current_position();
        relaxed.update_drag(piece, Point::new(85.0, 50.0) - from);
        assert!(relaxed.is_over_target(piece));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Select(usize),
        Begin(usize),
        Update(usize, f64, f64),
        End(usize),
        AutoComplete,
        Hint,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..10).prop_map(Op::Select),
            (0usize..10).prop_map(Op::Begin),
            (0usize..10, -350.0f64..350.0, -350.0f64..350.0)
                .prop_map(|(i, dx, dy)| Op::Update(i, dx, dy)),
            (
                0usize..10,
                prop_oneof![
                    Just(f64::INFINITY),
                    Just(f64::NEG_INFINITY),
                    Just(f64::NAN),
                    Just(f64::MAX),
                ],
                -350.0f64..350.0,
            )
                .prop_map(|(i, dx, dy)| Op::Update(i, dx, dy)),
            (0usize..10).prop_map(Op::End),
            Just(Op::AutoComplete),
            Just(Op::Hint),
        ]
    }

    proptest! {
        #[test]
        fn locked_pieces_stay_on_target(
            ops in proptest::collection::vec(op_strategy(), 1..80),
            seed in any::<[u8; 32]>(),
        ) {
            let clock = ManualClock::default();
            let mut session = Session::with_clock(clock, SessionConfig::default());
            session.start_game_with_seed(level(3), BOARD, LayoutSeed::from_bytes(seed));
            let ids = session.pieces().iter().map(Piece::id).collect::<Vec<_>>();
            // Index 9 maps to an id the session never issued.
            let id = |i: usize| ids.get(i).copied().unwrap_or(PieceId::from_raw(u64::MAX));

            let mut previous_moves = 0;
            for op in ops {
                let moves_before = session.move_count();
                match op {
                    Op::Select(i) => session.select_piece(id(i)),
                    Op::Begin(i) => session.begin_drag(id(i)),
                    Op::Update(i, dx, dy) => session.update_drag(id(i), Translation::new(dx, dy)),
                    Op::End(i) => {
                        let was_dragging = session.drag_state().piece() == Some(id(i));
                        let released = session.piece(id(i)).map(Piece::current_position);
                        let locked = session.end_drag(id(i), BOARD);
                        let on_board = released.is_some_and(|p| session.board().unwrap().contains(p));
                        if !was_dragging || !on_board {
                            prop_assert!(!locked);
                            prop_assert_eq!(session.move_count(), moves_before);
                        }
                        prop_assert!(session.drag_state().is_idle() || !was_dragging);
                    }
                    Op::AutoComplete => session.auto_complete_game(),
                    Op::Hint => session.toggle_hint(),
                }

                prop_assert!(session.move_count() >= previous_moves);
                previous_moves = session.move_count();
                for piece in session.pieces() {
                    prop_assert!(piece.current_position().is_finite());
                    if piece.is_locked() {
                        prop_assert_eq!(piece.current_position(), piece.target_position());
                    }
                }
                if let Some(selected) = session.selected_piece() {
                    prop_assert!(!session.piece(selected).unwrap().is_locked());
                }
                prop_assert_eq!(
                    session.is_completed(),
                    session.locked_count() == session.pieces().len()
                );
            }
        }
    }
}
