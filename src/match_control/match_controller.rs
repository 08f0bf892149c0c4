//! The racing-chess match state machine.
//!
//! `MatchController` binds settings, the piece store, the validator and the
//! ticker into a playable match:
//!
//! `NotStarted -> AwaitingSettings -> Active <-> Paused`, with `Active`
//! ending in `WhiteWon` or `BlackWon` when a king is captured, and `reset`
//! returning any state to `AwaitingSettings`.
//!
//! All match data lives in one `MatchCore` behind a single mutex. The ticker
//! thread and callers each hold that lock for one whole tick or one whole
//! move submission, so the two never interleave. Lifecycle methods take the
//! ticker lock before the core lock; nothing takes them in the other order.
//! Observers are always called with no lock held.

use std::collections::BTreeSet;
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::errors::LayoutError;
use crate::game_state::chess_rules::promotion_row;
use crate::game_state::chess_types::*;
use crate::game_state::match_settings::{LayoutChoice, MatchSettings};
use crate::game_state::piece_store::PieceStore;
use crate::move_generation::legal_moves_king::{castling_rook, castling_rook_target};
use crate::move_generation::move_validator::MoveValidator;
use crate::timing::ticker::{TickFlow, Ticker};
use crate::utils::layout_generator::generate_layout;

/// Single subscriber notified of every match state transition.
pub type StateObserver = Arc<dyn Fn(MatchState) + Send + Sync>;

/// Where the board of the last `apply_settings` came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutSource {
    Standard,
    Descriptor,
    /// The descriptor was rejected and the standard layout used instead.
    StandardFallback(LayoutError),
}

/// Read-only copy of a match, the input of the evaluator.
#[derive(Debug, Clone)]
pub struct MatchSnapshot {
    pub state: MatchState,
    pub board: PieceStore,
    pub white_cooldown: Ticks,
    pub black_cooldown: Ticks,
}

#[derive(Debug)]
struct MatchCore {
    board: PieceStore,
    validator: MoveValidator,
    state: MatchState,
    white_cooldown: Ticks,
    black_cooldown: Ticks,
    ticks_elapsed: u64,
}

impl MatchCore {
    fn new() -> Self {
        let defaults = MatchSettings::default();
        Self {
            board: PieceStore::new_empty(),
            validator: MoveValidator,
            state: MatchState::NotStarted,
            white_cooldown: defaults.white_cooldown_ticks,
            black_cooldown: defaults.black_cooldown_ticks,
            ticks_elapsed: 0,
        }
    }

    #[inline]
    fn cooldown_for(&self, color: Color) -> Ticks {
        match color {
            Color::White => self.white_cooldown,
            Color::Black => self.black_cooldown,
        }
    }

    fn has_live_pieces(&self) -> bool {
        self.board.all_pieces(false).next().is_some()
    }

    fn install_layout(&mut self, layout: &LayoutChoice) -> LayoutSource {
        match layout {
            LayoutChoice::Standard => {
                self.board.setup_standard();
                LayoutSource::Standard
            }
            LayoutChoice::Descriptor(descriptor) => {
                match self.board.setup_from_layout(descriptor) {
                    Ok(()) => LayoutSource::Descriptor,
                    Err(err) => {
                        warn!(%err, descriptor = descriptor.as_str(), "invalid layout, using standard position");
                        self.board.setup_standard();
                        LayoutSource::StandardFallback(err)
                    }
                }
            }
        }
    }

    fn apply_cooldown(&mut self, piece_id: PieceId) {
        if let Some(color) = self.board.piece_by_id(piece_id).map(|p| p.color) {
            let ticks = self.cooldown_for(color);
            self.board.set_cooldown(piece_id, ticks);
        }
    }

    /// One full move submission. Returns acceptance and, when the move ended
    /// the match, the terminal state.
    fn submit_move(&mut self, piece_id: PieceId, target: Position) -> (bool, Option<MatchState>) {
        if self.state != MatchState::Active {
            return (false, None);
        }
        let Some(piece) = self.board.piece_by_id(piece_id).copied() else {
            return (false, None);
        };
        if piece.cooldown_remaining > 0 || !self.validator.is_legal(&self.board, piece_id, target)
        {
            return (false, None);
        }

        let moved = match castling_rook(&self.board, &piece, target).map(|rook| rook.id) {
            Some(rook_id) => self.castle(&piece, rook_id, target),
            None => self.relocate(&piece, target),
        };
        if !moved {
            return (false, None);
        }

        debug!(piece_id, from = %piece.position, to = %target, "move applied");
        (true, self.evaluate_winner())
    }

    fn relocate(&mut self, piece: &Piece, target: Position) -> bool {
        if !self.board.move_piece(piece.id, target) {
            return false;
        }
        if piece.kind == PieceKind::Pawn && target.row == promotion_row(piece.color) {
            self.board.promote(piece.id, PieceKind::Queen);
        }
        self.apply_cooldown(piece.id);
        true
    }

    /// King first, then rook. If the rook cannot follow, the board is
    /// restored to its state before the king moved.
    fn castle(&mut self, king: &Piece, rook_id: PieceId, target: Position) -> bool {
        let before = self.board.clone();

        if !self.board.move_piece(king.id, target) {
            return false;
        }
        let rook_target = castling_rook_target(king.position, target);
        if !self.board.move_piece(rook_id, rook_target) {
            self.board = before;
            return false;
        }

        self.apply_cooldown(king.id);
        self.apply_cooldown(rook_id);
        true
    }

    fn evaluate_winner(&mut self) -> Option<MatchState> {
        if self.state != MatchState::Active {
            return None;
        }
        let loser = [Color::White, Color::Black]
            .into_iter()
            .find(|&color| self.board.king_count(color) == 0)?;
        self.state = MatchState::won_against(loser);
        Some(self.state)
    }

    /// One full tick: cooldown decay, then the win check.
    fn on_tick(&mut self) -> (TickFlow, Option<MatchState>) {
        if self.state != MatchState::Active {
            return (ControlFlow::Break(()), None);
        }
        self.board.decrement_all_cooldowns();
        self.ticks_elapsed += 1;

        match self.evaluate_winner() {
            Some(finished) => (ControlFlow::Break(()), Some(finished)),
            None => (ControlFlow::Continue(()), None),
        }
    }

    fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            state: self.state,
            board: self.board.clone(),
            white_cooldown: self.white_cooldown,
            black_cooldown: self.black_cooldown,
        }
    }
}

#[inline]
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Every critical section leaves the match consistent, so a poisoned lock
    // still guards valid data.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn notify(observer: &Option<StateObserver>, state: MatchState) {
    info!(?state, "match state changed");
    if let Some(observer) = observer {
        observer(state);
    }
}

pub struct MatchController {
    core: Arc<Mutex<MatchCore>>,
    ticker: Mutex<Ticker>,
    observer: Option<StateObserver>,
}

impl Default for MatchController {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchController {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Controller whose state transitions are reported to `observer`.
    ///
    /// The observer runs on whichever thread caused the transition, the
    /// ticker thread included.
    pub fn with_observer<F>(observer: F) -> Self
    where
        F: Fn(MatchState) + Send + Sync + 'static,
    {
        Self::build(Some(Arc::new(observer)))
    }

    fn build(observer: Option<StateObserver>) -> Self {
        Self {
            core: Arc::new(Mutex::new(MatchCore::new())),
            ticker: Mutex::new(Ticker::default()),
            observer,
        }
    }

    /// Store timing, install the initial layout and wait for `start`.
    pub fn apply_settings(&self, settings: &MatchSettings) -> LayoutSource {
        let source = {
            let mut ticker = lock(&self.ticker);
            ticker.stop();
            ticker.set_period(Duration::from_millis(settings.tick_period_ms));

            let mut core = lock(&self.core);
            core.white_cooldown = settings.white_cooldown_ticks;
            core.black_cooldown = settings.black_cooldown_ticks;
            let source = core.install_layout(&settings.layout);
            core.state = MatchState::AwaitingSettings;
            source
        };
        notify(&self.observer, MatchState::AwaitingSettings);
        source
    }

    /// `NotStarted | AwaitingSettings -> Active`. An empty board gets the
    /// standard layout first.
    pub fn start(&self) -> bool {
        {
            let mut ticker = lock(&self.ticker);
            {
                let mut core = lock(&self.core);
                if !matches!(
                    core.state,
                    MatchState::NotStarted | MatchState::AwaitingSettings
                ) {
                    return false;
                }
                if !core.has_live_pieces() {
                    core.board.setup_standard();
                }
                core.state = MatchState::Active;
            }
            self.launch_ticker(&mut ticker);
        }
        notify(&self.observer, MatchState::Active);
        true
    }

    /// `Active -> Paused`. Returns once the ticker thread has exited.
    pub fn pause(&self) -> bool {
        {
            let mut ticker = lock(&self.ticker);
            {
                let mut core = lock(&self.core);
                if core.state != MatchState::Active {
                    return false;
                }
                core.state = MatchState::Paused;
            }
            ticker.stop();
        }
        notify(&self.observer, MatchState::Paused);
        true
    }

    /// `Paused -> Active`.
    pub fn resume(&self) -> bool {
        {
            let mut ticker = lock(&self.ticker);
            {
                let mut core = lock(&self.core);
                if core.state != MatchState::Paused {
                    return false;
                }
                core.state = MatchState::Active;
            }
            self.launch_ticker(&mut ticker);
        }
        notify(&self.observer, MatchState::Active);
        true
    }

    /// Stop the clock and return to `AwaitingSettings`. The board is only
    /// reseeded when it has no live pieces; otherwise it is kept as is.
    pub fn reset(&self) {
        {
            let mut ticker = lock(&self.ticker);
            ticker.stop();

            let mut core = lock(&self.core);
            if !core.has_live_pieces() {
                core.board.setup_standard();
            }
            core.state = MatchState::AwaitingSettings;
        }
        notify(&self.observer, MatchState::AwaitingSettings);
    }

    /// Move `piece_id` to `target`. Only accepted while the match is active,
    /// the piece is off cooldown and the move is legal. Castling moves king
    /// and rook together; a pawn reaching its last row becomes a queen.
    pub fn submit_move(&self, piece_id: PieceId, target: Position) -> bool {
        let (accepted, finished) = lock(&self.core).submit_move(piece_id, target);

        if let Some(finished) = finished {
            {
                let mut ticker = lock(&self.ticker);
                // A reset and restart may have slipped in between the two locks.
                if lock(&self.core).state == finished {
                    ticker.stop();
                }
            }
            notify(&self.observer, finished);
        }
        accepted
    }

    /// Convenience for front-ends that address pieces by square.
    pub fn submit_move_from(&self, from: Position, to: Position) -> bool {
        let Some(piece_id) = self.piece_at(from).map(|p| p.id) else {
            return false;
        };
        self.submit_move(piece_id, to)
    }

    fn launch_ticker(&self, ticker: &mut Ticker) {
        let core = Arc::clone(&self.core);
        let observer = self.observer.clone();
        ticker.start(move || {
            let (flow, finished) = lock(&core).on_tick();
            if let Some(finished) = finished {
                notify(&observer, finished);
            }
            flow
        });
    }

    pub fn legal_targets(&self, piece_id: PieceId) -> BTreeSet<Position> {
        let core = lock(&self.core);
        core.validator.legal_targets(&core.board, piece_id)
    }

    pub fn piece_at(&self, position: Position) -> Option<Piece> {
        lock(&self.core).board.piece_at(position).copied()
    }

    pub fn piece_by_id(&self, piece_id: PieceId) -> Option<Piece> {
        lock(&self.core).board.piece_by_id(piece_id).copied()
    }

    pub fn all_pieces(&self, include_captured: bool) -> Vec<Piece> {
        lock(&self.core)
            .board
            .all_pieces(include_captured)
            .copied()
            .collect()
    }

    pub fn state(&self) -> MatchState {
        lock(&self.core).state
    }

    pub fn cooldown_for(&self, color: Color) -> Ticks {
        lock(&self.core).cooldown_for(color)
    }

    pub fn white_cooldown(&self) -> Ticks {
        self.cooldown_for(Color::White)
    }

    pub fn black_cooldown(&self) -> Ticks {
        self.cooldown_for(Color::Black)
    }

    pub fn tick_period(&self) -> Duration {
        lock(&self.ticker).period()
    }

    pub fn ticks_elapsed(&self) -> u64 {
        lock(&self.core).ticks_elapsed
    }

    /// Whether the background ticker thread is currently alive.
    pub fn is_ticking(&self) -> bool {
        lock(&self.ticker).is_running()
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        lock(&self.core).snapshot()
    }

    /// Placement descriptor of the live pieces.
    pub fn layout_descriptor(&self) -> String {
        generate_layout(&lock(&self.core).board)
    }
}

impl Drop for MatchController {
    fn drop(&mut self) {
        lock(&self.ticker).stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STANDARD_LAYOUT;
    use std::thread;
    use std::time::Instant;

    // Long enough that the background ticker never fires during a test;
    // ticks are driven by hand through `tick`.
    const IDLE_PERIOD_MS: u64 = 60_000;

    fn settings(layout: &str, cooldown: Ticks) -> MatchSettings {
        MatchSettings {
            white_cooldown_ticks: cooldown,
            black_cooldown_ticks: cooldown,
            tick_period_ms: IDLE_PERIOD_MS,
            layout: LayoutChoice::from_text(layout),
            ai: None,
        }
    }

    fn active(layout: &str, cooldown: Ticks) -> MatchController {
        let controller = MatchController::new();
        controller.apply_settings(&settings(layout, cooldown));
        assert!(controller.start());
        controller
    }

    fn tick(controller: &MatchController) -> TickFlow {
        lock(&controller.core).on_tick().0
    }

    fn id_at(controller: &MatchController, row: u8, col: u8) -> PieceId {
        controller
            .piece_at(Position::new(row, col))
            .expect("square should be occupied")
            .id
    }

    fn recording_controller() -> (MatchController, Arc<Mutex<Vec<MatchState>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let controller = MatchController::with_observer(move |state| {
            lock(&sink).push(state);
        });
        (controller, seen)
    }

    #[test]
    fn controller_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MatchController>();
    }

    #[test]
    fn lifecycle_transitions_and_notifications() {
        let (controller, seen) = recording_controller();
        assert_eq!(controller.state(), MatchState::NotStarted);

        controller.apply_settings(&settings("standard", 5));
        assert_eq!(controller.state(), MatchState::AwaitingSettings);
        assert!(!controller.pause());
        assert!(!controller.resume());

        assert!(controller.start());
        assert!(controller.is_ticking());
        assert!(!controller.start());
        assert!(!controller.resume());

        assert!(controller.pause());
        assert_eq!(controller.state(), MatchState::Paused);
        assert!(!controller.is_ticking());
        assert!(!controller.pause());

        assert!(controller.resume());
        assert!(controller.is_ticking());

        controller.reset();
        assert_eq!(controller.state(), MatchState::AwaitingSettings);
        assert!(!controller.is_ticking());

        assert!(controller.start());
        assert!(controller.is_ticking());
        controller.apply_settings(&settings("standard", 5));
        assert_eq!(controller.state(), MatchState::AwaitingSettings);
        assert!(!controller.is_ticking());

        assert_eq!(
            *lock(&seen),
            vec![
                MatchState::AwaitingSettings,
                MatchState::Active,
                MatchState::Paused,
                MatchState::Active,
                MatchState::AwaitingSettings,
                MatchState::Active,
                MatchState::AwaitingSettings,
            ]
        );
    }

    #[test]
    fn settings_configure_cooldowns_and_period() {
        let controller = MatchController::new();
        let mut config = settings("standard", 0);
        config.white_cooldown_ticks = 7;
        config.black_cooldown_ticks = 3;
        config.tick_period_ms = 250;

        assert_eq!(controller.apply_settings(&config), LayoutSource::Standard);
        assert_eq!(controller.white_cooldown(), 7);
        assert_eq!(controller.black_cooldown(), 3);
        assert_eq!(controller.tick_period(), Duration::from_millis(250));
        assert_eq!(controller.layout_descriptor(), STANDARD_LAYOUT);
    }

    #[test]
    fn invalid_descriptor_falls_back_to_standard() {
        let controller = MatchController::new();
        let source = controller.apply_settings(&settings(
            "rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
            5,
        ));

        assert_eq!(
            source,
            LayoutSource::StandardFallback(LayoutError::RankOverflow { rank: 2 })
        );
        assert_eq!(controller.layout_descriptor(), STANDARD_LAYOUT);
        assert_eq!(controller.all_pieces(false).len(), 32);
    }

    #[test]
    fn custom_descriptor_is_installed() {
        let controller = MatchController::new();
        let source = controller.apply_settings(&settings("4k3/8/8/8/8/8/8/R3K3", 5));

        assert_eq!(source, LayoutSource::Descriptor);
        assert_eq!(controller.all_pieces(false).len(), 3);
    }

    #[test]
    fn moves_are_rejected_unless_active() {
        let controller = MatchController::new();
        controller.apply_settings(&settings("standard", 5));
        let pawn = id_at(&controller, 1, 0);

        assert!(!controller.submit_move(pawn, Position::new(2, 0)));
        controller.start();
        controller.pause();
        assert!(!controller.submit_move(pawn, Position::new(2, 0)));
        controller.resume();
        assert!(controller.submit_move(pawn, Position::new(2, 0)));
    }

    #[test]
    fn pawn_double_step_only_once() {
        let controller = active("standard", 0);
        let pawn = id_at(&controller, 1, 0);

        assert!(controller.legal_targets(pawn).contains(&Position::new(3, 0)));
        assert!(!controller.legal_targets(pawn).contains(&Position::new(4, 0)));
        assert!(controller.submit_move(pawn, Position::new(2, 0)));

        assert!(!controller.legal_targets(pawn).contains(&Position::new(4, 0)));
        assert!(!controller.submit_move(pawn, Position::new(4, 0)));
    }

    #[test]
    fn successful_move_applies_color_cooldown() {
        let controller = MatchController::new();
        let mut config = settings("standard", 0);
        config.white_cooldown_ticks = 3;
        config.black_cooldown_ticks = 6;
        controller.apply_settings(&config);
        controller.start();

        let white_knight = id_at(&controller, 0, 1);
        let black_knight = id_at(&controller, 7, 1);
        assert!(controller.submit_move(white_knight, Position::new(2, 2)));
        assert!(controller.submit_move(black_knight, Position::new(5, 2)));

        let cooldown = |id| controller.piece_by_id(id).map(|p| p.cooldown_remaining);
        assert_eq!(cooldown(white_knight), Some(3));
        assert_eq!(cooldown(black_knight), Some(6));
    }

    #[test]
    fn cooldown_gates_moves_until_ticks_elapse() {
        let controller = active("standard", 2);
        let knight = id_at(&controller, 0, 6);

        assert!(controller.submit_move(knight, Position::new(2, 5)));
        assert!(controller.legal_targets(knight).is_empty());
        assert!(!controller.submit_move(knight, Position::new(4, 4)));

        assert!(tick(&controller).is_continue());
        assert_eq!(controller.piece_by_id(knight).map(|p| p.cooldown_remaining), Some(1));
        assert!(!controller.submit_move(knight, Position::new(4, 4)));

        tick(&controller);
        assert_eq!(controller.piece_by_id(knight).map(|p| p.cooldown_remaining), Some(0));
        assert!(controller.submit_move(knight, Position::new(4, 4)));
        assert_eq!(controller.ticks_elapsed(), 2);
    }

    #[test]
    fn capture_marks_enemy_captured() {
        let controller = active("standard", 0);
        let white_pawn = id_at(&controller, 1, 1);
        let black_pawn = id_at(&controller, 6, 0);

        assert!(controller.submit_move(white_pawn, Position::new(3, 1)));
        assert!(controller.submit_move(white_pawn, Position::new(4, 1)));
        assert!(controller.submit_move(black_pawn, Position::new(5, 0)));

        assert!(controller.legal_targets(white_pawn).contains(&Position::new(5, 0)));
        assert!(controller.submit_move(white_pawn, Position::new(5, 0)));

        assert!(controller.piece_by_id(black_pawn).expect("record kept").captured);
        assert_eq!(controller.piece_at(Position::new(5, 0)).map(|p| p.id), Some(white_pawn));
        assert_eq!(controller.all_pieces(false).len(), 31);
        assert_eq!(controller.all_pieces(true).len(), 32);
    }

    #[test]
    fn castling_moves_king_and_rook_with_cooldown() {
        let controller = active("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R", 4);
        let king = id_at(&controller, 0, 4);
        let rook = id_at(&controller, 0, 7);

        assert!(controller.submit_move(king, Position::new(0, 6)));

        let king_after = controller.piece_by_id(king).expect("king");
        let rook_after = controller.piece_by_id(rook).expect("rook");
        assert_eq!(king_after.position, Position::new(0, 6));
        assert_eq!(rook_after.position, Position::new(0, 5));
        assert_eq!(king_after.cooldown_remaining, 4);
        assert_eq!(rook_after.cooldown_remaining, 4);
    }

    #[test]
    fn queenside_castling_places_rook_on_d_file() {
        let controller = active("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R", 1);
        let king = id_at(&controller, 7, 4);
        let rook = id_at(&controller, 7, 0);

        assert!(controller.submit_move(king, Position::new(7, 2)));
        assert_eq!(controller.piece_by_id(rook).map(|p| p.position), Some(Position::new(7, 3)));
    }

    #[test]
    fn failed_rook_leg_restores_board() {
        let controller = active("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R", 4);
        let king = controller.piece_at(Position::new(0, 4)).expect("king");
        let before = controller.snapshot().board;

        let mut core = lock(&controller.core);
        assert!(!core.castle(&king, 999, Position::new(0, 6)));
        assert_eq!(core.board, before);
    }

    #[test]
    fn pawn_promotes_to_queen_on_arrival() {
        let controller = active("4k3/P7/8/8/8/8/p7/4K3", 0);
        let white_pawn = id_at(&controller, 6, 0);
        let black_pawn = id_at(&controller, 1, 0);

        assert!(controller.submit_move(white_pawn, Position::new(7, 0)));
        assert!(controller.submit_move(black_pawn, Position::new(0, 0)));

        assert_eq!(controller.piece_by_id(white_pawn).map(|p| p.kind), Some(PieceKind::Queen));
        assert_eq!(controller.piece_by_id(black_pawn).map(|p| p.kind), Some(PieceKind::Queen));
    }

    #[test]
    fn capturing_king_ends_match() {
        let (controller, seen) = recording_controller();
        controller.apply_settings(&settings("4k3/4R3/8/8/8/8/8/4K3", 3));
        controller.start();
        let rook = id_at(&controller, 6, 4);

        assert!(controller.submit_move(rook, Position::new(7, 4)));
        assert_eq!(controller.state(), MatchState::WhiteWon);
        assert!(!controller.is_ticking());
        assert_eq!(lock(&seen).last(), Some(&MatchState::WhiteWon));

        let white_king = id_at(&controller, 0, 4);
        assert!(!controller.submit_move(white_king, Position::new(1, 4)));
        assert!(!controller.start());
        assert!(!controller.pause());
    }

    #[test]
    fn tick_detects_missing_king() {
        let controller = active("4k3/4R3/8/8/8/8/8/4K3", 0);
        let rook = id_at(&controller, 6, 4);
        assert!(controller.submit_move(rook, Position::new(7, 4)));

        // Reset keeps the kingless board, so the next tick decides the match.
        controller.reset();
        assert!(controller.start());
        assert_eq!(controller.state(), MatchState::Active);

        assert!(tick(&controller).is_break());
        assert_eq!(controller.state(), MatchState::WhiteWon);
        assert!(tick(&controller).is_break());
    }

    #[test]
    fn background_tick_ends_kingless_match() {
        let (controller, seen) = recording_controller();
        let mut config = settings("4k3/4R3/8/8/8/8/8/4K3", 0);
        config.tick_period_ms = 5;
        controller.apply_settings(&config);
        controller.start();
        let rook = id_at(&controller, 6, 4);
        assert!(controller.submit_move(rook, Position::new(7, 4)));

        controller.reset();
        assert!(controller.start());

        let deadline = Instant::now() + Duration::from_secs(5);
        while controller.state() != MatchState::WhiteWon || controller.is_ticking() {
            assert!(Instant::now() < deadline, "ticker never ended the match");
            thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(
            *lock(&seen),
            vec![
                MatchState::AwaitingSettings,
                MatchState::Active,
                MatchState::WhiteWon,
                MatchState::AwaitingSettings,
                MatchState::Active,
                MatchState::WhiteWon,
            ]
        );
    }

    #[test]
    fn black_wins_when_white_king_falls() {
        let controller = active("4k3/8/8/8/8/8/4q3/4K3", 0);
        let queen = id_at(&controller, 1, 4);

        assert!(controller.submit_move(queen, Position::new(0, 4)));
        assert_eq!(controller.state(), MatchState::BlackWon);
    }

    #[test]
    fn tick_outside_active_stops_ticker_without_decay() {
        let controller = active("standard", 5);
        let pawn = id_at(&controller, 1, 4);
        controller.submit_move(pawn, Position::new(3, 4));
        controller.pause();

        assert!(tick(&controller).is_break());
        assert_eq!(controller.piece_by_id(pawn).map(|p| p.cooldown_remaining), Some(5));
    }

    #[test]
    fn reset_keeps_existing_board() {
        let controller = active("standard", 0);
        let pawn = id_at(&controller, 1, 4);
        controller.submit_move(pawn, Position::new(3, 4));

        controller.reset();
        assert_eq!(controller.state(), MatchState::AwaitingSettings);
        assert_eq!(controller.piece_by_id(pawn).map(|p| p.position), Some(Position::new(3, 4)));
    }

    #[test]
    fn reset_seeds_empty_board() {
        let controller = MatchController::new();
        assert!(controller.all_pieces(true).is_empty());

        controller.reset();
        assert_eq!(controller.layout_descriptor(), STANDARD_LAYOUT);
        assert_eq!(controller.state(), MatchState::AwaitingSettings);
    }

    #[test]
    fn start_without_settings_uses_standard_layout() {
        let controller = MatchController::new();
        assert!(controller.start());
        assert_eq!(controller.all_pieces(false).len(), 32);
        controller.pause();
    }

    #[test]
    fn background_ticker_decays_cooldowns() {
        let controller = MatchController::new();
        let mut config = settings("standard", 3);
        config.tick_period_ms = 5;
        controller.apply_settings(&config);
        controller.start();

        let pawn = id_at(&controller, 1, 3);
        assert!(controller.submit_move(pawn, Position::new(3, 3)));

        let deadline = Instant::now() + Duration::from_secs(5);
        while controller.piece_by_id(pawn).map(|p| p.cooldown_remaining) != Some(0) {
            assert!(Instant::now() < deadline, "cooldown never decayed");
            thread::sleep(Duration::from_millis(5));
        }
        assert!(controller.ticks_elapsed() >= 3);

        assert!(controller.pause());
        let frozen = controller.ticks_elapsed();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(controller.ticks_elapsed(), frozen);
    }

    #[test]
    fn concurrent_moves_and_ticks_keep_board_consistent() {
        let controller = Arc::new(MatchController::new());
        let mut config = settings("standard", 1);
        config.tick_period_ms = 1;
        controller.apply_settings(&config);
        controller.start();

        let mover = {
            let controller = Arc::clone(&controller);
            thread::spawn(move || {
                let knight = id_at(&controller, 0, 1);
                let squares = [Position::new(2, 2), Position::new(0, 1)];
                let mut hops = 0;
                let deadline = Instant::now() + Duration::from_secs(5);
                while hops < 10 && Instant::now() < deadline {
                    if controller.submit_move(knight, squares[hops % 2]) {
                        hops += 1;
                    }
                    thread::yield_now();
                }
                hops
            })
        };

        let hops = mover.join().expect("mover thread");
        assert_eq!(hops, 10);
        controller.pause();

        let live = controller.all_pieces(false);
        assert_eq!(live.len(), 32);
        let mut squares: Vec<Position> = live.iter().map(|p| p.position).collect();
        squares.sort();
        squares.dedup();
        assert_eq!(squares.len(), 32);
    }
}
