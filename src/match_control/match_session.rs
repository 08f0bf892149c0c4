//! Caller-facing match facade.
//!
//! A `MatchSession` owns one shared controller plus the settings that built
//! it and, when the settings name one, the AI opponent. Front-ends talk to
//! squares and notation here; the controller underneath only knows piece ids.

use std::sync::Arc;

use tracing::info;

use crate::engines::evaluator::Evaluator;
use crate::errors::RacingChessError;
use crate::game_state::chess_types::*;
use crate::game_state::match_settings::{LayoutChoice, MatchSettings};
use crate::match_control::match_controller::{LayoutSource, MatchController, MatchSnapshot};
use crate::utils::algebraic::parse_coordinate_move;
use crate::utils::render_board::render_board;

pub struct MatchSession {
    controller: Arc<MatchController>,
    settings: MatchSettings,
    layout_source: LayoutSource,
    ai: Option<Evaluator>,
}

impl MatchSession {
    /// Apply `settings` to a fresh controller and start the clock.
    pub fn new(settings: MatchSettings) -> Self {
        Self::from_controller(MatchController::new(), settings)
    }

    pub fn with_observer<F>(settings: MatchSettings, observer: F) -> Self
    where
        F: Fn(MatchState) + Send + Sync + 'static,
    {
        Self::from_controller(MatchController::with_observer(observer), settings)
    }

    fn from_controller(controller: MatchController, settings: MatchSettings) -> Self {
        let ai = settings
            .ai
            .map(|ai| Evaluator::new(ai.difficulty, ai.color));
        let layout_source = controller.apply_settings(&settings);
        controller.start();
        info!(?layout_source, ai = ai.is_some(), "match session started");

        Self {
            controller: Arc::new(controller),
            settings,
            layout_source,
            ai,
        }
    }

    /// Replace the AI with a seeded one, for reproducible play.
    pub fn seed_ai(&mut self, seed: u64) {
        if let Some(ai) = self.settings.ai {
            self.ai = Some(Evaluator::with_seed(ai.difficulty, ai.color, seed));
        }
    }

    /// Shared handle for threads that play or observe the same match.
    pub fn controller(&self) -> &Arc<MatchController> {
        &self.controller
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    pub fn layout_source(&self) -> &LayoutSource {
        &self.layout_source
    }

    pub fn ai_color(&self) -> Option<Color> {
        self.ai.as_ref().map(Evaluator::color)
    }

    pub fn make_move(&self, from: Position, to: Position) -> bool {
        self.controller.submit_move_from(from, to)
    }

    /// Submit a coordinate move such as `e2e4`. Malformed notation is an
    /// error; an illegal move is `Ok(false)`.
    pub fn make_move_notation(&self, text: &str) -> Result<bool, RacingChessError> {
        let (from, to) = parse_coordinate_move(text)?;
        Ok(self.make_move(from, to))
    }

    /// Ask the configured AI for a move and submit it. Returns the move only
    /// when the controller accepted it.
    pub fn make_ai_move(&mut self) -> Option<Move> {
        let ai = self.ai.as_mut()?;
        let proposal = ai.best_move(&self.controller.snapshot())?;
        self.controller
            .submit_move(proposal.piece_id, proposal.to)
            .then_some(proposal)
    }

    pub fn state(&self) -> MatchState {
        self.controller.state()
    }

    pub fn is_game_over(&self) -> bool {
        self.state().is_finished()
    }

    pub fn winner(&self) -> Option<Color> {
        match self.state() {
            MatchState::WhiteWon => Some(Color::White),
            MatchState::BlackWon => Some(Color::Black),
            _ => None,
        }
    }

    pub fn pause(&self) -> bool {
        self.controller.pause()
    }

    pub fn resume(&self) -> bool {
        self.controller.resume()
    }

    /// Reset, then re-apply the settings with a new layout and start again.
    pub fn restart(&mut self, layout: LayoutChoice) -> &LayoutSource {
        self.settings.layout = layout;
        self.controller.reset();
        self.layout_source = self.controller.apply_settings(&self.settings);
        self.controller.start();
        &self.layout_source
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        self.controller.snapshot()
    }

    pub fn render(&self) -> String {
        render_board(&self.snapshot().board)
    }
}
