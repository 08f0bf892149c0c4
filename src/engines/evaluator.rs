//! Computer opponent for one colour.
//!
//! Enumerates every ready piece of its colour and every legal target of that
//! piece, scores each candidate with `move_scoring`, then picks uniformly
//! among the top N candidates where N comes from the difficulty. The
//! evaluator only reads a `MatchSnapshot`; the caller submits the chosen move
//! through the controller like any human move.

use chrono::Utc;
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::engines::move_scoring::score_move;
use crate::game_state::chess_types::*;
use crate::match_control::match_controller::MatchSnapshot;
use crate::move_generation::move_validator::legal_targets;

/// One scored (piece, destination) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub piece_id: PieceId,
    pub from: Position,
    pub to: Position,
    pub score: f64,
}

#[derive(Debug)]
pub struct Evaluator {
    color: Color,
    difficulty: AiDifficulty,
    breadth: usize,
    rng: StdRng,
}

impl Evaluator {
    pub fn new(difficulty: AiDifficulty, color: Color) -> Self {
        Self::with_rng(difficulty, color, StdRng::from_rng(&mut rand::rng()))
    }

    /// Reproducible evaluator for tests and self-play.
    pub fn with_seed(difficulty: AiDifficulty, color: Color, seed: u64) -> Self {
        Self::with_rng(difficulty, color, StdRng::seed_from_u64(seed))
    }

    fn with_rng(difficulty: AiDifficulty, color: Color, rng: StdRng) -> Self {
        Self {
            color,
            difficulty,
            breadth: difficulty.breadth(),
            rng,
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn difficulty(&self) -> AiDifficulty {
        self.difficulty
    }

    /// How many of the best candidates the choice is drawn from.
    #[inline]
    pub fn breadth(&self) -> usize {
        self.breadth
    }

    pub fn set_difficulty(&mut self, difficulty: AiDifficulty) {
        self.difficulty = difficulty;
        self.breadth = difficulty.breadth();
    }

    /// All candidates for this colour, best first. Equal scores keep
    /// enumeration order (piece id, then row-major target).
    pub fn ranked_candidates(&self, snapshot: &MatchSnapshot) -> Vec<Candidate> {
        let board = &snapshot.board;
        let mut candidates: Vec<Candidate> = board
            .pieces_of(self.color, false)
            .filter(|piece| piece.is_ready())
            .flat_map(|piece| {
                legal_targets(board, piece.id)
                    .into_iter()
                    .map(move |to| Candidate {
                        piece_id: piece.id,
                        from: piece.position,
                        to,
                        score: score_move(board, piece, to),
                    })
            })
            .collect();

        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates
    }

    /// A move for this colour, or `None` when every piece is cooling down or
    /// blocked.
    pub fn best_move(&mut self, snapshot: &MatchSnapshot) -> Option<Move> {
        let candidates = self.ranked_candidates(snapshot);
        debug!(color = %self.color, candidates = candidates.len(), "ai candidates scored");

        let top_n = self.breadth.min(candidates.len());
        let picked = candidates[..top_n].choose(&mut self.rng)?;

        info!(
            color = %self.color,
            piece_id = picked.piece_id,
            from = %picked.from,
            to = %picked.to,
            score = picked.score,
            "ai selected move"
        );
        Some(Move {
            piece_id: picked.piece_id,
            from: picked.from,
            to: picked.to,
            timestamp: Utc::now(),
        })
    }
}
