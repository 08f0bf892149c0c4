//! Errors used throughout the racing-chess engine.
//!
//! Expected rejections (illegal move, unknown piece, wrong lifecycle state)
//! are reported as `bool`/`Option` results and never appear here. These enums
//! cover malformed input that callers may want to diagnose: placement
//! descriptors, square notation and settings files.

use thiserror::Error;

/// Reasons a placement descriptor is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("placement descriptor is empty")]
    Empty,

    #[error("unrecognized character '{ch}' in rank {rank}")]
    UnknownCharacter { ch: char, rank: usize },

    #[error("rank {rank} runs past 8 columns")]
    RankOverflow { rank: usize },

    #[error("rank {rank} covers {columns} columns instead of 8")]
    RankUnderflow { rank: usize, columns: usize },

    #[error("descriptor has {0} ranks, at most 8 allowed")]
    TooManyRanks(usize),

    #[error("descriptor has {0} ranks, 8 required")]
    TooFewRanks(usize),

    /// Each side needs exactly one king.
    #[error("expected one king per side, found {white} white and {black} black")]
    KingCount { white: usize, black: usize },
}

/// Crate-wide error for input parsing and configuration loading.
#[derive(Debug, Error)]
pub enum RacingChessError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("invalid move notation: {0}")]
    InvalidMoveNotation(String),

    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}
