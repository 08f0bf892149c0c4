//! Core value types shared by every racing-chess subsystem.
//!
//! Positions, colours, piece kinds, piece records, move proposals, match
//! states and AI difficulty levels. Everything here is a plain `Copy` or
//! cheaply cloneable value so boards can be duplicated freely for
//! speculative evaluation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game_state::chess_rules::BOARD_SIZE;

/// Piece identity. Assigned sequentially from 1 at setup and never reused
/// within a match.
pub type PieceId = u32;

/// Cooldown length in ticks.
pub type Ticks = u32;

/// Board square, `row` 0 is White's back rank and `col` 0 is the a-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Build a position. Both coordinates must be in `0..8`.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < BOARD_SIZE && col < BOARD_SIZE);
        Self { row, col }
    }

    /// Build a position from signed coordinates, `None` when off the board.
    #[inline]
    pub fn checked(row: i32, col: i32) -> Option<Self> {
        let size = i32::from(BOARD_SIZE);
        if (0..size).contains(&row) && (0..size).contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Signed `(row, col)` displacement from `self` to `other`.
    #[inline]
    pub fn delta_to(self, other: Position) -> (i32, i32) {
        (
            i32::from(other.row) - i32::from(self.row),
            i32::from(other.col) - i32::from(self.col),
        )
    }

    /// All 64 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Position { row, col }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            char::from(b'a' + self.col),
            char::from(b'1' + self.row)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a forward pawn step.
    #[inline]
    pub const fn forward(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("White"),
            Color::Black => f.write_str("Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Lowercase descriptor letter.
    #[inline]
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    #[inline]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// One piece record. Capture is a soft delete: the record stays in the store
/// with `captured` set so ids held by callers remain meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub color: Color,
    pub position: Position,
    pub captured: bool,
    pub has_moved: bool,
    pub cooldown_remaining: Ticks,
}

impl Piece {
    /// Not captured and not cooling down.
    #[inline]
    pub fn is_ready(&self) -> bool {
        !self.captured && self.cooldown_remaining == 0
    }

    /// Descriptor letter, uppercase for White.
    #[inline]
    pub fn letter(&self) -> char {
        let lower = self.kind.letter();
        match self.color {
            Color::White => lower.to_ascii_uppercase(),
            Color::Black => lower,
        }
    }
}

/// A move proposal. The timestamp is opaque to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub piece_id: PieceId,
    pub from: Position,
    pub to: Position,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchState {
    NotStarted,
    AwaitingSettings,
    Active,
    Paused,
    WhiteWon,
    BlackWon,
}

impl MatchState {
    #[inline]
    pub const fn is_finished(self) -> bool {
        matches!(self, MatchState::WhiteWon | MatchState::BlackWon)
    }

    /// Terminal state reached when `loser` has no king left.
    #[inline]
    pub const fn won_against(loser: Color) -> Self {
        match loser {
            Color::White => MatchState::BlackWon,
            Color::Black => MatchState::WhiteWon,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiDifficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl AiDifficulty {
    /// Number of top-scoring candidates the evaluator picks among.
    #[inline]
    pub const fn breadth(self) -> usize {
        match self {
            AiDifficulty::Easy => 5,
            AiDifficulty::Medium => 3,
            AiDifficulty::Hard => 2,
            AiDifficulty::Expert => 1,
        }
    }
}
