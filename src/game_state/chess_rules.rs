//! Canonical racing-chess rule constants.
//!
//! Board geometry, the standard opening layout, per-colour home and
//! promotion rows, and the default timing configuration.

use crate::game_state::chess_types::{Color, PieceKind, Ticks};

pub const BOARD_SIZE: u8 = 8;

/// Standard opening layout as a placement descriptor.
pub const STANDARD_LAYOUT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Back-rank order from the a-file to the h-file.
pub const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

pub const QUEENSIDE_ROOK_COL: u8 = 0;
pub const KINGSIDE_ROOK_COL: u8 = 7;

pub const DEFAULT_COOLDOWN_TICKS: Ticks = 10;
pub const DEFAULT_TICK_PERIOD_MS: u64 = 100;

#[inline]
pub const fn back_row(color: Color) -> u8 {
    match color {
        Color::White => 0,
        Color::Black => 7,
    }
}

#[inline]
pub const fn pawn_start_row(color: Color) -> u8 {
    match color {
        Color::White => 1,
        Color::Black => 6,
    }
}

/// Row on which a pawn of `color` is promoted.
#[inline]
pub const fn promotion_row(color: Color) -> u8 {
    match color {
        Color::White => 7,
        Color::Black => 0,
    }
}
