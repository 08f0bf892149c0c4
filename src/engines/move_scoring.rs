//! Heuristic terms used by the evaluator to rank candidate moves.
//!
//! Every term looks at one candidate (piece, destination) in isolation. The
//! capture term reads the live board; all others play the move on a private
//! copy of the board and query the validator there. The copy only relocates
//! the piece (no castling rook, no promotion).

use crate::game_state::chess_rules::promotion_row;
use crate::game_state::chess_types::*;
use crate::game_state::piece_store::PieceStore;
use crate::move_generation::move_validator::legal_targets;

pub const CAPTURE_WEIGHT: f64 = 8.0;
pub const PRESSURE_WEIGHT: f64 = 1.5;
pub const VULNERABILITY_WEIGHT: f64 = -1.8;
pub const PROTECTION_WEIGHT: f64 = 1.2;
pub const KING_EXPOSURE_WEIGHT: f64 = -1.8;

pub const CASTLING_BONUS: f64 = 3.0;
pub const PROMOTION_BONUS: f64 = 9.0;
/// Flat amount, independent of the king's material value.
pub const KING_EXPOSURE_PENALTY: f64 = 100.0;

/// Material value of a piece that can be taken.
#[inline]
pub const fn capture_value(kind: PieceKind) -> f64 {
    match kind {
        PieceKind::Pawn => 1.0,
        PieceKind::Knight => 3.0,
        PieceKind::Bishop => 3.2,
        PieceKind::Rook => 5.0,
        PieceKind::Queen => 9.0,
        PieceKind::King => 100.0,
    }
}

/// Value of an enemy piece put under attack. Same as `capture_value` except
/// for the king.
#[inline]
pub const fn pressure_value(kind: PieceKind) -> f64 {
    match kind {
        PieceKind::King => 12.0,
        other => capture_value(other),
    }
}

/// Bonus for covering a friendly piece.
#[inline]
pub const fn friendly_value(kind: PieceKind) -> f64 {
    match kind {
        PieceKind::Pawn => 0.5,
        PieceKind::Knight | PieceKind::Bishop => 1.5,
        PieceKind::Rook => 2.5,
        PieceKind::Queen => 4.5,
        PieceKind::King => 5.0,
    }
}

/// Weighted contribution of each term for one candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub advancement: f64,
    pub centralization: f64,
    pub capture: f64,
    pub pressure: f64,
    pub vulnerability: f64,
    pub protection: f64,
    pub castling: f64,
    pub promotion: f64,
    pub king_exposure: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.advancement
            + self.centralization
            + self.capture
            + self.pressure
            + self.vulnerability
            + self.protection
            + self.castling
            + self.promotion
            + self.king_exposure
    }
}

#[inline]
pub fn score_move(board: &PieceStore, piece: &Piece, target: Position) -> f64 {
    score_breakdown(board, piece, target).total()
}

pub fn score_breakdown(board: &PieceStore, piece: &Piece, target: Position) -> ScoreBreakdown {
    let mut after = board.clone();
    after.move_piece(piece.id, target);

    ScoreBreakdown {
        advancement: advancement(piece, target),
        centralization: centralization(piece, target),
        capture: capture(board, target) * CAPTURE_WEIGHT,
        pressure: pressure(&after, piece) * PRESSURE_WEIGHT,
        vulnerability: vulnerability(&after, piece, target) * VULNERABILITY_WEIGHT,
        protection: protection(&after, piece) * PROTECTION_WEIGHT,
        castling: if is_castling_shape(piece, target) {
            CASTLING_BONUS
        } else {
            0.0
        },
        promotion: if piece.kind == PieceKind::Pawn && target.row == promotion_row(piece.color) {
            PROMOTION_BONUS
        } else {
            0.0
        },
        king_exposure: king_exposure(&after, piece) * KING_EXPOSURE_WEIGHT,
    }
}

/// Pawn progress toward promotion, plus a bonus growing near the last row.
pub fn advancement(piece: &Piece, target: Position) -> f64 {
    if piece.kind != PieceKind::Pawn {
        return 0.0;
    }
    let progress = (i32::from(target.row) - i32::from(piece.position.row)) * piece.color.forward();
    let distance_to_promotion =
        (i32::from(promotion_row(piece.color)) - i32::from(target.row)).abs();
    f64::from(progress) * 0.1 + f64::from(7 - distance_to_promotion) * 0.05
}

/// Knights and bishops prefer squares near the middle of the board.
pub fn centralization(piece: &Piece, target: Position) -> f64 {
    if !matches!(piece.kind, PieceKind::Knight | PieceKind::Bishop) {
        return 0.0;
    }
    let col_off = (3.5 - f64::from(target.col)).abs();
    let row_off = (3.5 - f64::from(target.row)).abs();
    0.1 * (4.0 - col_off) + 0.1 * (4.0 - row_off)
}

/// Value of whatever stands on `target` in the live board.
pub fn capture(board: &PieceStore, target: Position) -> f64 {
    board
        .piece_at(target)
        .map_or(0.0, |victim| capture_value(victim.kind))
}

/// Enemy material the moved piece attacks from its new square.
pub fn pressure(after: &PieceStore, piece: &Piece) -> f64 {
    legal_targets(after, piece.id)
        .into_iter()
        .filter_map(|square| after.piece_at(square))
        .filter(|other| other.color != piece.color)
        .map(|enemy| pressure_value(enemy.kind))
        .sum()
}

/// The moved piece's own value when a ready enemy can reach its new square.
pub fn vulnerability(after: &PieceStore, piece: &Piece, target: Position) -> f64 {
    if square_reachable_by(after, piece.color.opposite(), target) {
        capture_value(piece.kind)
    } else {
        0.0
    }
}

/// Friendly pieces standing next to any square the moved piece now reaches,
/// each counted once.
pub fn protection(after: &PieceStore, piece: &Piece) -> f64 {
    let reach = legal_targets(after, piece.id);
    after
        .pieces_of(piece.color, false)
        .filter(|friend| friend.id != piece.id)
        .filter(|friend| {
            reach.iter().any(|&square| {
                let (d_row, d_col) = square.delta_to(friend.position);
                d_row.abs() <= 1 && d_col.abs() <= 1
            })
        })
        .map(|friend| friendly_value(friend.kind))
        .sum()
}

/// Flat penalty when a non-king move leaves the own king reachable by a
/// ready enemy.
pub fn king_exposure(after: &PieceStore, piece: &Piece) -> f64 {
    if piece.kind == PieceKind::King {
        return 0.0;
    }
    let Some(king) = after.king_of(piece.color) else {
        return 0.0;
    };
    if square_reachable_by(after, piece.color.opposite(), king.position) {
        KING_EXPOSURE_PENALTY
    } else {
        0.0
    }
}

fn square_reachable_by(board: &PieceStore, attacker: Color, square: Position) -> bool {
    board
        .pieces_of(attacker, false)
        .filter(|enemy| enemy.is_ready())
        .any(|enemy| legal_targets(board, enemy.id).contains(&square))
}

#[inline]
fn is_castling_shape(piece: &Piece, target: Position) -> bool {
    let (_, d_col) = piece.position.delta_to(target);
    piece.kind == PieceKind::King && d_col.abs() == 2
}
