//! Stateless legality checks for a single racing-chess move.
//!
//! Standard chess movement geometry plus the cooldown precondition. There is
//! no check detection: kings are captured like any other piece and castling
//! never asks whether a square is attacked.

use std::collections::BTreeSet;

use crate::game_state::chess_types::*;
use crate::game_state::piece_store::PieceStore;
use crate::move_generation::legal_moves_king::is_legal_king_move;
use crate::move_generation::legal_moves_pawn::is_legal_pawn_move;
use crate::move_generation::legal_moves_sliders::{
    is_legal_bishop_move, is_legal_knight_move, is_legal_queen_move, is_legal_rook_move,
};

/// Zero-sized handle over the free functions in this module, owned by the
/// match controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveValidator;

impl MoveValidator {
    #[inline]
    pub fn is_legal(&self, board: &PieceStore, piece_id: PieceId, target: Position) -> bool {
        is_legal(board, piece_id, target)
    }

    #[inline]
    pub fn legal_targets(&self, board: &PieceStore, piece_id: PieceId) -> BTreeSet<Position> {
        legal_targets(board, piece_id)
    }
}

/// Whether `piece_id` may move to `target` right now.
pub fn is_legal(board: &PieceStore, piece_id: PieceId, target: Position) -> bool {
    let Some(piece) = board.piece_by_id(piece_id) else {
        return false;
    };
    if !piece.is_ready() || piece.position == target {
        return false;
    }
    if !is_target_empty_or_enemy(board, piece, target) {
        return false;
    }

    match piece.kind {
        PieceKind::Pawn => is_legal_pawn_move(board, piece, target),
        PieceKind::Knight => is_legal_knight_move(piece, target),
        PieceKind::Bishop => is_legal_bishop_move(board, piece, target),
        PieceKind::Rook => is_legal_rook_move(board, piece, target),
        PieceKind::Queen => is_legal_queen_move(board, piece, target),
        PieceKind::King => is_legal_king_move(board, piece, target),
    }
}

/// Every square `piece_id` may move to, by brute-force scan of the board.
pub fn legal_targets(board: &PieceStore, piece_id: PieceId) -> BTreeSet<Position> {
    match board.piece_by_id(piece_id) {
        Some(piece) if piece.is_ready() => Position::all()
            .filter(|&target| is_legal(board, piece_id, target))
            .collect(),
        _ => BTreeSet::new(),
    }
}

/// Walk the straight or diagonal line strictly between `from` and `to`.
///
/// Only live pieces block. The caller guarantees the two squares share a
/// row, column or diagonal.
pub fn is_path_clear(board: &PieceStore, from: Position, to: Position) -> bool {
    let (d_row, d_col) = from.delta_to(to);
    let (step_row, step_col) = (d_row.signum(), d_col.signum());

    let mut row = i32::from(from.row) + step_row;
    let mut col = i32::from(from.col) + step_col;
    while let Some(current) = Position::checked(row, col) {
        if current == to {
            return true;
        }
        if board.is_occupied(current) {
            return false;
        }
        row += step_row;
        col += step_col;
    }
    false
}

#[inline]
fn is_target_empty_or_enemy(board: &PieceStore, piece: &Piece, target: Position) -> bool {
    board
        .piece_at(target)
        .map_or(true, |occupant| occupant.color != piece.color)
}
