//! King steps and castling.
//!
//! Castling only needs an unmoved king, an unmoved same-colour rook in the
//! corner of the king's row and empty squares between them. Attacked squares
//! are not considered.

use crate::game_state::chess_rules::{KINGSIDE_ROOK_COL, QUEENSIDE_ROOK_COL};
use crate::game_state::chess_types::*;
use crate::game_state::piece_store::PieceStore;

pub fn is_legal_king_move(board: &PieceStore, king: &Piece, target: Position) -> bool {
    let (d_row, d_col) = king.position.delta_to(target);
    if d_row.abs() <= 1 && d_col.abs() <= 1 {
        return true;
    }
    castling_rook(board, king, target).is_some()
}

/// Geometric shape of a castling attempt: unmoved king, two columns sideways.
#[inline]
pub fn is_castling_attempt(king: &Piece, target: Position) -> bool {
    let (d_row, d_col) = king.position.delta_to(target);
    king.kind == PieceKind::King && !king.has_moved && d_row == 0 && d_col.abs() == 2
}

/// The rook that castles with `king` onto `target`, when castling is allowed.
pub fn castling_rook<'a>(board: &'a PieceStore, king: &Piece, target: Position) -> Option<&'a Piece> {
    if !is_castling_attempt(king, target) {
        return None;
    }

    let kingside = target.col > king.position.col;
    let rook_col = if kingside {
        KINGSIDE_ROOK_COL
    } else {
        QUEENSIDE_ROOK_COL
    };
    let rook = board.piece_at(Position::new(king.position.row, rook_col))?;
    if rook.kind != PieceKind::Rook || rook.color != king.color || rook.has_moved {
        return None;
    }

    let (low, high) = if kingside {
        (king.position.col + 1, rook_col)
    } else {
        (rook_col + 1, king.position.col)
    };
    let blocked = (low..high).any(|col| board.is_occupied(Position::new(king.position.row, col)));
    (!blocked).then_some(rook)
}

/// Square the castling rook lands on: next to the king's origin, toward the rook.
#[inline]
pub fn castling_rook_target(king_from: Position, king_to: Position) -> Position {
    let col = if king_to.col > king_from.col {
        king_from.col + 1
    } else {
        king_from.col - 1
    };
    Position::new(king_from.row, col)
}
