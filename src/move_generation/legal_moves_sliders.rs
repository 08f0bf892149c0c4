//! Knight jumps and the sliding pieces (bishop, rook, queen).

use crate::game_state::chess_types::*;
use crate::game_state::piece_store::PieceStore;
use crate::move_generation::move_validator::is_path_clear;

#[inline]
pub fn is_legal_knight_move(knight: &Piece, target: Position) -> bool {
    let (d_row, d_col) = knight.position.delta_to(target);
    matches!((d_row.abs(), d_col.abs()), (2, 1) | (1, 2))
}

pub fn is_legal_bishop_move(board: &PieceStore, piece: &Piece, target: Position) -> bool {
    let (d_row, d_col) = piece.position.delta_to(target);
    d_row.abs() == d_col.abs() && is_path_clear(board, piece.position, target)
}

pub fn is_legal_rook_move(board: &PieceStore, piece: &Piece, target: Position) -> bool {
    let (d_row, d_col) = piece.position.delta_to(target);
    (d_row == 0) != (d_col == 0) && is_path_clear(board, piece.position, target)
}

#[inline]
pub fn is_legal_queen_move(board: &PieceStore, piece: &Piece, target: Position) -> bool {
    is_legal_rook_move(board, piece, target) || is_legal_bishop_move(board, piece, target)
}
