//! Pawn movement: single push, double push from the home row, diagonal
//! capture. No en passant.

use crate::game_state::chess_rules::pawn_start_row;
use crate::game_state::chess_types::*;
use crate::game_state::piece_store::PieceStore;

pub fn is_legal_pawn_move(board: &PieceStore, pawn: &Piece, target: Position) -> bool {
    let forward = pawn.color.forward();
    let (d_row, d_col) = pawn.position.delta_to(target);

    if d_col == 0 && d_row == forward {
        return !board.is_occupied(target);
    }

    if d_col == 0 && d_row == 2 * forward {
        if pawn.has_moved || pawn.position.row != pawn_start_row(pawn.color) {
            return false;
        }
        let Some(intermediate) =
            Position::checked(i32::from(pawn.position.row) + forward, i32::from(pawn.position.col))
        else {
            return false;
        };
        return !board.is_occupied(intermediate) && !board.is_occupied(target);
    }

    if d_col.abs() == 1 && d_row == forward {
        return board
            .piece_at(target)
            .is_some_and(|occupant| occupant.color != pawn.color);
    }

    false
}
