//! Terminal-oriented Unicode board renderer.
//!
//! Draws the live pieces with White at the bottom. A piece that is still on
//! cooldown is followed by `*` instead of a space so the console shows which
//! pieces can move right now.

use crate::game_state::chess_types::*;
use crate::game_state::piece_store::PieceStore;

pub fn render_board(board: &PieceStore) -> String {
    let mut out = String::new();

    out.push_str("  a b c d e f g h\n");

    for row in (0..8u8).rev() {
        let rank = char::from(b'1' + row);
        out.push(rank);
        out.push(' ');

        for col in 0..8u8 {
            match board.piece_at(Position::new(row, col)) {
                Some(piece) => {
                    out.push(piece_to_unicode(piece.color, piece.kind));
                    out.push(if piece.is_ready() { ' ' } else { '*' });
                }
                None => out.push_str("· "),
            }
        }

        out.push(rank);
        out.push('\n');
    }

    out.push_str("  a b c d e f g h");

    out
}

fn piece_to_unicode(color: Color, kind: PieceKind) -> char {
    match (color, kind) {
        (Color::White, PieceKind::Pawn) => '♙',
        (Color::White, PieceKind::Knight) => '♘',
        (Color::White, PieceKind::Bishop) => '♗',
        (Color::White, PieceKind::Rook) => '♖',
        (Color::White, PieceKind::Queen) => '♕',
        (Color::White, PieceKind::King) => '♔',
        (Color::Black, PieceKind::Pawn) => '♟',
        (Color::Black, PieceKind::Knight) => '♞',
        (Color::Black, PieceKind::Bishop) => '♝',
        (Color::Black, PieceKind::Rook) => '♜',
        (Color::Black, PieceKind::Queen) => '♛',
        (Color::Black, PieceKind::King) => '♚',
    }
}
