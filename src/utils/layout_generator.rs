//! PieceStore-to-descriptor generator.
//!
//! Produces the placement descriptor of the live (non-captured) pieces.
//! Ids, cooldowns and moved flags are not part of the format.

use crate::game_state::chess_rules::BOARD_SIZE;
use crate::game_state::chess_types::Position;
use crate::game_state::piece_store::PieceStore;

pub fn generate_layout(store: &PieceStore) -> String {
    let mut out = String::new();

    for row in (0..BOARD_SIZE).rev() {
        let mut empty_count = 0u8;

        for col in 0..BOARD_SIZE {
            match store.piece_at(Position::new(row, col)) {
                Some(piece) => {
                    if empty_count > 0 {
                        out.push(char::from(b'0' + empty_count));
                        empty_count = 0;
                    }
                    out.push(piece.letter());
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }
        if row > 0 {
            out.push('/');
        }
    }

    out
}
