//! Coordinate notation for squares and moves.
//!
//! Squares are written file-then-rank (`e4`), with column 0 as file `a` and
//! row 0 as rank `1`. Moves are two squares back to back (`e2e4`), the form
//! typed at the console front-end.

use crate::errors::RacingChessError;
use crate::game_state::chess_types::Position;

/// Parse `"e4"` into a position.
#[inline]
pub fn algebraic_to_position(square: &str) -> Result<Position, RacingChessError> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(RacingChessError::InvalidSquare(square.to_owned()));
    }

    let (file, rank) = (bytes[0].to_ascii_lowercase(), bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(RacingChessError::InvalidSquare(square.to_owned()));
    }
    Ok(Position::new(rank - b'1', file - b'a'))
}

#[inline]
pub fn position_to_algebraic(position: Position) -> String {
    let file = char::from(b'a' + position.col);
    let rank = char::from(b'1' + position.row);
    format!("{file}{rank}")
}

/// Parse a coordinate move such as `"e2e4"` or `"e2-e4"` into its squares.
pub fn parse_coordinate_move(text: &str) -> Result<(Position, Position), RacingChessError> {
    let compact: String = text.trim().chars().filter(|&c| c != '-').collect();
    if compact.len() != 4 || !compact.is_ascii() {
        return Err(RacingChessError::InvalidMoveNotation(text.to_owned()));
    }

    let invalid = |_| RacingChessError::InvalidMoveNotation(text.to_owned());
    let from = algebraic_to_position(&compact[..2]).map_err(invalid)?;
    let to = algebraic_to_position(&compact[2..]).map_err(invalid)?;
    Ok((from, to))
}
