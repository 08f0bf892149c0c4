//! Placement-descriptor parser.
//!
//! A descriptor is the board field of a FEN string: eight `/`-separated
//! ranks from row 7 down to row 0, each a run of piece letters (`PNBRQK`
//! white, `pnbrqk` black) and digits `1..=8` for empty columns. Anything
//! after the first whitespace is ignored, so full FEN strings are accepted.

use crate::errors::LayoutError;
use crate::game_state::chess_rules::BOARD_SIZE;
use crate::game_state::chess_types::{Color, PieceKind, Position};

/// One piece to place: kind, colour, square.
pub type Placement = (PieceKind, Color, Position);

/// Parse `descriptor` into placements ordered top rank first, a-file first.
pub fn parse_layout(descriptor: &str) -> Result<Vec<Placement>, LayoutError> {
    let board_part = descriptor
        .split_whitespace()
        .next()
        .ok_or(LayoutError::Empty)?;

    let ranks: Vec<&str> = board_part.split('/').collect();
    let size = usize::from(BOARD_SIZE);
    if ranks.len() > size {
        return Err(LayoutError::TooManyRanks(ranks.len()));
    }
    if ranks.len() < size {
        return Err(LayoutError::TooFewRanks(ranks.len()));
    }

    let mut placements = Vec::with_capacity(32);
    for (rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = rank_idx + 1;
        let row = BOARD_SIZE - 1 - rank_idx as u8;
        let mut col = 0usize;

        for ch in rank_str.chars() {
            if let Some(run) = ch.to_digit(10) {
                if !(1..=8).contains(&run) {
                    return Err(LayoutError::UnknownCharacter { ch, rank });
                }
                col += run as usize;
                if col > size {
                    return Err(LayoutError::RankOverflow { rank });
                }
                continue;
            }

            let (kind, color) =
                piece_from_letter(ch).ok_or(LayoutError::UnknownCharacter { ch, rank })?;
            if col >= size {
                return Err(LayoutError::RankOverflow { rank });
            }
            placements.push((kind, color, Position::new(row, col as u8)));
            col += 1;
        }

        if col != size {
            return Err(LayoutError::RankUnderflow { rank, columns: col });
        }
    }

    let kings = |color: Color| {
        placements
            .iter()
            .filter(|(kind, c, _)| *kind == PieceKind::King && *c == color)
            .count()
    };
    let (white, black) = (kings(Color::White), kings(Color::Black));
    if white != 1 || black != 1 {
        return Err(LayoutError::KingCount { white, black });
    }

    Ok(placements)
}

/// Check a descriptor without building a board.
pub fn validate_layout(descriptor: &str) -> Result<(), LayoutError> {
    parse_layout(descriptor).map(|_| ())
}

fn piece_from_letter(ch: char) -> Option<(PieceKind, Color)> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };
    Some((PieceKind::from_letter(ch)?, color))
}
