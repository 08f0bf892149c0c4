//! Authoritative piece container for one match.
//!
//! `PieceStore` is a flat arena of piece records keyed by id. It knows
//! geometry and identity but no move legality: callers validate first and
//! then use the mutation primitives here. The store is a plain value, so a
//! `clone()` is all a speculative what-if board needs.

use crate::errors::LayoutError;
use crate::game_state::chess_rules::{back_row, pawn_start_row, BACK_RANK};
use crate::game_state::chess_types::*;
use crate::utils::layout_parser::parse_layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceStore {
    // Index `i` holds the piece with id `i + 1`.
    pieces: Vec<Piece>,
    next_id: PieceId,
}

impl Default for PieceStore {
    fn default() -> Self {
        Self {
            pieces: Vec::with_capacity(32),
            next_id: 1,
        }
    }
}

impl PieceStore {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    pub fn new_standard() -> Self {
        let mut store = Self::default();
        store.setup_standard();
        store
    }

    pub fn from_layout(descriptor: &str) -> Result<Self, LayoutError> {
        let mut store = Self::default();
        store.setup_from_layout(descriptor)?;
        Ok(store)
    }

    /// Replace every piece with the canonical opening layout, ids from 1.
    pub fn setup_standard(&mut self) {
        self.clear();

        for color in [Color::White, Color::Black] {
            for col in 0..8u8 {
                self.spawn(PieceKind::Pawn, color, Position::new(pawn_start_row(color), col));
            }
            for (col, kind) in (0u8..).zip(BACK_RANK) {
                self.spawn(kind, color, Position::new(back_row(color), col));
            }
        }
    }

    /// Replace every piece with the layout described by `descriptor`.
    ///
    /// On error the store is left exactly as it was; choosing a fallback is
    /// the caller's business.
    pub fn setup_from_layout(&mut self, descriptor: &str) -> Result<(), LayoutError> {
        let placements = parse_layout(descriptor)?;

        self.clear();
        for (kind, color, position) in placements {
            self.spawn(kind, color, position);
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.pieces.clear();
        self.next_id = 1;
    }

    fn spawn(&mut self, kind: PieceKind, color: Color, position: Position) -> PieceId {
        let id = self.next_id;
        self.next_id += 1;
        self.pieces.push(Piece {
            id,
            kind,
            color,
            position,
            captured: false,
            has_moved: false,
            cooldown_remaining: 0,
        });
        id
    }

    #[inline]
    fn index_of(id: PieceId) -> Option<usize> {
        usize::try_from(id).ok()?.checked_sub(1)
    }

    #[inline]
    fn get_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        let index = Self::index_of(id)?;
        self.pieces.get_mut(index)
    }

    /// The non-captured piece standing on `position`, if any.
    #[inline]
    pub fn piece_at(&self, position: Position) -> Option<&Piece> {
        self.pieces
            .iter()
            .find(|p| !p.captured && p.position == position)
    }

    #[inline]
    pub fn is_occupied(&self, position: Position) -> bool {
        self.piece_at(position).is_some()
    }

    /// Lookup by id, captured pieces included.
    #[inline]
    pub fn piece_by_id(&self, id: PieceId) -> Option<&Piece> {
        let index = Self::index_of(id)?;
        self.pieces.get(index)
    }

    /// Relocate a live piece, capturing an enemy on `to` along the way.
    ///
    /// A same-colour occupant of `to` is not checked here; that is the
    /// validator's job.
    pub fn move_piece(&mut self, id: PieceId, to: Position) -> bool {
        let Some(mover) = self.piece_by_id(id).copied() else {
            return false;
        };
        if mover.captured {
            return false;
        }

        if let Some(victim) = self
            .pieces
            .iter_mut()
            .find(|p| !p.captured && p.position == to && p.color != mover.color)
        {
            victim.captured = true;
        }

        let Some(piece) = self.get_mut(id) else {
            return false;
        };
        piece.position = to;
        piece.has_moved = true;
        true
    }

    pub fn set_cooldown(&mut self, id: PieceId, ticks: Ticks) -> bool {
        match self.get_mut(id) {
            Some(piece) if !piece.captured => {
                piece.cooldown_remaining = ticks;
                true
            }
            _ => false,
        }
    }

    /// One tick of cooldown decay for every piece, floored at zero.
    pub fn decrement_all_cooldowns(&mut self) {
        for piece in &mut self.pieces {
            piece.cooldown_remaining = piece.cooldown_remaining.saturating_sub(1);
        }
    }

    /// Pieces in id order.
    pub fn all_pieces(&self, include_captured: bool) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces
            .iter()
            .filter(move |p| include_captured || !p.captured)
    }

    /// Pieces of one colour in id order.
    pub fn pieces_of(
        &self,
        color: Color,
        include_captured: bool,
    ) -> impl Iterator<Item = &Piece> + '_ {
        self.all_pieces(include_captured)
            .filter(move |p| p.color == color)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn king_count(&self, color: Color) -> usize {
        self.pieces_of(color, false)
            .filter(|p| p.kind == PieceKind::King)
            .count()
    }

    pub fn king_of(&self, color: Color) -> Option<&Piece> {
        self.pieces_of(color, false)
            .find(|p| p.kind == PieceKind::King)
    }

    /// Reclassify a live pawn.
    pub fn promote(&mut self, id: PieceId, new_kind: PieceKind) -> bool {
        match self.get_mut(id) {
            Some(piece) if !piece.captured && piece.kind == PieceKind::Pawn => {
                piece.kind = new_kind;
                true
            }
            _ => false,
        }
    }
}
