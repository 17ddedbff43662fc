//! Per-move feature changes.
//!
//! A [`DiffList`] is built from the position *before* a move is made and
//! consumed after it, once per perspective. Undo replays the same events
//! with `appears` flipped.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::position::NnuePosition;
use crate::board::{Color, Move, Piece, Square};

/// Upper bound on events per move: remove, add, capture
pub const MAX_DIFF_EVENTS: usize = 4;

/// One piece appearing on or leaving an absolute square
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PieceChange {
    pub piece: Piece,
    pub color: Color,
    pub square: Square,
    pub appears: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DiffEvent {
    /// A king moved; every feature of that side's perspective changes
    KingMoved,
    Piece(PieceChange),
}

impl DiffEvent {
    #[inline]
    #[must_use]
    pub fn inverted(self) -> Self {
        match self {
            DiffEvent::KingMoved => DiffEvent::KingMoved,
            DiffEvent::Piece(change) => DiffEvent::Piece(PieceChange {
                appears: !change.appears,
                ..change
            }),
        }
    }
}

/// Ordered feature changes for a single move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiffList {
    events: [DiffEvent; MAX_DIFF_EVENTS],
    len: usize,
}

impl DiffList {
    #[must_use]
    pub const fn new() -> Self {
        DiffList {
            events: [DiffEvent::KingMoved; MAX_DIFF_EVENTS],
            len: 0,
        }
    }

    #[must_use]
    pub const fn king_moved() -> Self {
        DiffList {
            events: [DiffEvent::KingMoved; MAX_DIFF_EVENTS],
            len: 1,
        }
    }

    fn push(&mut self, piece: Piece, color: Color, square: Square, appears: bool) {
        debug_assert!(self.len < MAX_DIFF_EVENTS);
        self.events[self.len] = DiffEvent::Piece(PieceChange {
            piece,
            color,
            square,
            appears,
        });
        self.len += 1;
    }

    /// Feature changes `mv` will cause, read from the position before the
    /// move is made. An empty origin square (null move) yields an empty list.
    #[must_use]
    pub fn prepare<P: NnuePosition>(mv: Move, pos: &P) -> Self {
        let mover = pos.side_to_move();
        let from = mv.from();
        let to = mv.to();
        let Some((_, piece)) = pos.piece_at(from) else {
            return DiffList::new();
        };

        if piece == Piece::King {
            return DiffList::king_moved();
        }

        let mut list = DiffList::new();
        list.push(piece, mover, from, false);
        list.push(mv.promotion_piece().unwrap_or(piece), mover, to, true);

        if mv.is_en_passant() {
            // The captured pawn stands beside the mover, on the origin rank
            list.push(Piece::Pawn, mover.opponent(), Square(from.0, to.1), false);
        } else if let Some((color, captured)) = pos.piece_at(to) {
            list.push(captured, color, to, false);
        }
        list
    }

    /// The same events with `appears` flipped, in the same order
    #[must_use]
    pub fn inverted(&self) -> Self {
        let mut list = *self;
        for event in &mut list.events[..list.len] {
            *event = event.inverted();
        }
        list
    }

    #[inline]
    #[must_use]
    pub fn is_king_move(&self) -> bool {
        self.len > 0 && self.events[0] == DiffEvent::KingMoved
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[DiffEvent] {
        &self.events[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiffEvent> {
        self.as_slice().iter()
    }
}

impl Default for DiffList {
    fn default() -> Self {
        DiffList::new()
    }
}

impl<'a> IntoIterator for &'a DiffList {
    type Item = &'a DiffEvent;
    type IntoIter = std::slice::Iter<'a, DiffEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}
