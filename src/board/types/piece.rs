//! Piece kinds and side colors.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lowercase FEN letters, indexed by [`Piece::index`]
const SYMBOLS: [char; 6] = ['p', 'n', 'b', 'r', 'q', 'k'];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    /// Every kind, ordered by [`Piece::index`]
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Slot of this kind in per-piece bitboard arrays
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Kind named by a FEN letter of either case
    #[must_use]
    pub fn from_symbol(c: char) -> Option<Piece> {
        let lower = c.to_ascii_lowercase();
        SYMBOLS
            .iter()
            .position(|&s| s == lower)
            .map(|i| Piece::ALL[i])
    }

    /// Lowercase FEN letter, also used for promotion suffixes
    #[inline]
    #[must_use]
    pub const fn symbol(self) -> char {
        SYMBOLS[self.index()]
    }

    /// FEN letter, uppercase for White
    #[must_use]
    pub fn fen_symbol(self, color: Color) -> char {
        match color {
            Color::White => self.symbol().to_ascii_uppercase(),
            Color::Black => self.symbol(),
        }
    }
}

/// Promotion choices, strongest first
pub(crate) const PROMOTION_PIECES: [Piece; 4] =
    [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// White, then Black
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Color {
        Color::BOTH[self.index() ^ 1]
    }

    /// Board rank of `rank` counted from this side's edge
    #[inline]
    #[must_use]
    pub(crate) const fn relative_rank(self, rank: usize) -> usize {
        rank ^ (self.index() * 7)
    }

    #[inline]
    #[must_use]
    pub(crate) const fn back_rank(self) -> usize {
        self.relative_rank(0)
    }

    #[inline]
    #[must_use]
    pub(crate) const fn pawn_start_rank(self) -> usize {
        self.relative_rank(1)
    }

    #[inline]
    #[must_use]
    pub(crate) const fn pawn_promotion_rank(self) -> usize {
        self.relative_rank(7)
    }

    /// Rank step of a pawn push
    #[inline]
    #[must_use]
    pub(crate) const fn pawn_direction(self) -> isize {
        1 - 2 * self.index() as isize
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "White",
            Color::Black => "Black",
        })
    }
}
