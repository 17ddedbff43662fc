//! HalfKP feature indexing.
//!
//! A feature is a non-king piece on a square, seen from one perspective and
//! tied to that perspective's king square. Squares are flipped for the black
//! perspective (`sq ^ 63`) so both halves share one weight table.

use super::position::NnuePosition;
use super::HALFKP_INPUTS;
use crate::board::{Color, Piece, Square};

pub const PS_W_PAWN: usize = 1;
pub const PS_B_PAWN: usize = 65;
pub const PS_W_KNIGHT: usize = 129;
pub const PS_B_KNIGHT: usize = 193;
pub const PS_W_BISHOP: usize = 257;
pub const PS_B_BISHOP: usize = 321;
pub const PS_W_ROOK: usize = 385;
pub const PS_B_ROOK: usize = 449;
pub const PS_W_QUEEN: usize = 513;
pub const PS_B_QUEEN: usize = 577;
pub const PS_END: usize = 641;

/// Most non-king pieces a board can hold
pub const MAX_ACTIVE_FEATURES: usize = 62;

const _: () = assert!(PS_END * 64 == HALFKP_INPUTS);

/// Square index as seen from `perspective`
#[inline]
#[must_use]
pub const fn orient(perspective: Color, sq: Square) -> usize {
    match perspective {
        Color::White => sq.as_index(),
        Color::Black => sq.as_index() ^ 63,
    }
}

/// Bucket base offset of a piece, `None` for kings.
///
/// "W" buckets hold pieces of the perspective's own color, "B" buckets the
/// opponent's.
#[inline]
#[must_use]
pub const fn piece_bucket(perspective: Color, piece: Piece, color: Color) -> Option<usize> {
    let (own, theirs) = match piece {
        Piece::Pawn => (PS_W_PAWN, PS_B_PAWN),
        Piece::Knight => (PS_W_KNIGHT, PS_B_KNIGHT),
        Piece::Bishop => (PS_W_BISHOP, PS_B_BISHOP),
        Piece::Rook => (PS_W_ROOK, PS_B_ROOK),
        Piece::Queen => (PS_W_QUEEN, PS_B_QUEEN),
        Piece::King => return None,
    };
    if perspective.index() == color.index() {
        Some(own)
    } else {
        Some(theirs)
    }
}

/// Feature index of `piece` of `color` on `sq`, given the perspective's own
/// king square. `None` for kings.
#[inline]
#[must_use]
pub const fn feature_index(
    perspective: Color,
    king_sq: Square,
    piece: Piece,
    color: Color,
    sq: Square,
) -> Option<usize> {
    match piece_bucket(perspective, piece, color) {
        Some(bucket) => {
            Some(orient(perspective, sq) + bucket + PS_END * orient(perspective, king_sq))
        }
        None => None,
    }
}

/// Fixed-capacity list of active feature indices for one perspective
#[derive(Clone, Debug)]
pub struct FeatureList {
    indices: [usize; MAX_ACTIVE_FEATURES],
    len: usize,
}

impl FeatureList {
    #[must_use]
    pub fn new() -> Self {
        FeatureList {
            indices: [0; MAX_ACTIVE_FEATURES],
            len: 0,
        }
    }

    fn push(&mut self, index: usize) {
        debug_assert!(self.len < MAX_ACTIVE_FEATURES, "too many pieces on the board");
        if self.len < MAX_ACTIVE_FEATURES {
            self.indices[self.len] = index;
            self.len += 1;
        }
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
    pub fn as_slice(&self) -> &[usize] {
        &self.indices[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.as_slice().iter()
    }
}

impl Default for FeatureList {
    fn default() -> Self {
        FeatureList::new()
    }
}

impl<'a> IntoIterator for &'a FeatureList {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

/// Active features of every non-king piece of both colors from `perspective`
#[must_use]
pub fn active_features<P: NnuePosition>(pos: &P, perspective: Color) -> FeatureList {
    let mut list = FeatureList::new();
    let king = pos.king_square(perspective);
    for color in Color::BOTH {
        pos.for_each_piece(color, |piece, sq| {
            if let Some(index) = feature_index(perspective, king, piece, color, sq) {
                list.push(index);
            }
        });
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn test_orient_flips_for_black() {
        assert_eq!(orient(Color::White, Square(0, 0)), 0);
        assert_eq!(orient(Color::Black, Square(0, 0)), 63);
        assert_eq!(orient(Color::Black, Square(7, 4)), 3);
        assert_eq!(orient(Color::White, Square(7, 4)), 60);
    }

    #[test]
    fn test_bucket_relative_to_perspective() {
        let bucket = |perspective, piece, color| piece_bucket(perspective, piece, color);
        assert_eq!(bucket(Color::White, Piece::Pawn, Color::White), Some(PS_W_PAWN));
        assert_eq!(bucket(Color::Black, Piece::Pawn, Color::White), Some(PS_B_PAWN));
        assert_eq!(bucket(Color::Black, Piece::Queen, Color::Black), Some(PS_W_QUEEN));
        assert_eq!(bucket(Color::White, Piece::Rook, Color::Black), Some(PS_B_ROOK));
        assert_eq!(bucket(Color::White, Piece::King, Color::White), None);
    }

    #[test]
    fn test_white_pawn_e2_white_king_e1() {
        // e2 = 12, e1 = 4
        let index = feature_index(
            Color::White,
            Square(0, 4),
            Piece::Pawn,
            Color::White,
            Square(1, 4),
        );
        assert_eq!(index, Some(12 + PS_W_PAWN + PS_END * 4));
    }

    #[test]
    fn test_black_perspective_mirrors_white() {
        // black knight g8 / king e8 from black == white knight b1 / king d1 from white
        let black = feature_index(
            Color::Black,
            Square(7, 4),
            Piece::Knight,
            Color::Black,
            Square(7, 6),
        );
        let white = feature_index(
            Color::White,
            Square(0, 3),
            Piece::Knight,
            Color::White,
            Square(0, 1),
        );
        assert_eq!(black, white);
        assert_eq!(black, Some(1 + PS_W_KNIGHT + PS_END * 3));
    }

    #[test]
    fn test_index_bounds() {
        let max = feature_index(
            Color::White,
            Square(7, 7),
            Piece::Queen,
            Color::Black,
            Square(7, 7),
        );
        assert_eq!(max, Some(HALFKP_INPUTS - 1));
        let king = feature_index(
            Color::Black,
            Square(7, 4),
            Piece::King,
            Color::White,
            Square(0, 4),
        );
        assert_eq!(king, None);
    }

    #[test]
    fn test_active_features_start_position() {
        let board = Board::new();
        for perspective in Color::BOTH {
            let features = active_features(&board, perspective);
            assert_eq!(features.len(), 30);

            let king = orient(perspective, board.king_square(perspective));
            assert!(features.iter().all(|&i| i / PS_END == king));

            let own_pawns = features
                .iter()
                .filter(|&&i| (PS_W_PAWN..PS_B_PAWN).contains(&(i % PS_END)))
                .count();
            assert_eq!(own_pawns, 8);
        }
    }
}
