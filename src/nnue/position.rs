//! Read-only board queries the evaluator needs.

use crate::board::{Board, Color, Piece, Square};

/// Position interface consumed by feature extraction, diffs and propagation.
///
/// Implementations must report exactly one king per color.
pub trait NnuePosition {
    fn side_to_move(&self) -> Color;

    fn king_square(&self, color: Color) -> Square;

    fn piece_at(&self, sq: Square) -> Option<(Color, Piece)>;

    /// Call `f` for every piece of `color`, kings included
    fn for_each_piece<F: FnMut(Piece, Square)>(&self, color: Color, f: F);
}

impl NnuePosition for Board {
    #[inline]
    fn side_to_move(&self) -> Color {
        Board::side_to_move(self)
    }

    #[inline]
    fn king_square(&self, color: Color) -> Square {
        Board::king_square(self, color)
    }

    #[inline]
    fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        Board::piece_at(self, sq)
    }

    fn for_each_piece<F: FnMut(Piece, Square)>(&self, color: Color, mut f: F) {
        for piece in Piece::ALL {
            for sq in self.pieces(color, piece).iter() {
                f(piece, sq);
            }
        }
    }
}
