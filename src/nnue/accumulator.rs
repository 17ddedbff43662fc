//! First-layer accumulator for both perspectives.

use super::diff::{DiffEvent, DiffList};
use super::features::{active_features, feature_index};
use super::network::NnueNetwork;
use super::position::NnuePosition;
use super::simd;
use super::HALF_DIMENSIONS;
use crate::board::Color;

/// Position of a perspective's half in the concatenated 512-wide view
#[inline]
const fn half(perspective: Color) -> usize {
    match perspective {
        Color::Black => 0,
        Color::White => 1,
    }
}

/// Feature transformer output for both perspectives, laid out
/// `[black half][white half]`.
///
/// Columns are added and subtracted with wrapping i16 arithmetic, so an
/// incrementally patched accumulator always equals a full rebuild.
#[derive(Clone, PartialEq, Eq)]
pub struct Accumulator {
    values: [[i16; HALF_DIMENSIONS]; 2],
}

impl Default for Accumulator {
    fn default() -> Self {
        Accumulator {
            values: [[0; HALF_DIMENSIONS]; 2],
        }
    }
}

impl std::fmt::Debug for Accumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let black = &self.values[half(Color::Black)][..8];
        let white = &self.values[half(Color::White)][..8];
        f.debug_struct("Accumulator")
            .field("black", &black)
            .field("white", &white)
            .finish_non_exhaustive()
    }
}

impl Accumulator {
    /// Accumulator freshly built for `pos`
    #[must_use]
    pub fn from_position<P: NnuePosition>(pos: &P, network: &NnueNetwork) -> Self {
        let mut acc = Accumulator::default();
        acc.refresh_all(pos, network);
        acc
    }

    #[inline]
    #[must_use]
    pub fn perspective(&self, perspective: Color) -> &[i16; HALF_DIMENSIONS] {
        &self.values[half(perspective)]
    }

    /// All 512 values, black half first
    pub fn iter(&self) -> impl Iterator<Item = &i16> + '_ {
        self.values.iter().flatten()
    }

    /// Rebuild one perspective from scratch: bias plus the column of every
    /// non-king piece.
    pub fn refresh<P: NnuePosition>(
        &mut self,
        perspective: Color,
        pos: &P,
        network: &NnueNetwork,
    ) {
        let values = &mut self.values[half(perspective)];
        *values = network.feature_bias;
        for &index in &active_features(pos, perspective) {
            simd::add_column(values, network.feature_column(index));
        }
    }

    pub fn refresh_all<P: NnuePosition>(&mut self, pos: &P, network: &NnueNetwork) {
        self.refresh(Color::White, pos, network);
        self.refresh(Color::Black, pos, network);
    }

    /// Patch one perspective with a move's diff. `pos` must already reflect
    /// the move (or its undo) because a king move rebuilds from it.
    pub fn apply<P: NnuePosition>(
        &mut self,
        diff: &DiffList,
        perspective: Color,
        pos: &P,
        network: &NnueNetwork,
    ) {
        if diff.is_king_move() {
            self.refresh(perspective, pos, network);
            return;
        }

        let king = pos.king_square(perspective);
        let values = &mut self.values[half(perspective)];
        for event in diff {
            let DiffEvent::Piece(change) = *event else {
                continue;
            };
            let Some(index) =
                feature_index(perspective, king, change.piece, change.color, change.square)
            else {
                continue;
            };
            if change.appears {
                simd::add_column(values, network.feature_column(index));
            } else {
                simd::sub_column(values, network.feature_column(index));
            }
        }
    }

    /// First differing entry as (perspective, index, self, other)
    #[must_use]
    pub fn first_mismatch(&self, other: &Accumulator) -> Option<(Color, usize, i16, i16)> {
        for perspective in [Color::Black, Color::White] {
            let ours = self.perspective(perspective);
            let theirs = other.perspective(perspective);
            if let Some(index) = (0..HALF_DIMENSIONS).find(|&i| ours[i] != theirs[i]) {
                return Some((perspective, index, ours[index], theirs[index]));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::nnue::features::{PS_B_ROOK, PS_END, PS_W_ROOK};

    #[test]
    fn test_empty_position_is_bias() {
        // Only kings: no features, accumulator equals the bias
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        let mut network = NnueNetwork::zeroed();
        network.feature_bias = std::array::from_fn(|i| i as i16 - 100);
        let acc = Accumulator::from_position(&board, &network);
        assert_eq!(acc.perspective(Color::White), &network.feature_bias);
        assert_eq!(acc.perspective(Color::Black), &network.feature_bias);
    }

    #[test]
    fn test_single_piece_column_added() {
        // white king e1 (4), black king e8, white rook a1 (0)
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let mut network = NnueNetwork::zeroed();
        let white_index = PS_W_ROOK + PS_END * 4;
        network.feature_weights[white_index] = [3; HALF_DIMENSIONS];
        // black view: rook a1 -> 63, black king e8 (60) -> 3
        let black_index = 63 + PS_B_ROOK + PS_END * 3;
        network.feature_weights[black_index] = [-5; HALF_DIMENSIONS];

        let acc = Accumulator::from_position(&board, &network);
        assert!(acc.perspective(Color::White).iter().all(|&v| v == 3));
        assert!(acc.perspective(Color::Black).iter().all(|&v| v == -5));
        // black half comes first in the concatenated view
        assert_eq!(acc.iter().next(), Some(&-5));
        assert_eq!(acc.iter().count(), 2 * HALF_DIMENSIONS);
    }

    #[test]
    fn test_debug_shows_leading_values() {
        let mut acc = Accumulator::default();
        acc.values[half(Color::White)][0] = 42;
        let text = format!("{acc:?}");
        assert!(text.starts_with("Accumulator { black: [0, 0"), "{text}");
        assert!(text.contains("white: [42, 0"), "{text}");
    }

    #[test]
    fn test_first_mismatch() {
        let a = Accumulator::default();
        let mut b = Accumulator::default();
        assert_eq!(a.first_mismatch(&b), None);
        b.values[half(Color::White)][17] = 4;
        assert_eq!(a.first_mismatch(&b), Some((Color::White, 17, 0, 4)));
    }
}
