//! Chess board representation and move rules.
//!
//! A bitboard position with legal move generation and make/unmake. The
//! evaluator reads it through [`crate::nnue::NnuePosition`] and the perft
//! verification walk drives it through `generate_moves`, `make_move` and
//! `unmake_move`.
//!
//! # Example
//! ```
//! use halfkp_eval::board::Board;
//!
//! let mut board = Board::new();
//! let moves = board.generate_moves();
//! assert_eq!(moves.len(), 20);
//! ```

mod error;
mod fen;
mod make_unmake;
mod movegen;
mod state;
pub(crate) mod types;

#[cfg(test)]
mod tests;

pub use error::{FenError, MoveParseError, SquareError};
pub use state::{Board, UnmakeInfo};
pub use types::{Bitboard, BitboardIter, CastlingRights, Color, Move, MoveList, Piece, Square};

/// FEN of the standard starting position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
