//! Core chess types.
//!
//! - `Piece` and `Color` - piece types and colors
//! - `Square` - (rank, file) board square
//! - `Bitboard` - 64-bit occupancy set
//! - `Move` and `MoveList` - packed moves
//! - `CastlingRights` - castling state

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::CastlingRights;
pub use moves::{Move, MoveList};
pub use piece::{Color, Piece};
pub use square::Square;

pub(crate) use piece::PROMOTION_PIECES;
