//! Board parsing errors.

use std::fmt;

use super::{Color, Square};

/// Why a FEN string was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// Placement, side, castling and en passant are all required
    MissingFields { found: usize },
    /// More than eight ranks in the placement field
    TooManyRanks { ranks: usize },
    /// A rank describes more than eight squares
    RankOverflow { rank: usize, squares: usize },
    UnknownPiece { symbol: char },
    UnknownCastling { symbol: char },
    BadSideToMove { found: String },
    /// En passant field is neither `-` nor a square
    BadEnPassant { found: String },
    /// En passant square without a pawn that just made a double push
    EnPassantWithoutPawn { square: Square },
    KingCount { color: Color, found: u32 },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::MissingFields { found } => {
                write!(f, "FEN has {found} fields, need at least 4")
            }
            FenError::TooManyRanks { ranks } => {
                write!(f, "FEN placement has {ranks} ranks")
            }
            FenError::RankOverflow { rank, squares } => {
                write!(f, "FEN rank {} covers {squares} squares", 8 - rank)
            }
            FenError::UnknownPiece { symbol } => write!(f, "unknown piece '{symbol}' in FEN"),
            FenError::UnknownCastling { symbol } => {
                write!(f, "unknown castling flag '{symbol}' in FEN")
            }
            FenError::BadSideToMove { found } => {
                write!(f, "side to move is '{found}', not 'w' or 'b'")
            }
            FenError::BadEnPassant { found } => write!(f, "bad en passant field '{found}'"),
            FenError::EnPassantWithoutPawn { square } => {
                write!(f, "en passant square {square} has no pawn in front of it")
            }
            FenError::KingCount { color, found } => {
                write!(f, "{color} has {found} kings, need exactly one")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Why a coordinate move such as `e7e8q` was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    BadLength { len: usize },
    BadSquare { text: String },
    BadPromotion { symbol: char },
    /// Well-formed, but not among the position's legal moves
    NotLegal { text: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::BadLength { len } => {
                write!(f, "coordinate move has {len} characters, need 4 or 5")
            }
            MoveParseError::BadSquare { text } => write!(f, "bad square in move '{text}'"),
            MoveParseError::BadPromotion { symbol } => {
                write!(f, "cannot promote to '{symbol}'")
            }
            MoveParseError::NotLegal { text } => write!(f, "'{text}' is not legal here"),
        }
    }
}

impl std::error::Error for MoveParseError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    OffBoard { rank: usize, file: usize },
    BadNotation { text: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::OffBoard { rank, file } => {
                write!(f, "(rank {rank}, file {file}) is off the board")
            }
            SquareError::BadNotation { text } => write!(f, "'{text}' is not a square"),
        }
    }
}

impl std::error::Error for SquareError {}
