use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::{Board, Color, Move, Piece, Square};

impl Board {
    /// Parse a board position from FEN notation.
    ///
    /// Returns an error if the FEN string is invalid or a side does not
    /// have exactly one king.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let mut board = Board::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 4 {
            return Err(FenError::MissingFields { found: parts.len() });
        }

        for (rank_idx, rank_str) in parts[0].split('/').enumerate() {
            if rank_idx >= 8 {
                return Err(FenError::TooManyRanks {
                    ranks: rank_idx + 1,
                });
            }
            let mut file = 0;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                    continue;
                }
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let piece = Piece::from_symbol(c).ok_or(FenError::UnknownPiece { symbol: c })?;
                if file >= 8 {
                    return Err(FenError::RankOverflow {
                        rank: rank_idx,
                        squares: file + 1,
                    });
                }
                board.set_piece(Square(7 - rank_idx, file), color, piece);
                file += 1;
            }
            if file > 8 {
                return Err(FenError::RankOverflow {
                    rank: rank_idx,
                    squares: file,
                });
            }
        }

        match parts[1] {
            "w" => board.white_to_move = true,
            "b" => board.white_to_move = false,
            other => {
                return Err(FenError::BadSideToMove {
                    found: other.to_string(),
                })
            }
        }

        for c in parts[2].chars() {
            match c {
                'K' => board.castling_rights.set(Color::White, true),
                'Q' => board.castling_rights.set(Color::White, false),
                'k' => board.castling_rights.set(Color::Black, true),
                'q' => board.castling_rights.set(Color::Black, false),
                '-' => {}
                _ => return Err(FenError::UnknownCastling { symbol: c }),
            }
        }

        board.en_passant_target = if parts[3] == "-" {
            None
        } else {
            Some(
                parts[3]
                    .parse::<Square>()
                    .map_err(|_| FenError::BadEnPassant {
                        found: parts[3].to_string(),
                    })?,
            )
        };

        if let Some(clock) = parts.get(4) {
            board.halfmove_clock = clock.parse().unwrap_or(0);
        }
        if let Some(number) = parts.get(5) {
            board.fullmove_number = number.parse().unwrap_or(1);
        }

        for color in Color::BOTH {
            let found = board.pieces(color, Piece::King).popcount();
            if found != 1 {
                return Err(FenError::KingCount { color, found });
            }
        }

        if let Some(square) = board.en_passant_target {
            if !board.en_passant_is_plausible(square) {
                return Err(FenError::EnPassantWithoutPawn { square });
            }
        }

        Ok(board)
    }

    /// An en passant target must sit behind an enemy pawn that could just
    /// have pushed two squares: target empty, on the mover's sixth rank,
    /// pawn on the fifth, its start square empty.
    fn en_passant_is_plausible(&self, target: Square) -> bool {
        let mover = self.side_to_move();
        let pusher = mover.opponent();
        if target.0 != mover.relative_rank(5) {
            return false;
        }
        let pawn = Square(mover.relative_rank(4), target.1);
        let start = Square(mover.relative_rank(6), target.1);
        self.is_empty(target)
            && self.is_empty(start)
            && self.piece_at(pawn) == Some((pusher, Piece::Pawn))
    }

    /// Parse a board position from FEN notation.
    ///
    /// # Panics
    /// Panics if the FEN string is invalid. Use `try_from_fen` for fallible parsing.
    #[must_use]
    pub fn from_fen(fen: &str) -> Self {
        Self::try_from_fen(fen).expect("Invalid FEN string")
    }

    /// Convert the board position to FEN notation.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                if let Some((color, piece)) = self.piece_at(Square(rank, file)) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.fen_symbol(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = if self.white_to_move { "w" } else { "b" };
        let mut castling = String::new();
        for (color, kingside, c) in [
            (Color::White, true, 'K'),
            (Color::White, false, 'Q'),
            (Color::Black, true, 'k'),
            (Color::Black, false, 'q'),
        ] {
            if self.castling_rights.has(color, kingside) {
                castling.push(c);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }
        let ep = self
            .en_passant_target
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            active,
            castling,
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Parse a move in coordinate notation (e.g. "e2e4", "e7e8q") against
    /// the legal moves of this position.
    pub fn parse_move(&mut self, text: &str) -> Result<Move, MoveParseError> {
        if text.len() < 4 || text.len() > 5 || !text.is_ascii() {
            return Err(MoveParseError::BadLength { len: text.len() });
        }

        let invalid_square = || MoveParseError::BadSquare {
            text: text.to_string(),
        };
        let from_sq: Square = text[0..2].parse().map_err(|_| invalid_square())?;
        let to_sq: Square = text[2..4].parse().map_err(|_| invalid_square())?;

        let promotion = match text[4..].chars().next() {
            Some(c) => match Piece::from_symbol(c) {
                Some(piece) if !matches!(piece, Piece::Pawn | Piece::King) => Some(piece),
                _ => return Err(MoveParseError::BadPromotion { symbol: c }),
            },
            None => None,
        };

        self.generate_moves()
            .iter()
            .copied()
            .find(|mv| mv.from() == from_sq && mv.to() == to_sq && mv.promotion_piece() == promotion)
            .ok_or_else(|| MoveParseError::NotLegal {
                text: text.to_string(),
            })
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::try_from_fen(s)
    }
}
