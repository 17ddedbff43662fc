use super::{Board, Color, Move, Piece, Square, UnmakeInfo};

impl Board {
    /// Square of the pawn removed by an en passant capture landing on `to`
    #[inline]
    pub(crate) fn en_passant_victim(to: Square, mover: Color) -> Square {
        match mover {
            Color::White => Square(to.0 - 1, to.1),
            Color::Black => Square(to.0 + 1, to.1),
        }
    }

    /// Rook (from, to) squares for a castle whose king lands on `king_to`
    #[inline]
    pub(crate) fn castle_rook_squares(king_to: Square) -> (Square, Square) {
        if king_to.1 == 6 {
            (Square(king_to.0, 7), Square(king_to.0, 5))
        } else {
            (Square(king_to.0, 0), Square(king_to.0, 3))
        }
    }

    /// Make a move that was generated for this position.
    ///
    /// # Panics
    /// Panics if the move's origin square is empty.
    pub fn make_move(&mut self, m: Move) -> UnmakeInfo {
        let color = self.side_to_move();
        let from = m.from();
        let to = m.to();

        let mut info = UnmakeInfo {
            captured_piece_info: None,
            previous_en_passant_target: self.en_passant_target,
            previous_castling_rights: self.castling_rights,
            previous_halfmove_clock: self.halfmove_clock,
        };

        if m.is_en_passant() {
            let victim = Board::en_passant_victim(to, color);
            info.captured_piece_info = self.piece_at(victim);
            self.remove_piece(victim, color.opponent(), Piece::Pawn);
        } else if !m.is_castling() {
            info.captured_piece_info = self.piece_at(to);
            if let Some((cap_color, cap_piece)) = info.captured_piece_info {
                self.remove_piece(to, cap_color, cap_piece);
            }
        }

        let (_, moving_piece) = self.piece_at(from).expect("make_move 'from' empty");
        self.remove_piece(from, color, moving_piece);
        let placed = m.promotion_piece().unwrap_or(moving_piece);
        self.set_piece(to, color, placed);

        if m.is_castling() {
            let (rook_from, rook_to) = Board::castle_rook_squares(to);
            self.remove_piece(rook_from, color, Piece::Rook);
            self.set_piece(rook_to, color, Piece::Rook);
        }

        self.en_passant_target = if m.is_double_pawn_push() {
            Some(Square((from.0 + to.0) / 2, from.1))
        } else {
            None
        };

        if moving_piece == Piece::Pawn || info.captured_piece_info.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        if moving_piece == Piece::King {
            self.castling_rights.remove_color(color);
        }
        for (corner, owner, kingside) in [
            (Square(0, 0), Color::White, false),
            (Square(0, 7), Color::White, true),
            (Square(7, 0), Color::Black, false),
            (Square(7, 7), Color::Black, true),
        ] {
            if from == corner || to == corner {
                self.castling_rights.remove(owner, kingside);
            }
        }

        if color == Color::Black {
            self.fullmove_number += 1;
        }
        self.white_to_move = !self.white_to_move;
        info
    }

    /// Take back `m`, which must be the last move made.
    ///
    /// # Panics
    /// Panics if the move's destination square is empty.
    pub fn unmake_move(&mut self, m: Move, info: UnmakeInfo) {
        self.white_to_move = !self.white_to_move;
        let color = self.side_to_move();
        if color == Color::Black {
            self.fullmove_number -= 1;
        }
        self.en_passant_target = info.previous_en_passant_target;
        self.castling_rights = info.previous_castling_rights;
        self.halfmove_clock = info.previous_halfmove_clock;

        let from = m.from();
        let to = m.to();
        let (_, placed) = self
            .piece_at(to)
            .expect("Unmake move: 'to' square empty?");
        self.remove_piece(to, color, placed);
        let original = if m.is_promotion() { Piece::Pawn } else { placed };
        self.set_piece(from, color, original);

        if m.is_castling() {
            let (rook_from, rook_to) = Board::castle_rook_squares(to);
            self.remove_piece(rook_to, color, Piece::Rook);
            self.set_piece(rook_from, color, Piece::Rook);
        } else if let Some((cap_color, cap_piece)) = info.captured_piece_info {
            let square = if m.is_en_passant() {
                Board::en_passant_victim(to, color)
            } else {
                to
            };
            self.set_piece(square, cap_color, cap_piece);
        }
    }
}
