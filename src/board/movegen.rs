use super::types::PROMOTION_PIECES;
use super::{Board, Color, Move, MoveList, Piece, Square};

const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

const KING_OFFSETS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const BISHOP_DIRS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

impl Board {
    fn generate_pseudo_moves(&self, moves: &mut MoveList) {
        let color = self.side_to_move();

        for from in self.pieces(color, Piece::Pawn).iter() {
            self.generate_pawn_moves(from, color, moves);
        }
        for from in self.pieces(color, Piece::Knight).iter() {
            self.generate_step_moves(from, color, &KNIGHT_OFFSETS, moves);
        }
        for from in self.pieces(color, Piece::Bishop).iter() {
            self.generate_sliding_moves(from, color, &BISHOP_DIRS, moves);
        }
        for from in self.pieces(color, Piece::Rook).iter() {
            self.generate_sliding_moves(from, color, &ROOK_DIRS, moves);
        }
        for from in self.pieces(color, Piece::Queen).iter() {
            self.generate_sliding_moves(from, color, &BISHOP_DIRS, moves);
            self.generate_sliding_moves(from, color, &ROOK_DIRS, moves);
        }
        let king = self.king_square(color);
        self.generate_step_moves(king, color, &KING_OFFSETS, moves);
        self.generate_castling_moves(king, color, moves);
    }

    fn push_pawn_move(from: Square, to: Square, color: Color, capture: bool, moves: &mut MoveList) {
        if to.0 == color.pawn_promotion_rank() {
            for piece in PROMOTION_PIECES {
                moves.push(Move::promotion(from, to, piece, capture));
            }
        } else if capture {
            moves.push(Move::capture(from, to));
        } else {
            moves.push(Move::quiet(from, to));
        }
    }

    fn generate_pawn_moves(&self, from: Square, color: Color, moves: &mut MoveList) {
        let dir = color.pawn_direction();
        let Some(forward) = from.offset(dir, 0) else {
            return;
        };

        if self.is_empty(forward) {
            Board::push_pawn_move(from, forward, color, false, moves);
            if from.0 == color.pawn_start_rank() {
                if let Some(double) = forward.offset(dir, 0) {
                    if self.is_empty(double) {
                        moves.push(Move::double_pawn_push(from, double));
                    }
                }
            }
        }

        for df in [-1, 1] {
            let Some(target) = from.offset(dir, df) else {
                continue;
            };
            match self.piece_at(target) {
                Some((target_color, _)) if target_color != color => {
                    Board::push_pawn_move(from, target, color, true, moves);
                }
                None if self.en_passant_target == Some(target) => {
                    moves.push(Move::en_passant(from, target));
                }
                _ => {}
            }
        }
    }

    fn generate_step_moves(
        &self,
        from: Square,
        color: Color,
        offsets: &[(isize, isize)],
        moves: &mut MoveList,
    ) {
        for &(dr, df) in offsets {
            let Some(to) = from.offset(dr, df) else {
                continue;
            };
            match self.piece_at(to) {
                None => moves.push(Move::quiet(from, to)),
                Some((c, _)) if c != color => moves.push(Move::capture(from, to)),
                _ => {}
            }
        }
    }

    fn generate_sliding_moves(
        &self,
        from: Square,
        color: Color,
        directions: &[(isize, isize)],
        moves: &mut MoveList,
    ) {
        for &(dr, df) in directions {
            let mut current = from;
            while let Some(to) = current.offset(dr, df) {
                match self.piece_at(to) {
                    None => moves.push(Move::quiet(from, to)),
                    Some((c, _)) => {
                        if c != color {
                            moves.push(Move::capture(from, to));
                        }
                        break;
                    }
                }
                current = to;
            }
        }
    }

    fn generate_castling_moves(&self, king: Square, color: Color, moves: &mut MoveList) {
        let back_rank = color.back_rank();
        if king != Square(back_rank, 4) {
            return;
        }
        let rook_home =
            |file: usize| self.piece_at(Square(back_rank, file)) == Some((color, Piece::Rook));

        if self.castling_rights.has(color, true)
            && self.is_empty(Square(back_rank, 5))
            && self.is_empty(Square(back_rank, 6))
            && rook_home(7)
        {
            moves.push(Move::castle(king, Square(back_rank, 6)));
        }
        if self.castling_rights.has(color, false)
            && self.is_empty(Square(back_rank, 1))
            && self.is_empty(Square(back_rank, 2))
            && self.is_empty(Square(back_rank, 3))
            && rook_home(0)
        {
            moves.push(Move::castle(king, Square(back_rank, 2)));
        }
    }

    fn attacked_by_step(
        &self,
        square: Square,
        attacker: Color,
        piece: Piece,
        offsets: &[(isize, isize)],
    ) -> bool {
        let pieces = self.pieces(attacker, piece);
        offsets
            .iter()
            .filter_map(|&(dr, df)| square.offset(dr, df))
            .any(|sq| pieces.contains(sq))
    }

    fn attacked_by_slider(
        &self,
        square: Square,
        attacker: Color,
        sliders: [Piece; 2],
        directions: &[(isize, isize)],
    ) -> bool {
        for &(dr, df) in directions {
            let mut current = square;
            while let Some(sq) = current.offset(dr, df) {
                if let Some((c, piece)) = self.piece_at(sq) {
                    if c == attacker && sliders.contains(&piece) {
                        return true;
                    }
                    break;
                }
                current = sq;
            }
        }
        false
    }

    /// True if any piece of `attacker` attacks `square`.
    pub fn is_square_attacked(&self, square: Square, attacker: Color) -> bool {
        // Pawns attacking `square` sit one rank behind it from the attacker's view
        let back = -attacker.pawn_direction();
        if self.attacked_by_step(square, attacker, Piece::Pawn, &[(back, -1), (back, 1)]) {
            return true;
        }
        self.attacked_by_step(square, attacker, Piece::Knight, &KNIGHT_OFFSETS)
            || self.attacked_by_step(square, attacker, Piece::King, &KING_OFFSETS)
            || self.attacked_by_slider(square, attacker, [Piece::Rook, Piece::Queen], &ROOK_DIRS)
            || self.attacked_by_slider(
                square,
                attacker,
                [Piece::Bishop, Piece::Queen],
                &BISHOP_DIRS,
            )
    }

    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.king_square(color), color.opponent())
    }

    /// Generate all legal moves for the side to move.
    pub fn generate_moves(&mut self) -> MoveList {
        let color = self.side_to_move();
        let opponent = color.opponent();
        let mut pseudo = MoveList::new();
        self.generate_pseudo_moves(&mut pseudo);

        let mut legal = MoveList::new();
        for &m in pseudo.iter() {
            if m.is_castling() {
                let from = m.from();
                let mid = Square(from.0, (from.1 + m.to().1) / 2);
                if self.is_square_attacked(from, opponent)
                    || self.is_square_attacked(mid, opponent)
                    || self.is_square_attacked(m.to(), opponent)
                {
                    continue;
                }
            }

            let info = self.make_move(m);
            if !self.is_in_check(color) {
                legal.push(m);
            }
            self.unmake_move(m, info);
        }
        legal
    }

    /// Count leaf nodes of the legal move tree to `depth`.
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for &m in moves.iter() {
            let info = self.make_move(m);
            nodes += self.perft(depth - 1);
            self.unmake_move(m, info);
        }
        nodes
    }
}
