//! Per-search-line evaluation context.

use std::sync::Arc;

use log::error;

use super::accumulator::Accumulator;
use super::diff::DiffList;
use super::error::NnueError;
use super::network::NnueNetwork;
use super::position::NnuePosition;
use super::propagate;
use crate::board::{Board, Color, Move};
use crate::config::NnueConfig;

/// Owns one accumulator and a shared handle to the network.
///
/// Call order along a search path:
///
/// ```text
/// let diff = eval.prepare_diff(mv, &board);   // before make_move
/// let info = board.make_move(mv);
/// eval.apply_diff(&diff, &board);
/// ...
/// board.unmake_move(mv, info);
/// eval.undo_diff(&diff, &board);              // after unmake_move
/// ```
#[derive(Clone, Debug)]
pub struct Evaluator {
    network: Arc<NnueNetwork>,
    accumulator: Accumulator,
    verify_interval: u32,
    evaluations: u64,
}

impl Evaluator {
    #[must_use]
    pub fn new(network: Arc<NnueNetwork>) -> Self {
        Self::with_config(network, &NnueConfig::default())
    }

    #[must_use]
    pub fn with_config(network: Arc<NnueNetwork>, config: &NnueConfig) -> Self {
        Evaluator {
            network,
            accumulator: Accumulator::default(),
            verify_interval: config.verify_interval,
            evaluations: 0,
        }
    }

    #[must_use]
    pub fn network(&self) -> &Arc<NnueNetwork> {
        &self.network
    }

    #[must_use]
    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    /// Recompute both perspectives from scratch
    pub fn rebuild_accumulator<P: NnuePosition>(&mut self, pos: &P) {
        self.accumulator.refresh_all(pos, &self.network);
    }

    /// Feature changes of `mv`; call before the move is made
    #[must_use]
    pub fn prepare_diff<P: NnuePosition>(&self, mv: Move, pos: &P) -> DiffList {
        DiffList::prepare(mv, pos)
    }

    /// Patch both perspectives after the move has been made
    pub fn apply_diff<P: NnuePosition>(&mut self, diff: &DiffList, pos: &P) {
        for perspective in [Color::White, Color::Black] {
            self.accumulator.apply(diff, perspective, pos, &self.network);
        }
    }

    /// Revert a diff after the move has been unmade
    pub fn undo_diff<P: NnuePosition>(&mut self, diff: &DiffList, pos: &P) {
        self.apply_diff(&diff.inverted(), pos);
    }

    /// Score of `pos` for the side to move.
    ///
    /// With `use_accumulator` the tracked accumulator is trusted; otherwise
    /// a scratch accumulator is rebuilt from `pos` and the tracked one is
    /// left alone.
    pub fn evaluate<P: NnuePosition>(&mut self, pos: &P, use_accumulator: bool) -> i32 {
        if use_accumulator {
            self.self_check(pos);
            propagate::evaluate(&self.network, &self.accumulator, pos.side_to_move())
        } else {
            let scratch = Accumulator::from_position(pos, &self.network);
            propagate::evaluate(&self.network, &scratch, pos.side_to_move())
        }
    }

    /// Compare the tracked accumulator with a full rebuild of `pos`.
    pub fn verify<P: NnuePosition>(&self, pos: &P) -> Result<(), NnueError> {
        let rebuilt = Accumulator::from_position(pos, &self.network);
        match self.accumulator.first_mismatch(&rebuilt) {
            Some((perspective, index, incremental, rebuilt)) => {
                Err(NnueError::AccumulatorDesync {
                    perspective,
                    index,
                    incremental,
                    rebuilt,
                })
            }
            None => Ok(()),
        }
    }

    fn self_check<P: NnuePosition>(&mut self, pos: &P) {
        if self.verify_interval == 0 {
            return;
        }
        self.evaluations += 1;
        if self.evaluations % u64::from(self.verify_interval) != 0 {
            return;
        }
        if let Err(err) = self.verify(pos) {
            error!("{err}");
            debug_assert!(false, "{err}");
        }
    }

    /// Walk every legal line to `depth`, patching the accumulator forward
    /// and backward and verifying it after every apply and undo. Returns the
    /// number of leaf nodes, or the first desync found.
    ///
    /// The board is restored before returning, also on error.
    pub fn perft_verify(&mut self, board: &mut Board, depth: usize) -> Result<u64, NnueError> {
        self.rebuild_accumulator(&*board);
        self.perft_walk(board, depth)
    }

    fn perft_walk(&mut self, board: &mut Board, depth: usize) -> Result<u64, NnueError> {
        if depth == 0 {
            return Ok(1);
        }

        let moves = board.generate_moves();
        let mut nodes = 0;
        for &mv in moves.iter() {
            let diff = self.prepare_diff(mv, &*board);
            let info = board.make_move(mv);
            self.apply_diff(&diff, &*board);

            let below = self
                .verify(&*board)
                .and_then(|()| self.perft_walk(board, depth - 1));

            board.unmake_move(mv, info);
            self.undo_diff(&diff, &*board);
            nodes += below?;
            self.verify(&*board)?;
        }
        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::START_FEN;

    fn zero_net_with_output_bias(bias: i32) -> Arc<NnueNetwork> {
        let mut network = NnueNetwork::zeroed();
        network.output_bias = bias;
        Arc::new(network)
    }

    #[test]
    fn test_degenerate_network_constant_score() {
        let mut eval = Evaluator::new(zero_net_with_output_bias(160));
        let mut board = Board::from_fen(START_FEN);
        eval.rebuild_accumulator(&board);
        assert_eq!(eval.evaluate(&board, true), 10);
        assert_eq!(eval.evaluate(&board, false), 10);

        let mv = board.parse_move("e2e4").unwrap();
        let diff = eval.prepare_diff(mv, &board);
        let _info = board.make_move(mv);
        eval.apply_diff(&diff, &board);
        assert_eq!(eval.evaluate(&board, true), 10);
    }

    #[test]
    fn test_negative_output_truncates() {
        let mut eval = Evaluator::new(zero_net_with_output_bias(-40));
        let board = Board::new();
        assert_eq!(eval.evaluate(&board, false), -2);
    }

    #[test]
    fn test_verify_reports_desync() {
        let mut network = NnueNetwork::zeroed();
        // white pawn e2 with white king e1, white perspective
        let index = crate::nnue::features::feature_index(
            Color::White,
            crate::board::Square(0, 4),
            crate::board::Piece::Pawn,
            Color::White,
            crate::board::Square(1, 4),
        )
        .unwrap();
        network.feature_weights[index] = [1; crate::nnue::HALF_DIMENSIONS];
        let mut eval = Evaluator::new(Arc::new(network));

        let board = Board::new();
        eval.rebuild_accumulator(&Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1"));
        let err = eval.verify(&board).unwrap_err();
        assert_eq!(
            err,
            NnueError::AccumulatorDesync {
                perspective: Color::White,
                index: 0,
                incremental: 0,
                rebuilt: 1,
            }
        );

        eval.rebuild_accumulator(&board);
        assert_eq!(eval.verify(&board), Ok(()));
    }

    #[test]
    fn test_evaluate_without_accumulator_leaves_state() {
        let mut eval = Evaluator::new(Arc::new(NnueNetwork::zeroed()));
        let start = Board::new();
        eval.rebuild_accumulator(&start);
        let before = eval.accumulator().clone();
        let other = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        let _ = eval.evaluate(&other, false);
        assert_eq!(eval.accumulator(), &before);
    }
}
