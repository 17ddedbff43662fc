//! Property-based accumulator tests.

use std::sync::Arc;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::SYNTHETIC;
use crate::board::Board;
use crate::nnue::Evaluator;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// The patched accumulator equals a rebuild after every apply and undo
    #[test]
    fn prop_accumulator_tracks_rebuild(seed in any::<u64>(), num_moves in 1..=40usize) {
        let mut board = Board::new();
        let mut eval = Evaluator::new(Arc::clone(&SYNTHETIC));
        eval.rebuild_accumulator(&board);
        let initial = eval.accumulator().clone();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut history = Vec::new();

        for _ in 0..num_moves {
            let moves = board.generate_moves();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            let diff = eval.prepare_diff(mv, &board);
            let info = board.make_move(mv);
            eval.apply_diff(&diff, &board);
            prop_assert_eq!(eval.verify(&board), Ok(()));
            history.push((mv, info, diff));
        }

        while let Some((mv, info, diff)) = history.pop() {
            board.unmake_move(mv, info);
            eval.undo_diff(&diff, &board);
            prop_assert_eq!(eval.verify(&board), Ok(()));
        }
        prop_assert_eq!(eval.accumulator(), &initial);
    }

    /// Incremental and scratch evaluation give the same score
    #[test]
    fn prop_incremental_and_scratch_scores_agree(seed in any::<u64>(), num_moves in 1..=30usize) {
        let mut board = Board::new();
        let mut eval = Evaluator::new(Arc::clone(&SYNTHETIC));
        eval.rebuild_accumulator(&board);
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..num_moves {
            let moves = board.generate_moves();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            let diff = eval.prepare_diff(mv, &board);
            board.make_move(mv);
            eval.apply_diff(&diff, &board);
        }
        let incremental = eval.evaluate(&board, true);
        prop_assert_eq!(incremental, eval.evaluate(&board, false));
    }
}
