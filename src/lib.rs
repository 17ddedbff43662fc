//! HalfKP NNUE position evaluation.
//!
//! - [`nnue`] loads a quantized HalfKP network and evaluates positions,
//!   keeping the first layer up to date incrementally as moves are made
//!   and unmade.
//! - [`board`] is a legal-move board that drives the evaluator and checks it.
//! - [`config`] collects evaluator settings.
//!
//! ```no_run
//! use std::sync::Arc;
//! use halfkp_eval::{Board, Evaluator, NnueNetwork};
//!
//! let network = Arc::new(NnueNetwork::load("nn.bin")?);
//! let mut board = Board::new();
//! let mut eval = Evaluator::new(network);
//! eval.rebuild_accumulator(&board);
//!
//! let mv = board.parse_move("e2e4")?;
//! let diff = eval.prepare_diff(mv, &board);
//! let info = board.make_move(mv);
//! eval.apply_diff(&diff, &board);
//! println!("{}", eval.evaluate(&board, true));
//!
//! board.unmake_move(mv, info);
//! eval.undo_diff(&diff, &board);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod board;
pub mod config;
pub mod nnue;

pub use board::{Board, Color, Move, Piece, Square};
pub use config::NnueConfig;
pub use nnue::{Evaluator, NnueError, NnueNetwork};
