//! HalfKP NNUE evaluation.
//!
//! Quantized network of shape (41024 -> 256) x 2 -> 32 -> 32 -> 1:
//! - Binary weight file loader with strict structural validation
//! - King-relative sparse feature indexing
//! - Accumulator kept in sync with make/unmake through move diffs
//! - Fixed-point forward propagation
//!
//! The parameter table is immutable after load and shared through `Arc`;
//! every search line owns its own [`Evaluator`] and therefore its own
//! accumulator.

pub mod accumulator;
pub mod diff;
pub mod error;
pub mod evaluator;
pub mod features;
pub mod network;
pub mod position;
pub mod propagate;
pub mod simd;
pub mod slot;

#[cfg(test)]
mod tests;

pub use accumulator::Accumulator;
pub use diff::{DiffEvent, DiffList, PieceChange};
pub use error::{HeaderField, NnueError, Section};
pub use evaluator::Evaluator;
pub use features::FeatureList;
pub use network::NnueNetwork;
pub use position::NnuePosition;
pub use slot::NetworkSlot;

/// Number of HalfKP input features per perspective
pub const HALFKP_INPUTS: usize = 41024;

/// Width of one perspective's accumulator
pub const HALF_DIMENSIONS: usize = 256;

/// Width of the transformed input to the first hidden layer
pub const TRANSFORMED_SIZE: usize = HALF_DIMENSIONS * 2;

/// Width of both hidden layers
pub const HIDDEN_SIZE: usize = 32;

/// Right shift applied to hidden layer sums before clipping
pub const WEIGHT_SCALE_BITS: u32 = 6;

/// Divisor turning the raw output into the final score
pub const OUTPUT_SCALE: i32 = 16;
