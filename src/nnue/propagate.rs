//! Fixed-point forward propagation.
//!
//! accumulator (2 x 256 i16) -> clip to 0..=127 -> 512 i8
//!   -> affine 512x32 -> clip_shift -> affine 32x32 -> clip_shift
//!   -> affine 32x1 -> / 16

use super::accumulator::Accumulator;
use super::network::{HiddenLayer, NnueNetwork};
use super::{HALF_DIMENSIONS, HIDDEN_SIZE, OUTPUT_SCALE, TRANSFORMED_SIZE, WEIGHT_SCALE_BITS};
use crate::board::Color;

const CLIP_MAX: i32 = 127;

/// Clamp an accumulator entry to `0..=127`.
#[inline]
#[must_use]
pub const fn clip_accumulator(value: i16) -> i8 {
    if value <= 0 {
        0
    } else if value >= CLIP_MAX as i16 {
        CLIP_MAX as i8
    } else {
        value as i8
    }
}

/// Scale a hidden layer sum down by 64 and clamp to `0..=127`.
#[inline]
#[must_use]
pub const fn clip_shift(value: i32) -> i8 {
    if value <= 0 {
        0
    } else if value >= CLIP_MAX << WEIGHT_SCALE_BITS {
        CLIP_MAX as i8
    } else {
        (value >> WEIGHT_SCALE_BITS) as i8
    }
}

/// Clipped network input, side to move's half first
#[must_use]
pub fn transform(acc: &Accumulator, side_to_move: Color) -> [i8; TRANSFORMED_SIZE] {
    let mut input = [0i8; TRANSFORMED_SIZE];
    let (us, them) = input.split_at_mut(HALF_DIMENSIONS);
    for (out, &v) in us.iter_mut().zip(acc.perspective(side_to_move)) {
        *out = clip_accumulator(v);
    }
    for (out, &v) in them.iter_mut().zip(acc.perspective(side_to_move.opponent())) {
        *out = clip_accumulator(v);
    }
    input
}

/// Sparse affine layer followed by `clip_shift`. Zero inputs are skipped.
#[must_use]
pub fn affine(input: &[i8], layer: &HiddenLayer) -> [i8; HIDDEN_SIZE] {
    debug_assert_eq!(input.len(), layer.inputs());
    let mut sums = layer.bias;
    for (&x, row) in input.iter().zip(&layer.weights) {
        if x == 0 {
            continue;
        }
        let x = i32::from(x);
        for (sum, &w) in sums.iter_mut().zip(row) {
            *sum = sum.wrapping_add(x * i32::from(w));
        }
    }
    sums.map(clip_shift)
}

/// Output layer: bias plus dot product, no clipping
#[must_use]
pub fn output(input: &[i8; HIDDEN_SIZE], network: &NnueNetwork) -> i32 {
    input
        .iter()
        .zip(&network.output_weights)
        .fold(network.output_bias, |sum, (&x, &w)| {
            sum.wrapping_add(i32::from(x) * i32::from(w))
        })
}

/// Raw network output before the final division
#[must_use]
pub fn raw_output(network: &NnueNetwork, acc: &Accumulator, side_to_move: Color) -> i32 {
    let input = transform(acc, side_to_move);
    let hidden1 = affine(&input, &network.hidden1);
    let hidden2 = affine(&hidden1, &network.hidden2);
    output(&hidden2, network)
}

/// Score for the side to move. Division truncates toward zero.
#[must_use]
pub fn evaluate(network: &NnueNetwork, acc: &Accumulator, side_to_move: Color) -> i32 {
    raw_output(network, acc, side_to_move) / OUTPUT_SCALE
}
