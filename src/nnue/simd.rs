//! Vectorized accumulator column updates.
//!
//! Adds or subtracts one 256-wide i16 weight column into an accumulator
//! half. Lanes wrap on overflow exactly like scalar two's complement
//! arithmetic, so every backend produces the same bits.
//!
//! Supports:
//! - `x86_64`: `AVX2` (16 i16 lanes)
//! - aarch64: NEON (8 i16 lanes)
//! - Fallback: scalar `wrapping_add` / `wrapping_sub`

use super::HALF_DIMENSIONS;

/// Add a weight column into an accumulator half.
#[inline]
pub fn add_column(acc: &mut [i16; HALF_DIMENSIONS], column: &[i16; HALF_DIMENSIONS]) {
    #[cfg(target_arch = "aarch64")]
    {
        // NEON is always available on aarch64
        unsafe { add_column_neon(acc, column) }
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    {
        unsafe { add_column_avx2(acc, column) }
    }

    #[cfg(all(target_arch = "x86_64", not(target_feature = "avx2")))]
    {
        if is_x86_feature_detected!("avx2") {
            unsafe { add_column_avx2(acc, column) }
        } else {
            add_column_scalar(acc, column)
        }
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        add_column_scalar(acc, column)
    }
}

/// Subtract a weight column from an accumulator half.
#[inline]
pub fn sub_column(acc: &mut [i16; HALF_DIMENSIONS], column: &[i16; HALF_DIMENSIONS]) {
    #[cfg(target_arch = "aarch64")]
    {
        unsafe { sub_column_neon(acc, column) }
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    {
        unsafe { sub_column_avx2(acc, column) }
    }

    #[cfg(all(target_arch = "x86_64", not(target_feature = "avx2")))]
    {
        if is_x86_feature_detected!("avx2") {
            unsafe { sub_column_avx2(acc, column) }
        } else {
            sub_column_scalar(acc, column)
        }
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        sub_column_scalar(acc, column)
    }
}

#[cfg(any(
    test,
    not(any(target_arch = "x86_64", target_arch = "aarch64")),
    all(target_arch = "x86_64", not(target_feature = "avx2"))
))]
#[inline]
fn add_column_scalar(acc: &mut [i16; HALF_DIMENSIONS], column: &[i16; HALF_DIMENSIONS]) {
    for (a, &w) in acc.iter_mut().zip(column) {
        *a = a.wrapping_add(w);
    }
}

#[cfg(any(
    test,
    not(any(target_arch = "x86_64", target_arch = "aarch64")),
    all(target_arch = "x86_64", not(target_feature = "avx2"))
))]
#[inline]
fn sub_column_scalar(acc: &mut [i16; HALF_DIMENSIONS], column: &[i16; HALF_DIMENSIONS]) {
    for (a, &w) in acc.iter_mut().zip(column) {
        *a = a.wrapping_sub(w);
    }
}

#[cfg(target_arch = "aarch64")]
unsafe fn add_column_neon(acc: &mut [i16; HALF_DIMENSIONS], column: &[i16; HALF_DIMENSIONS]) {
    use std::arch::aarch64::{vaddq_s16, vld1q_s16, vst1q_s16};

    let acc_ptr = acc.as_mut_ptr();
    let column_ptr = column.as_ptr();

    for i in (0..HALF_DIMENSIONS).step_by(8) {
        let a = vld1q_s16(acc_ptr.add(i));
        let w = vld1q_s16(column_ptr.add(i));
        vst1q_s16(acc_ptr.add(i), vaddq_s16(a, w));
    }
}

#[cfg(target_arch = "aarch64")]
unsafe fn sub_column_neon(acc: &mut [i16; HALF_DIMENSIONS], column: &[i16; HALF_DIMENSIONS]) {
    use std::arch::aarch64::{vld1q_s16, vst1q_s16, vsubq_s16};

    let acc_ptr = acc.as_mut_ptr();
    let column_ptr = column.as_ptr();

    for i in (0..HALF_DIMENSIONS).step_by(8) {
        let a = vld1q_s16(acc_ptr.add(i));
        let w = vld1q_s16(column_ptr.add(i));
        vst1q_s16(acc_ptr.add(i), vsubq_s16(a, w));
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn add_column_avx2(acc: &mut [i16; HALF_DIMENSIONS], column: &[i16; HALF_DIMENSIONS]) {
    use std::arch::x86_64::{__m256i, _mm256_add_epi16, _mm256_loadu_si256, _mm256_storeu_si256};

    let acc_ptr = acc.as_mut_ptr();
    let column_ptr = column.as_ptr();

    for i in (0..HALF_DIMENSIONS).step_by(16) {
        let a = _mm256_loadu_si256(acc_ptr.add(i) as *const __m256i);
        let w = _mm256_loadu_si256(column_ptr.add(i) as *const __m256i);
        _mm256_storeu_si256(acc_ptr.add(i) as *mut __m256i, _mm256_add_epi16(a, w));
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn sub_column_avx2(acc: &mut [i16; HALF_DIMENSIONS], column: &[i16; HALF_DIMENSIONS]) {
    use std::arch::x86_64::{__m256i, _mm256_loadu_si256, _mm256_storeu_si256, _mm256_sub_epi16};

    let acc_ptr = acc.as_mut_ptr();
    let column_ptr = column.as_ptr();

    for i in (0..HALF_DIMENSIONS).step_by(16) {
        let a = _mm256_loadu_si256(acc_ptr.add(i) as *const __m256i);
        let w = _mm256_loadu_si256(column_ptr.add(i) as *const __m256i);
        _mm256_storeu_si256(acc_ptr.add(i) as *mut __m256i, _mm256_sub_epi16(a, w));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(seed: i32) -> [i16; HALF_DIMENSIONS] {
        std::array::from_fn(|i| ((i as i32 * 7919 + seed * 104_729) % 65_536 - 32_768) as i16)
    }

    #[test]
    fn test_add_column() {
        let mut acc = [100i16; HALF_DIMENSIONS];
        add_column(&mut acc, &[50i16; HALF_DIMENSIONS]);
        assert!(acc.iter().all(|&v| v == 150));
    }

    #[test]
    fn test_sub_column() {
        let mut acc = [100i16; HALF_DIMENSIONS];
        sub_column(&mut acc, &[130i16; HALF_DIMENSIONS]);
        assert!(acc.iter().all(|&v| v == -30));
    }

    #[test]
    fn test_add_column_wraps() {
        let mut acc = [i16::MAX - 10; HALF_DIMENSIONS];
        add_column(&mut acc, &[20i16; HALF_DIMENSIONS]);
        assert!(acc.iter().all(|&v| v == i16::MIN + 9));

        sub_column(&mut acc, &[20i16; HALF_DIMENSIONS]);
        assert!(acc.iter().all(|&v| v == i16::MAX - 10));
    }

    #[test]
    fn test_vector_matches_scalar() {
        let start = pattern(3);
        let column = pattern(11);

        let mut simd = start;
        let mut scalar = start;
        add_column(&mut simd, &column);
        add_column_scalar(&mut scalar, &column);
        assert_eq!(simd, scalar);

        sub_column(&mut simd, &pattern(5));
        sub_column_scalar(&mut scalar, &pattern(5));
        assert_eq!(simd, scalar);
    }
}
