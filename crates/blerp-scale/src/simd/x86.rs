//! SSE2, SSE4.1, AVX2 and FMA implementations.
//!
//! Every function here requires the CPU features named in its
//! `target_feature` attribute; callers check them through
//! [`cpu_features`](super::cpu_features) first.

use std::arch::x86_64::*;

use crate::fixed::{Fraction, Q12_ONE};
use crate::grid::Window;

/// Widen the first four `u32` values of `src` into the 64-bit lanes of a 256-bit register.
///
/// # Safety
/// - Caller must ensure AVX2 is available.
#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn loadlo_4x32(src: &[u32]) -> __m256i {
    let src = &src[..4];
    unsafe { _mm256_cvtepu32_epi64(_mm_loadu_si128(src.as_ptr() as *const __m128i)) }
}

/// Store the low 32 bits of each 64-bit lane into the first four values of `dst`.
///
/// The lanes are gathered with the permutation `0, 2, 4, 6`.
///
/// # Safety
/// - Caller must ensure AVX2 is available.
#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn storelo_4x32(v: __m256i, dst: &mut [u32]) {
    let dst = &mut dst[..4];
    unsafe {
        let packed = _mm256_permutevar8x32_epi32(v, _mm256_setr_epi32(0, 2, 4, 6, 0, 0, 0, 0));
        _mm_storeu_si128(
            dst.as_mut_ptr() as *mut __m128i,
            _mm256_castsi256_si128(packed),
        );
    }
}

/// Widen the first four bytes of `src` into the 32-bit lanes of a 128-bit register.
///
/// # Safety
/// - Caller must ensure SSE2 is available.
#[inline]
#[target_feature(enable = "sse2")]
pub unsafe fn loadlo_4x8(src: &[u8]) -> __m128i {
    let bytes = i32::from_le_bytes([src[0], src[1], src[2], src[3]]);
    unsafe {
        let zero = _mm_setzero_si128();
        _mm_unpacklo_epi16(_mm_unpacklo_epi8(_mm_cvtsi32_si128(bytes), zero), zero)
    }
}

/// `((s << 32) + f e - f s) >> 32` in each 64-bit lane.
///
/// `f` holds the fraction in the low half of every lane.
///
/// # Safety
/// - Caller must ensure AVX2 is available.
#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn lerp_u32x4(s: __m256i, e: __m256i, f: __m256i) -> __m256i {
    unsafe {
        let fe = _mm256_mul_epu32(f, e);
        let fs = _mm256_mul_epu32(f, s);
        let v = _mm256_sub_epi64(_mm256_add_epi64(_mm256_slli_epi64::<32>(s), fe), fs);
        _mm256_srli_epi64::<32>(v)
    }
}

/// Bilinear blend of four 64-bit lane groups.
///
/// # Safety
/// - Caller must ensure AVX2 is available.
#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn blerp_u32x4(
    c00: __m256i,
    c10: __m256i,
    c01: __m256i,
    c11: __m256i,
    fx: __m256i,
    fy: __m256i,
) -> __m256i {
    unsafe { lerp_u32x4(lerp_u32x4(c00, c10, fx), lerp_u32x4(c01, c11, fx), fy) }
}

/// `s (Q12_ONE - t) + e t` in each 32-bit lane, `t <= Q12_ONE`.
///
/// # Safety
/// - Caller must ensure SSE4.1 is available.
#[inline]
#[target_feature(enable = "sse4.1")]
pub unsafe fn lerp_q12x4(s: __m128i, e: __m128i, t: u32) -> __m128i {
    debug_assert!(t <= Q12_ONE, "Q12 weight {t} is above one");
    unsafe {
        let wt = _mm_set1_epi32(t as i32);
        let ws = _mm_set1_epi32((Q12_ONE - t) as i32);
        _mm_add_epi32(_mm_mullo_epi32(s, ws), _mm_mullo_epi32(e, wt))
    }
}

/// Q12 bilinear blend of byte-valued lanes, rounded back to the byte scale.
///
/// # Safety
/// - Caller must ensure SSE4.1 is available.
#[inline]
#[target_feature(enable = "sse4.1")]
pub unsafe fn blerp_q12x4(
    c00: __m128i,
    c10: __m128i,
    c01: __m128i,
    c11: __m128i,
    tx: u32,
    ty: u32,
) -> __m128i {
    unsafe {
        let v = lerp_q12x4(lerp_q12x4(c00, c10, tx), lerp_q12x4(c01, c11, tx), ty);
        _mm_srli_epi32::<24>(_mm_add_epi32(v, _mm_set1_epi32(1 << 23)))
    }
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn lerp_f32x4(s: __m128, e: __m128, t: __m128) -> __m128 {
    unsafe { _mm_add_ps(s, _mm_mul_ps(_mm_sub_ps(e, s), t)) }
}

#[inline]
#[target_feature(enable = "fma")]
unsafe fn lerp_f32x4_fma(s: __m128, e: __m128, t: __m128) -> __m128 {
    unsafe { _mm_fmadd_ps(t, e, _mm_fnmadd_ps(t, s, s)) }
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn lerp_f32x4_rev(s: __m128, e: __m128, w: __m128) -> __m128 {
    unsafe { _mm_add_ps(_mm_mul_ps(w, s), _mm_sub_ps(e, _mm_mul_ps(w, e))) }
}

/// Bilinear blend of four float lanes, `s + (e - s) t`.
///
/// # Safety
/// - Caller must ensure SSE2 is available.
#[inline]
#[target_feature(enable = "sse2")]
pub unsafe fn blerp_f32x4(
    c00: __m128,
    c10: __m128,
    c01: __m128,
    c11: __m128,
    tx: __m128,
    ty: __m128,
) -> __m128 {
    unsafe { lerp_f32x4(lerp_f32x4(c00, c10, tx), lerp_f32x4(c01, c11, tx), ty) }
}

/// Bilinear blend of four float lanes with fused multiply-adds.
///
/// # Safety
/// - Caller must ensure FMA is available.
#[inline]
#[target_feature(enable = "fma")]
pub unsafe fn blerp_f32x4_fma(
    c00: __m128,
    c10: __m128,
    c01: __m128,
    c11: __m128,
    tx: __m128,
    ty: __m128,
) -> __m128 {
    unsafe { lerp_f32x4_fma(lerp_f32x4_fma(c00, c10, tx), lerp_f32x4_fma(c01, c11, tx), ty) }
}

/// Bilinear blend of four float lanes, `wx` and `wy` weighting the left and top samples.
///
/// # Safety
/// - Caller must ensure SSE2 is available.
#[inline]
#[target_feature(enable = "sse2")]
pub unsafe fn blerp_f32x4_rev(
    c00: __m128,
    c10: __m128,
    c01: __m128,
    c11: __m128,
    wx: __m128,
    wy: __m128,
) -> __m128 {
    unsafe { lerp_f32x4_rev(lerp_f32x4_rev(c00, c10, wx), lerp_f32x4_rev(c01, c11, wx), wy) }
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn load_f32x4(src: &[f32]) -> __m128 {
    let src = &src[..4];
    unsafe { _mm_loadu_ps(src.as_ptr()) }
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn store_f32x4(v: __m128, dst: &mut [f32]) {
    let dst = &mut dst[..4];
    unsafe { _mm_storeu_ps(dst.as_mut_ptr(), v) }
}

/// Fill a window of a 4-channel `u32` field.
///
/// # Safety
/// - Caller must ensure AVX2 is available.
#[target_feature(enable = "avx2")]
pub unsafe fn blerp_rows_u32x4(
    src: &[u32],
    src_stride: usize,
    dst: &mut [u32],
    dst_stride: usize,
    window: Window<'_, Fraction>,
) {
    unsafe {
        for (dst_row, ty) in dst.chunks_mut(dst_stride).zip(window.rows) {
            let row0 = &src[ty.i0 * src_stride..];
            let row1 = &src[ty.i1 * src_stride..];
            let fy = _mm256_set1_epi64x(ty.frac.raw() as i64);

            let zero = _mm256_setzero_si256();
            let (mut c00, mut c10, mut c01, mut c11) = (zero, zero, zero, zero);
            let mut cell = usize::MAX;

            for (px, tx) in dst_row[window.x0 * 4..].chunks_exact_mut(4).zip(window.cols) {
                if tx.i0 != cell {
                    let (a, b) = (tx.i0 * 4, tx.i1 * 4);
                    c00 = loadlo_4x32(&row0[a..]);
                    c10 = loadlo_4x32(&row0[b..]);
                    c01 = loadlo_4x32(&row1[a..]);
                    c11 = loadlo_4x32(&row1[b..]);
                    cell = tx.i0;
                }
                let fx = _mm256_set1_epi64x(tx.frac.raw() as i64);
                storelo_4x32(blerp_u32x4(c00, c10, c01, c11, fx, fy), px);
            }
        }
    }
}

/// Fill a window of a 4-channel `u32` field from a 4-channel byte field.
///
/// # Safety
/// - Caller must ensure SSE4.1 is available.
#[target_feature(enable = "sse4.1")]
pub unsafe fn blerp_rows_u8x4(
    src: &[u8],
    src_stride: usize,
    dst: &mut [u32],
    dst_stride: usize,
    window: Window<'_, Fraction>,
) {
    unsafe {
        for (dst_row, ty) in dst.chunks_mut(dst_stride).zip(window.rows) {
            let row0 = &src[ty.i0 * src_stride..];
            let row1 = &src[ty.i1 * src_stride..];
            let fy = ty.frac.to_q12();

            let zero = _mm_setzero_si128();
            let (mut c00, mut c10, mut c01, mut c11) = (zero, zero, zero, zero);
            let mut cell = usize::MAX;

            for (px, tx) in dst_row[window.x0 * 4..].chunks_exact_mut(4).zip(window.cols) {
                if tx.i0 != cell {
                    let (a, b) = (tx.i0 * 4, tx.i1 * 4);
                    c00 = loadlo_4x8(&row0[a..]);
                    c10 = loadlo_4x8(&row0[b..]);
                    c01 = loadlo_4x8(&row1[a..]);
                    c11 = loadlo_4x8(&row1[b..]);
                    cell = tx.i0;
                }
                let v = blerp_q12x4(c00, c10, c01, c11, tx.frac.to_q12(), fy);
                _mm_storeu_si128(px.as_mut_ptr() as *mut __m128i, v);
            }
        }
    }
}

/// Fill a window of a 4-channel float field, `s + (e - s) t`.
///
/// # Safety
/// - Caller must ensure SSE2 is available.
#[target_feature(enable = "sse2")]
pub unsafe fn blerp_rows_f32x4(
    src: &[f32],
    src_stride: usize,
    dst: &mut [f32],
    dst_stride: usize,
    window: Window<'_, f32>,
) {
    unsafe {
        for (dst_row, ty) in dst.chunks_mut(dst_stride).zip(window.rows) {
            let row0 = &src[ty.i0 * src_stride..];
            let row1 = &src[ty.i1 * src_stride..];
            let fy = _mm_set1_ps(ty.frac);

            let zero = _mm_setzero_ps();
            let (mut c00, mut c10, mut c01, mut c11) = (zero, zero, zero, zero);
            let mut cell = usize::MAX;

            for (px, tx) in dst_row[window.x0 * 4..].chunks_exact_mut(4).zip(window.cols) {
                if tx.i0 != cell {
                    let (a, b) = (tx.i0 * 4, tx.i1 * 4);
                    c00 = load_f32x4(&row0[a..]);
                    c10 = load_f32x4(&row0[b..]);
                    c01 = load_f32x4(&row1[a..]);
                    c11 = load_f32x4(&row1[b..]);
                    cell = tx.i0;
                }
                let fx = _mm_set1_ps(tx.frac);
                store_f32x4(blerp_f32x4(c00, c10, c01, c11, fx, fy), px);
            }
        }
    }
}

/// Fill a window of a 4-channel float field with fused multiply-adds.
///
/// # Safety
/// - Caller must ensure FMA is available.
#[target_feature(enable = "fma")]
pub unsafe fn blerp_rows_f32x4_fma(
    src: &[f32],
    src_stride: usize,
    dst: &mut [f32],
    dst_stride: usize,
    window: Window<'_, f32>,
) {
    unsafe {
        for (dst_row, ty) in dst.chunks_mut(dst_stride).zip(window.rows) {
            let row0 = &src[ty.i0 * src_stride..];
            let row1 = &src[ty.i1 * src_stride..];
            let fy = _mm_set1_ps(ty.frac);

            let zero = _mm_setzero_ps();
            let (mut c00, mut c10, mut c01, mut c11) = (zero, zero, zero, zero);
            let mut cell = usize::MAX;

            for (px, tx) in dst_row[window.x0 * 4..].chunks_exact_mut(4).zip(window.cols) {
                if tx.i0 != cell {
                    let (a, b) = (tx.i0 * 4, tx.i1 * 4);
                    c00 = load_f32x4(&row0[a..]);
                    c10 = load_f32x4(&row0[b..]);
                    c01 = load_f32x4(&row1[a..]);
                    c11 = load_f32x4(&row1[b..]);
                    cell = tx.i0;
                }
                let fx = _mm_set1_ps(tx.frac);
                store_f32x4(blerp_f32x4_fma(c00, c10, c01, c11, fx, fy), px);
            }
        }
    }
}

/// Fill a window of a 4-channel float field with the reversed-weight blend.
///
/// The taps carry the weights of the right and bottom samples, as for the
/// other drivers.
///
/// # Safety
/// - Caller must ensure SSE2 is available.
#[target_feature(enable = "sse2")]
pub unsafe fn blerp_rows_f32x4_rev(
    src: &[f32],
    src_stride: usize,
    dst: &mut [f32],
    dst_stride: usize,
    window: Window<'_, f32>,
) {
    unsafe {
        for (dst_row, ty) in dst.chunks_mut(dst_stride).zip(window.rows) {
            let row0 = &src[ty.i0 * src_stride..];
            let row1 = &src[ty.i1 * src_stride..];
            let wy = _mm_set1_ps(1.0 - ty.frac);

            let zero = _mm_setzero_ps();
            let (mut c00, mut c10, mut c01, mut c11) = (zero, zero, zero, zero);
            let mut cell = usize::MAX;

            for (px, tx) in dst_row[window.x0 * 4..].chunks_exact_mut(4).zip(window.cols) {
                if tx.i0 != cell {
                    let (a, b) = (tx.i0 * 4, tx.i1 * 4);
                    c00 = load_f32x4(&row0[a..]);
                    c10 = load_f32x4(&row0[b..]);
                    c01 = load_f32x4(&row1[a..]);
                    c11 = load_f32x4(&row1[b..]);
                    cell = tx.i0;
                }
                let wx = _mm_set1_ps(1.0 - tx.frac);
                store_f32x4(blerp_f32x4_rev(c00, c10, c01, c11, wx, wy), px);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lerp;
    use crate::simd::cpu_features;

    #[test]
    fn avx2_lanes_match_scalar() {
        if !cpu_features::has_avx2() {
            return;
        }
        let s = [0u32, 255, u32::MAX, 123_456_789];
        let e = [u32::MAX, 0, 1, 987_654_321];
        let mut out = [0u32; 4];
        for f in [0u32, 1, 0x8000_0000, 0xdead_beef, u32::MAX] {
            unsafe {
                let v = lerp_u32x4(
                    loadlo_4x32(&s),
                    loadlo_4x32(&e),
                    _mm256_set1_epi64x(f as i64),
                );
                storelo_4x32(v, &mut out);
            }
            for i in 0..4 {
                assert_eq!(out[i], lerp::lerp_u32(s[i], e[i], Fraction(f)));
            }
        }
    }

    #[test]
    fn sse41_bytes_match_scalar() {
        if !cpu_features::has_sse4_1() {
            return;
        }
        let (c00, c10, c01, c11) = ([0u8, 10, 255, 77], [255u8, 20, 255, 3], [0u8, 30, 0, 140], [255u8, 40, 255, 9]);
        let mut out = [0u32; 4];
        for (tx, ty) in [(0, 0), (Q12_ONE / 2, Q12_ONE / 2), (1, 4095)] {
            unsafe {
                let v = blerp_q12x4(
                    loadlo_4x8(&c00),
                    loadlo_4x8(&c10),
                    loadlo_4x8(&c01),
                    loadlo_4x8(&c11),
                    tx,
                    ty,
                );
                _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, v);
            }
            for i in 0..4 {
                assert_eq!(out[i], lerp::blerp_q12(c00[i], c10[i], c01[i], c11[i], tx, ty));
            }
        }
    }

    #[test]
    fn float_lanes_match_scalar() {
        let (c00, c10, c01, c11) = (
            [0.0f32, 0.25, 1.0, -3.0],
            [1.0f32, 0.5, 0.0, 7.5],
            [0.5f32, 0.75, 1.0, 2.0],
            [0.125f32, 1.0, 0.0, -1.0],
        );
        let (tx, ty) = (0.3f32, 0.8f32);
        let mut plain = [0f32; 4];
        let mut rev = [0f32; 4];
        unsafe {
            let (a, b, c, d) = (load_f32x4(&c00), load_f32x4(&c10), load_f32x4(&c01), load_f32x4(&c11));
            store_f32x4(blerp_f32x4(a, b, c, d, _mm_set1_ps(tx), _mm_set1_ps(ty)), &mut plain);
            store_f32x4(
                blerp_f32x4_rev(a, b, c, d, _mm_set1_ps(1.0 - tx), _mm_set1_ps(1.0 - ty)),
                &mut rev,
            );
        }
        for i in 0..4 {
            assert_eq!(plain[i], lerp::blerp_f32(c00[i], c10[i], c01[i], c11[i], tx, ty));
            assert_eq!(rev[i], lerp::blerp_f32_rev(c00[i], c10[i], c01[i], c11[i], 1.0 - tx, 1.0 - ty));
        }

        if cpu_features::has_fma() {
            let mut fused = [0f32; 4];
            unsafe {
                let (a, b, c, d) = (load_f32x4(&c00), load_f32x4(&c10), load_f32x4(&c01), load_f32x4(&c11));
                store_f32x4(blerp_f32x4_fma(a, b, c, d, _mm_set1_ps(tx), _mm_set1_ps(ty)), &mut fused);
            }
            for i in 0..4 {
                assert_eq!(fused[i], lerp::blerp_f32_fma(c00[i], c10[i], c01[i], c11[i], tx, ty));
            }
        }
    }
}
