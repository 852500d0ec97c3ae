//! Lane-array backend.
//!
//! Mirrors the x86 primitives on plain arrays. Integer lanes wrap exactly like
//! their vector counterparts, so both backends produce the same bits.

use crate::fixed::Fraction;
use crate::grid::{blend_window, Window};
use crate::lerp;

/// Four 64-bit integer lanes.
pub type U64x4 = [u64; 4];

/// Four 32-bit integer lanes.
pub type U32x4 = [u32; 4];

/// Four float lanes.
pub type F32x4 = [f32; 4];

/// Widen the first four `u32` values of `src` into 64-bit lanes.
#[inline]
pub fn loadlo_4x32(src: &[u32]) -> U64x4 {
    std::array::from_fn(|i| src[i] as u64)
}

/// Store the low 32 bits of each lane into the first four values of `dst`.
#[inline]
pub fn storelo_4x32(v: U64x4, dst: &mut [u32]) {
    for (out, lane) in dst[..4].iter_mut().zip(v) {
        *out = lane as u32;
    }
}

/// Widen the first four bytes of `src` into 32-bit lanes.
#[inline]
pub fn loadlo_4x8(src: &[u8]) -> U32x4 {
    std::array::from_fn(|i| src[i] as u32)
}

/// Load the first four floats of `src`.
#[inline]
pub fn load_f32x4(src: &[f32]) -> F32x4 {
    std::array::from_fn(|i| src[i])
}

/// `((s << 32) + f e - f s) >> 32` per lane, in wrapping 64-bit arithmetic.
#[inline]
pub fn lerp_u32x4(s: U64x4, e: U64x4, f: Fraction) -> U64x4 {
    let f = f.raw() as u64;
    std::array::from_fn(|i| {
        (s[i] << 32)
            .wrapping_add(f.wrapping_mul(e[i]))
            .wrapping_sub(f.wrapping_mul(s[i]))
            >> 32
    })
}

/// Bilinear blend of four 64-bit lane groups.
#[inline]
pub fn blerp_u32x4(
    c00: U64x4,
    c10: U64x4,
    c01: U64x4,
    c11: U64x4,
    fx: Fraction,
    fy: Fraction,
) -> U64x4 {
    lerp_u32x4(lerp_u32x4(c00, c10, fx), lerp_u32x4(c01, c11, fx), fy)
}

/// `s (Q12_ONE - t) + e t` per lane.
#[inline]
pub fn lerp_q12x4(s: U32x4, e: U32x4, t: u32) -> U32x4 {
    std::array::from_fn(|i| lerp::lerp_q12(s[i], e[i], t))
}

/// Q12 bilinear blend of byte-valued lanes, rounded back to the byte scale.
#[inline]
pub fn blerp_q12x4(c00: U32x4, c10: U32x4, c01: U32x4, c11: U32x4, tx: u32, ty: u32) -> U32x4 {
    let v = lerp_q12x4(lerp_q12x4(c00, c10, tx), lerp_q12x4(c01, c11, tx), ty);
    v.map(|v| (v + (1 << 23)) >> 24)
}

/// Bilinear blend of four float lanes, `s + (e - s) t`.
#[inline]
pub fn blerp_f32x4(c00: F32x4, c10: F32x4, c01: F32x4, c11: F32x4, tx: f32, ty: f32) -> F32x4 {
    std::array::from_fn(|i| lerp::blerp_f32(c00[i], c10[i], c01[i], c11[i], tx, ty))
}

/// Bilinear blend of four float lanes with fused multiply-adds.
#[inline]
pub fn blerp_f32x4_fma(
    c00: F32x4,
    c10: F32x4,
    c01: F32x4,
    c11: F32x4,
    tx: f32,
    ty: f32,
) -> F32x4 {
    std::array::from_fn(|i| lerp::blerp_f32_fma(c00[i], c10[i], c01[i], c11[i], tx, ty))
}

/// Bilinear blend of four float lanes, `wx` and `wy` weighting the left and top samples.
#[inline]
pub fn blerp_f32x4_rev(
    c00: F32x4,
    c10: F32x4,
    c01: F32x4,
    c11: F32x4,
    wx: f32,
    wy: f32,
) -> F32x4 {
    std::array::from_fn(|i| lerp::blerp_f32_rev(c00[i], c10[i], c01[i], c11[i], wx, wy))
}

/// Fill a window of a 4-channel `u32` field.
pub fn blerp_rows_u32x4(
    src: &[u32],
    src_stride: usize,
    dst: &mut [u32],
    dst_stride: usize,
    window: Window<'_, Fraction>,
) {
    blend_window::<_, _, _, _, 4>(
        src,
        src_stride,
        dst,
        dst_stride,
        window,
        loadlo_4x32,
        |[c00, c10, c01, c11], fx, fy, px| {
            storelo_4x32(blerp_u32x4(*c00, *c10, *c01, *c11, fx, fy), px)
        },
    );
}

/// Fill a window of a 4-channel `u32` field from a 4-channel byte field.
pub fn blerp_rows_u8x4(
    src: &[u8],
    src_stride: usize,
    dst: &mut [u32],
    dst_stride: usize,
    window: Window<'_, Fraction>,
) {
    blend_window::<_, _, _, _, 4>(
        src,
        src_stride,
        dst,
        dst_stride,
        window,
        loadlo_4x8,
        |[c00, c10, c01, c11], fx, fy, px| {
            let v = blerp_q12x4(*c00, *c10, *c01, *c11, fx.to_q12(), fy.to_q12());
            px.copy_from_slice(&v);
        },
    );
}

/// Fill a window of a 4-channel float field, `s + (e - s) t`.
pub fn blerp_rows_f32x4(
    src: &[f32],
    src_stride: usize,
    dst: &mut [f32],
    dst_stride: usize,
    window: Window<'_, f32>,
) {
    blend_window::<_, _, _, _, 4>(
        src,
        src_stride,
        dst,
        dst_stride,
        window,
        load_f32x4,
        |[c00, c10, c01, c11], tx, ty, px| {
            px.copy_from_slice(&blerp_f32x4(*c00, *c10, *c01, *c11, tx, ty));
        },
    );
}

/// Fill a window of a 4-channel float field with fused multiply-adds.
pub fn blerp_rows_f32x4_fma(
    src: &[f32],
    src_stride: usize,
    dst: &mut [f32],
    dst_stride: usize,
    window: Window<'_, f32>,
) {
    blend_window::<_, _, _, _, 4>(
        src,
        src_stride,
        dst,
        dst_stride,
        window,
        load_f32x4,
        |[c00, c10, c01, c11], tx, ty, px| {
            px.copy_from_slice(&blerp_f32x4_fma(*c00, *c10, *c01, *c11, tx, ty));
        },
    );
}

/// Fill a window of a 4-channel float field with the reversed-weight blend.
///
/// The taps carry the weights of the right and bottom samples, as for the
/// other drivers.
pub fn blerp_rows_f32x4_rev(
    src: &[f32],
    src_stride: usize,
    dst: &mut [f32],
    dst_stride: usize,
    window: Window<'_, f32>,
) {
    blend_window::<_, _, _, _, 4>(
        src,
        src_stride,
        dst,
        dst_stride,
        window,
        load_f32x4,
        |[c00, c10, c01, c11], tx, ty, px| {
            let v = blerp_f32x4_rev(*c00, *c10, *c01, *c11, 1.0 - tx, 1.0 - ty);
            px.copy_from_slice(&v);
        },
    );
}
