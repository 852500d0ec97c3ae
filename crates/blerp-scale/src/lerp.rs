//! Scalar lerp and blerp kernels.
//!
//! Every kernel has the same shape: `lerp(s, e, t)` blends two samples and
//! `blerp(c00, c10, c01, c11, tx, ty)` lerps along x on both rows, then along y.
//! `c10` is the right neighbour of `c00` and `c01` the one below it.

use crate::fixed::{Fraction, Q12_ONE};

/// Fixed-point lerp, `s + f (e - s)` with a 32-bit fractional scale.
///
/// The product is formed in wrapping 64-bit arithmetic and truncated back to
/// 32 bits, so the result is `floor(s + f (e - s) / 2^32)`.
///
/// # Examples
///
/// ```
/// use blerp_scale::fixed::Fraction;
/// use blerp_scale::lerp::lerp_u32;
///
/// assert_eq!(lerp_u32(10, 20, Fraction::ZERO), 10);
/// assert_eq!(lerp_u32(0, 255, Fraction::from_f32(0.5)), 127);
/// assert_eq!(lerp_u32(255, 0, Fraction::from_f32(0.5)), 127);
/// ```
#[inline]
pub fn lerp_u32(s: u32, e: u32, f: Fraction) -> u32 {
    let delta = (e as u64).wrapping_sub(s as u64);
    s.wrapping_add(((f.raw() as u64).wrapping_mul(delta) >> 32) as u32)
}

/// Fixed-point bilinear blend built from three [`lerp_u32`].
///
/// # Arguments
///
/// * `c00`, `c10`, `c01`, `c11` - The four surrounding samples.
/// * `fx` - The horizontal weight of the right samples.
/// * `fy` - The vertical weight of the bottom samples.
#[inline]
pub fn blerp_u32(c00: u32, c10: u32, c01: u32, c11: u32, fx: Fraction, fy: Fraction) -> u32 {
    lerp_u32(lerp_u32(c00, c10, fx), lerp_u32(c01, c11, fx), fy)
}

/// Fixed-point bilinear blend as one weighted sum.
///
/// The four weights are the products of the fractions and their complements,
/// accumulated in 128 bits. Stays within a few units of [`blerp_u32`].
#[inline]
pub fn blerp_u32_weights(
    c00: u32,
    c10: u32,
    c01: u32,
    c11: u32,
    fx: Fraction,
    fy: Fraction,
) -> u32 {
    let (fxi, fyi) = (fx.complement().raw() as u64, fy.complement().raw() as u64);
    let (fx, fy) = (fx.raw() as u64, fy.raw() as u64);

    let w11 = (fx * fy) >> 32;
    let w01 = (fy * fxi) >> 32;
    let w10 = (fx * fyi) >> 32;
    let w00 = (fxi * fyi) >> 32;

    let sum = c11 as u128 * w11 as u128
        + c01 as u128 * w01 as u128
        + c10 as u128 * w10 as u128
        + c00 as u128 * w00 as u128;

    (sum >> 32) as u32
}

/// Q12 lerp, `s (1 - t) + e t` with `t` in `[0, Q12_ONE]`.
///
/// The result carries 12 more fractional bits than the inputs.
///
/// # Panics
///
/// Debug builds panic if `t > Q12_ONE`.
#[inline]
pub fn lerp_q12(s: u32, e: u32, t: u32) -> u32 {
    debug_assert!(t <= Q12_ONE, "Q12 weight {t} is above one");
    s * (Q12_ONE - t) + e * t
}

/// Q12 bilinear blend of four bytes, rounded back to the `0..=255` scale.
///
/// # Examples
///
/// ```
/// use blerp_scale::fixed::Q12_ONE;
/// use blerp_scale::lerp::blerp_q12;
///
/// let half = Q12_ONE / 2;
/// assert_eq!(blerp_q12(0, 255, 0, 255, half, half), 128);
/// assert_eq!(blerp_q12(0, 255, 0, 255, 0, half), 0);
/// ```
#[inline]
pub fn blerp_q12(c00: u8, c10: u8, c01: u8, c11: u8, fx: u32, fy: u32) -> u32 {
    let top = lerp_q12(c00 as u32, c10 as u32, fx);
    let bottom = lerp_q12(c01 as u32, c11 as u32, fx);
    (lerp_q12(top, bottom, fy) + (1 << 23)) >> 24
}

/// Float lerp, `s + (e - s) t`.
#[inline]
pub fn lerp_f32(s: f32, e: f32, t: f32) -> f32 {
    s + (e - s) * t
}

/// Float lerp with fused multiply-adds, `t e + (s - t s)`.
#[inline]
pub fn lerp_f32_fma(s: f32, e: f32, t: f32) -> f32 {
    t.mul_add(e, (-t).mul_add(s, s))
}

/// Float lerp parameterized by the weight of `s`, `w s + (e - w e)`.
#[inline]
pub fn lerp_f32_rev(s: f32, e: f32, w: f32) -> f32 {
    w * s + (e - w * e)
}

/// Float bilinear blend built from three [`lerp_f32`].
#[inline]
pub fn blerp_f32(c00: f32, c10: f32, c01: f32, c11: f32, tx: f32, ty: f32) -> f32 {
    lerp_f32(lerp_f32(c00, c10, tx), lerp_f32(c01, c11, tx), ty)
}

/// Float bilinear blend built from three [`lerp_f32_fma`].
#[inline]
pub fn blerp_f32_fma(c00: f32, c10: f32, c01: f32, c11: f32, tx: f32, ty: f32) -> f32 {
    lerp_f32_fma(lerp_f32_fma(c00, c10, tx), lerp_f32_fma(c01, c11, tx), ty)
}

/// Float bilinear blend built from three [`lerp_f32_rev`].
///
/// `wx` and `wy` are the weights of the left and top samples.
#[inline]
pub fn blerp_f32_rev(c00: f32, c10: f32, c01: f32, c11: f32, wx: f32, wy: f32) -> f32 {
    lerp_f32_rev(lerp_f32_rev(c00, c10, wx), lerp_f32_rev(c01, c11, wx), wy)
}
