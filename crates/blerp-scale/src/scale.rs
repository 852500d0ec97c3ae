use blerp_field::{FieldError, FieldSize, ValueField};

use crate::fixed::Fraction;
use crate::grid::{blend_window, FixedAxis, FloatAxis, Tap, Window};
use crate::lerp;
use crate::simd::{self, portable, Backend};

#[cfg(target_arch = "x86_64")]
use crate::simd::x86;

/// Smallest source width and height the corner-aligned scalers accept.
pub const MIN_SOURCE_SIZE: usize = 2;

/// Check that a source and destination size can be scaled.
///
/// # Errors
///
/// Returns [`FieldError::FieldTooSmall`] if the source is narrower or shorter
/// than `min_src`, or if the destination is empty.
pub(crate) fn check_sizes(src: FieldSize, dst: FieldSize, min_src: usize) -> Result<(), FieldError> {
    if src.width < min_src || src.height < min_src {
        return Err(FieldError::FieldTooSmall {
            width: src.width,
            height: src.height,
            min_width: min_src,
            min_height: min_src,
        });
    }

    if dst.width == 0 || dst.height == 0 {
        return Err(FieldError::FieldTooSmall {
            width: dst.width,
            height: dst.height,
            min_width: 1,
            min_height: 1,
        });
    }

    Ok(())
}

type Taps<F> = (Vec<Tap<F>>, Vec<Tap<F>>);

fn fixed_taps(src: FieldSize, dst: FieldSize) -> Taps<Fraction> {
    (
        FixedAxis::new(src.height, dst.height).collect(),
        FixedAxis::new(src.width, dst.width).collect(),
    )
}

fn float_taps(src: FieldSize, dst: FieldSize) -> Taps<f32> {
    (
        FloatAxis::new(src.height, dst.height).collect(),
        FloatAxis::new(src.width, dst.width).collect(),
    )
}

#[inline]
fn load_pixel<T: Copy, const C: usize>(src: &[T]) -> [T; C] {
    std::array::from_fn(|k| src[k])
}

/// Upscale a float field with scalar bilinear interpolation.
///
/// Destination corners sample source corners; a destination the size of the
/// source reproduces it.
///
/// # Arguments
///
/// * `src` - The source field, at least 2x2.
/// * `dst` - The destination field, written in place.
///
/// # Errors
///
/// Returns [`FieldError::FieldTooSmall`] if the source is smaller than 2x2 or
/// the destination is empty.
///
/// # Example
///
/// ```
/// use blerp_field::ValueField;
/// use blerp_scale::scale::scale_blerp;
///
/// let src = ValueField::<f32, 1>::new([2, 2].into(), vec![0.0, 255.0, 0.0, 255.0]).unwrap();
/// let mut dst = ValueField::<f32, 1>::zeros([3, 3].into()).unwrap();
///
/// scale_blerp(&src, &mut dst).unwrap();
///
/// assert_eq!(dst.get(1, 1, 0).unwrap(), 127.5);
/// ```
pub fn scale_blerp<const C: usize>(
    src: &ValueField<f32, C>,
    dst: &mut ValueField<f32, C>,
) -> Result<(), FieldError> {
    check_sizes(src.size(), dst.size(), MIN_SOURCE_SIZE)?;

    let (rows, cols) = float_taps(src.size(), dst.size());
    let (src_stride, dst_stride) = (src.row_stride(), dst.row_stride());

    blend_window::<_, _, _, _, C>(
        src.as_slice(),
        src_stride,
        dst.as_slice_mut(),
        dst_stride,
        Window::full(&rows, &cols),
        load_pixel::<f32, C>,
        |[c00, c10, c01, c11], tx, ty, px| {
            for (k, out) in px.iter_mut().enumerate() {
                *out = lerp::blerp_f32(c00[k], c10[k], c01[k], c11[k], tx, ty);
            }
        },
    );

    Ok(())
}

/// Upscale a full-scale fixed-point field with [`lerp::blerp_u32`].
///
/// # Errors
///
/// Returns [`FieldError::FieldTooSmall`] if the source is smaller than 2x2 or
/// the destination is empty.
pub fn scale_blerp_fixed<const C: usize>(
    src: &ValueField<u32, C>,
    dst: &mut ValueField<u32, C>,
) -> Result<(), FieldError> {
    check_sizes(src.size(), dst.size(), MIN_SOURCE_SIZE)?;

    let (rows, cols) = fixed_taps(src.size(), dst.size());
    let (src_stride, dst_stride) = (src.row_stride(), dst.row_stride());

    blend_window::<_, _, _, _, C>(
        src.as_slice(),
        src_stride,
        dst.as_slice_mut(),
        dst_stride,
        Window::full(&rows, &cols),
        load_pixel::<u32, C>,
        |[c00, c10, c01, c11], fx, fy, px| {
            for (k, out) in px.iter_mut().enumerate() {
                *out = lerp::blerp_u32(c00[k], c10[k], c01[k], c11[k], fx, fy);
            }
        },
    );

    Ok(())
}

/// Upscale a full-scale fixed-point field with the product-of-weights blend.
///
/// Within a few units of [`scale_blerp_fixed`].
///
/// # Errors
///
/// Returns [`FieldError::FieldTooSmall`] if the source is smaller than 2x2 or
/// the destination is empty.
pub fn scale_blerp_fixed_weights<const C: usize>(
    src: &ValueField<u32, C>,
    dst: &mut ValueField<u32, C>,
) -> Result<(), FieldError> {
    check_sizes(src.size(), dst.size(), MIN_SOURCE_SIZE)?;

    let (rows, cols) = fixed_taps(src.size(), dst.size());
    let (src_stride, dst_stride) = (src.row_stride(), dst.row_stride());

    blend_window::<_, _, _, _, C>(
        src.as_slice(),
        src_stride,
        dst.as_slice_mut(),
        dst_stride,
        Window::full(&rows, &cols),
        load_pixel::<u32, C>,
        |[c00, c10, c01, c11], fx, fy, px| {
            for (k, out) in px.iter_mut().enumerate() {
                *out = lerp::blerp_u32_weights(c00[k], c10[k], c01[k], c11[k], fx, fy);
            }
        },
    );

    Ok(())
}

/// Upscale a byte field with Q12 weights.
///
/// The destination holds the blended bytes widened to `u32`.
///
/// # Errors
///
/// Returns [`FieldError::FieldTooSmall`] if the source is smaller than 2x2 or
/// the destination is empty.
pub fn scale_blerp_q12<const C: usize>(
    src: &ValueField<u8, C>,
    dst: &mut ValueField<u32, C>,
) -> Result<(), FieldError> {
    check_sizes(src.size(), dst.size(), MIN_SOURCE_SIZE)?;

    let (rows, cols) = fixed_taps(src.size(), dst.size());
    let (src_stride, dst_stride) = (src.row_stride(), dst.row_stride());

    blend_window::<_, _, _, _, C>(
        src.as_slice(),
        src_stride,
        dst.as_slice_mut(),
        dst_stride,
        Window::full(&rows, &cols),
        load_pixel::<u8, C>,
        |[c00, c10, c01, c11], fx, fy, px| {
            let (tx, ty) = (fx.to_q12(), fy.to_q12());
            for (k, out) in px.iter_mut().enumerate() {
                *out = lerp::blerp_q12(c00[k], c10[k], c01[k], c11[k], tx, ty);
            }
        },
    );

    Ok(())
}

/// Upscale a 4-channel float field four lanes at a time, with FMA when available.
///
/// Matches [`lerp::blerp_f32_fma`] per sample on FMA hardware and off x86_64,
/// and [`lerp::blerp_f32`] on x86_64 without FMA.
///
/// # Errors
///
/// Returns [`FieldError::FieldTooSmall`] if the source is smaller than 2x2 or
/// the destination is empty.
pub fn scale_blerp_f32x4(
    src: &ValueField<f32, 4>,
    dst: &mut ValueField<f32, 4>,
) -> Result<(), FieldError> {
    check_sizes(src.size(), dst.size(), MIN_SOURCE_SIZE)?;

    let (rows, cols) = float_taps(src.size(), dst.size());
    let (src_stride, dst_stride) = (src.row_stride(), dst.row_stride());
    let window = Window::full(&rows, &cols);
    let (src, dst) = (src.as_slice(), dst.as_slice_mut());

    match simd::f32x4_backend() {
        #[cfg(target_arch = "x86_64")]
        Backend::Fma => unsafe {
            // SAFETY: FMA was detected at runtime.
            x86::blerp_rows_f32x4_fma(src, src_stride, dst, dst_stride, window)
        },
        #[cfg(target_arch = "x86_64")]
        Backend::Sse2 => unsafe {
            // SAFETY: SSE2 was detected at runtime.
            x86::blerp_rows_f32x4(src, src_stride, dst, dst_stride, window)
        },
        _ => portable::blerp_rows_f32x4_fma(src, src_stride, dst, dst_stride, window),
    }

    Ok(())
}

/// Upscale a 4-channel float field four lanes at a time with the reversed-weight blend.
///
/// Matches [`lerp::blerp_f32_rev`] per sample.
///
/// # Errors
///
/// Returns [`FieldError::FieldTooSmall`] if the source is smaller than 2x2 or
/// the destination is empty.
pub fn scale_blerp_f32x4_rev(
    src: &ValueField<f32, 4>,
    dst: &mut ValueField<f32, 4>,
) -> Result<(), FieldError> {
    check_sizes(src.size(), dst.size(), MIN_SOURCE_SIZE)?;

    let (rows, cols) = float_taps(src.size(), dst.size());
    let (src_stride, dst_stride) = (src.row_stride(), dst.row_stride());
    blerp_rows_f32x4_rev(
        src.as_slice(),
        src_stride,
        dst.as_slice_mut(),
        dst_stride,
        Window::full(&rows, &cols),
    );

    Ok(())
}

/// Fill a window of `dst` with the reversed-weight blend on the best backend.
pub(crate) fn blerp_rows_f32x4_rev(
    src: &[f32],
    src_stride: usize,
    dst: &mut [f32],
    dst_stride: usize,
    window: Window<'_, f32>,
) {
    match simd::f32x4_rev_backend() {
        #[cfg(target_arch = "x86_64")]
        Backend::Sse2 => unsafe {
            // SAFETY: SSE2 was detected at runtime.
            x86::blerp_rows_f32x4_rev(src, src_stride, dst, dst_stride, window)
        },
        _ => portable::blerp_rows_f32x4_rev(src, src_stride, dst, dst_stride, window),
    }
}

/// Upscale a 4-channel fixed-point field with 64-bit lanes.
///
/// Bit-identical to [`scale_blerp_fixed`].
///
/// # Errors
///
/// Returns [`FieldError::FieldTooSmall`] if the source is smaller than 2x2 or
/// the destination is empty.
pub fn scale_blerp_u32x4(
    src: &ValueField<u32, 4>,
    dst: &mut ValueField<u32, 4>,
) -> Result<(), FieldError> {
    check_sizes(src.size(), dst.size(), MIN_SOURCE_SIZE)?;

    let (rows, cols) = fixed_taps(src.size(), dst.size());
    let (src_stride, dst_stride) = (src.row_stride(), dst.row_stride());
    let window = Window::full(&rows, &cols);
    let (src, dst) = (src.as_slice(), dst.as_slice_mut());

    match simd::u32x4_backend() {
        #[cfg(target_arch = "x86_64")]
        Backend::Avx2 => unsafe {
            // SAFETY: AVX2 was detected at runtime.
            x86::blerp_rows_u32x4(src, src_stride, dst, dst_stride, window)
        },
        _ => portable::blerp_rows_u32x4(src, src_stride, dst, dst_stride, window),
    }

    Ok(())
}

/// Upscale a 4-channel byte field with Q12 weights in 32-bit lanes.
///
/// Bit-identical to [`scale_blerp_q12`].
///
/// # Errors
///
/// Returns [`FieldError::FieldTooSmall`] if the source is smaller than 2x2 or
/// the destination is empty.
pub fn scale_blerp_u8x4(
    src: &ValueField<u8, 4>,
    dst: &mut ValueField<u32, 4>,
) -> Result<(), FieldError> {
    check_sizes(src.size(), dst.size(), MIN_SOURCE_SIZE)?;

    let (rows, cols) = fixed_taps(src.size(), dst.size());
    let (src_stride, dst_stride) = (src.row_stride(), dst.row_stride());
    let window = Window::full(&rows, &cols);
    let (src, dst) = (src.as_slice(), dst.as_slice_mut());

    match simd::u8x4_backend() {
        #[cfg(target_arch = "x86_64")]
        Backend::Sse41 => unsafe {
            // SAFETY: SSE4.1 was detected at runtime.
            x86::blerp_rows_u8x4(src, src_stride, dst, dst_stride, window)
        },
        _ => portable::blerp_rows_u8x4(src, src_stride, dst, dst_stride, window),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use blerp_field::FieldDtype;

    fn ramp<const C: usize>(width: usize, height: usize) -> Result<ValueField<f32, C>, FieldError> {
        let n = width * height * C;
        let data = (0..n).map(|i| ((i * 37) % 101) as f32 / 100.0).collect();
        ValueField::new([width, height].into(), data)
    }

    fn centre_example<T: FieldDtype, const C: usize>(
        lo: T,
        hi: T,
    ) -> Result<ValueField<T, C>, FieldError> {
        let data = [lo, hi, lo, hi].iter().flat_map(|&v| [v; C]).collect();
        ValueField::new([2, 2].into(), data)
    }

    #[test]
    fn centre_of_two_by_two() -> Result<(), FieldError> {
        let src = centre_example::<u32, 1>(0, 255)?;
        let mut dst = ValueField::<u32, 1>::zeros([3, 3].into())?;
        scale_blerp_fixed(&src, &mut dst)?;
        assert_eq!(dst.as_slice(), &[0, 127, 255, 0, 127, 255, 0, 127, 255]);

        scale_blerp_fixed_weights(&src, &mut dst)?;
        assert_eq!(dst.get(0, 0, 0)?, 0);
        assert!(dst.get(1, 1, 0)?.abs_diff(127) <= 1);

        let src = centre_example::<f32, 3>(0.0, 255.0)?;
        let mut dst = ValueField::<f32, 3>::zeros([3, 3].into())?;
        scale_blerp(&src, &mut dst)?;
        assert_eq!(dst.pixel(1, 1), Some(&[127.5; 3]));

        let src = centre_example::<u8, 2>(0, 255)?;
        let mut dst = ValueField::<u32, 2>::zeros([3, 3].into())?;
        scale_blerp_q12(&src, &mut dst)?;
        assert_eq!(dst.pixel(1, 1), Some(&[128; 2]));
        assert_eq!(dst.pixel(2, 2), Some(&[255; 2]));

        let src = centre_example::<u32, 4>(0, 255)?;
        let mut dst = ValueField::<u32, 4>::zeros([3, 3].into())?;
        scale_blerp_u32x4(&src, &mut dst)?;
        assert_eq!(dst.pixel(1, 1), Some(&[127; 4]));

        let src = centre_example::<f32, 4>(0.0, 255.0)?;
        let mut dst = ValueField::<f32, 4>::zeros([3, 3].into())?;
        scale_blerp_f32x4(&src, &mut dst)?;
        assert_eq!(dst.pixel(1, 1), Some(&[127.5; 4]));
        scale_blerp_f32x4_rev(&src, &mut dst)?;
        assert_eq!(dst.pixel(1, 1), Some(&[127.5; 4]));
        Ok(())
    }

    #[test]
    fn identity_reproduces_source() -> Result<(), FieldError> {
        let src = ramp::<4>(5, 3)?;
        let mut dst = ValueField::<f32, 4>::zeros(src.size())?;

        scale_blerp(&src, &mut dst)?;
        assert_eq!(dst, src);
        scale_blerp_f32x4(&src, &mut dst)?;
        assert_eq!(dst, src);
        scale_blerp_f32x4_rev(&src, &mut dst)?;
        assert_eq!(dst, src);

        let fixed = blerp_field::convert::to_fixed(&src)?;
        let mut out = ValueField::<u32, 4>::zeros(src.size())?;
        scale_blerp_fixed(&fixed, &mut out)?;
        assert_eq!(out, fixed);
        scale_blerp_u32x4(&fixed, &mut out)?;
        assert_eq!(out, fixed);

        let bytes = blerp_field::convert::to_u8(&src)?;
        scale_blerp_u8x4(&bytes, &mut out)?;
        let widened: Vec<u32> = bytes.as_slice().iter().map(|&v| v as u32).collect();
        assert_eq!(out.as_slice(), widened.as_slice());
        Ok(())
    }

    #[test]
    fn corners_map_to_corners() -> Result<(), FieldError> {
        let src = ramp::<3>(7, 4)?;
        let mut dst = ValueField::<f32, 3>::zeros([50, 21].into())?;
        scale_blerp(&src, &mut dst)?;

        for (sx, sy, dx, dy) in [(0, 0, 0, 0), (6, 0, 49, 0), (0, 3, 0, 20), (6, 3, 49, 20)] {
            assert_eq!(dst.pixel(dx, dy), src.pixel(sx, sy));
        }
        Ok(())
    }

    #[test]
    fn vector_variants_match_scalar() -> Result<(), FieldError> {
        let src = ramp::<4>(9, 6)?;
        let size = [61, 40].into();

        let mut expected = ValueField::<f32, 4>::zeros(size)?;
        scale_blerp(&src, &mut expected)?;
        let mut actual = ValueField::<f32, 4>::zeros(size)?;
        scale_blerp_f32x4(&src, &mut actual)?;
        for (&a, &b) in actual.as_slice().iter().zip(expected.as_slice()) {
            assert_relative_eq!(a, b, epsilon = 1e-5);
        }
        scale_blerp_f32x4_rev(&src, &mut actual)?;
        for (&a, &b) in actual.as_slice().iter().zip(expected.as_slice()) {
            assert_relative_eq!(a, b, epsilon = 1e-5);
        }

        let fixed = blerp_field::convert::to_fixed(&src)?;
        let mut expected = ValueField::<u32, 4>::zeros(size)?;
        let mut actual = ValueField::<u32, 4>::zeros(size)?;
        scale_blerp_fixed(&fixed, &mut expected)?;
        scale_blerp_u32x4(&fixed, &mut actual)?;
        assert_eq!(actual, expected);

        let bytes = blerp_field::convert::to_u8(&src)?;
        scale_blerp_q12(&bytes, &mut expected)?;
        scale_blerp_u8x4(&bytes, &mut actual)?;
        assert_eq!(actual, expected);
        Ok(())
    }

    #[test]
    fn downscale_is_accepted() -> Result<(), FieldError> {
        let src = ramp::<1>(10, 10)?;
        let mut dst = ValueField::<f32, 1>::zeros([4, 1].into())?;
        scale_blerp(&src, &mut dst)?;
        assert_eq!(dst.get(0, 0, 0)?, src.get(0, 0, 0)?);
        assert_eq!(dst.get(3, 0, 0)?, src.get(9, 0, 0)?);
        Ok(())
    }

    #[test]
    fn rejects_small_fields() -> Result<(), FieldError> {
        let src = ValueField::<u32, 4>::zeros([1, 5].into())?;
        let mut dst = ValueField::<u32, 4>::zeros([8, 8].into())?;
        assert_eq!(
            scale_blerp_u32x4(&src, &mut dst),
            Err(FieldError::FieldTooSmall {
                width: 1,
                height: 5,
                min_width: 2,
                min_height: 2
            })
        );

        let src = ValueField::<u32, 4>::zeros([2, 2].into())?;
        let mut empty = ValueField::<u32, 4>::zeros([0, 3].into())?;
        assert_eq!(
            scale_blerp_fixed(&src, &mut empty),
            Err(FieldError::FieldTooSmall {
                width: 0,
                height: 3,
                min_width: 1,
                min_height: 1
            })
        );
        Ok(())
    }
}
