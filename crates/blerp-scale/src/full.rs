//! Pixel-centre-aligned upscaling with explicit edges and corners.
//!
//! The destination splits into nine regions. Pixels whose source coordinate
//! lies inside the source on both axes are blended from four samples. The
//! side margins only need the first or last source column, the top and bottom
//! margins the first or last source row, and the corner blocks are constant.

use std::ops::Range;

use blerp_field::{FieldError, ValueField};

use crate::grid::{HalfPixelAxis, Tap, Window};
use crate::lerp;
use crate::scale::{blerp_rows_f32x4_rev, check_sizes};
use crate::simd::portable::{load_f32x4, F32x4};

/// Upscale a 4-channel float field sampling at pixel centres.
///
/// Destination pixel `x` samples source coordinate `(x + 0.5) sw / dw - 0.5`.
/// Coordinates outside the source are clamped to its edges, so destination
/// corners equal source corners when upscaling, and a destination of the
/// source size is a copy.
///
/// # Arguments
///
/// * `src` - The source field, at least 1x1.
/// * `dst` - The destination field, written in place.
///
/// # Errors
///
/// Returns [`FieldError::FieldTooSmall`] if either field is empty.
///
/// # Example
///
/// ```
/// use blerp_field::ValueField;
/// use blerp_scale::full::scale_blerp_full;
///
/// let src = ValueField::<f32, 4>::new(
///     [2, 1].into(),
///     vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0],
/// )
/// .unwrap();
/// let mut dst = ValueField::<f32, 4>::zeros([4, 2].into()).unwrap();
///
/// scale_blerp_full(&src, &mut dst).unwrap();
///
/// assert_eq!(dst.pixel(0, 1), Some(&[0.0, 0.0, 0.0, 1.0]));
/// assert_eq!(dst.pixel(1, 0), Some(&[0.25, 0.25, 0.25, 1.0]));
/// assert_eq!(dst.pixel(3, 1), Some(&[1.0; 4]));
/// ```
pub fn scale_blerp_full(
    src: &ValueField<f32, 4>,
    dst: &mut ValueField<f32, 4>,
) -> Result<(), FieldError> {
    check_sizes(src.size(), dst.size(), 1)?;

    if src.size() == dst.size() {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Ok(());
    }

    let xs = HalfPixelAxis::new(src.width(), dst.width());
    let ys = HalfPixelAxis::new(src.height(), dst.height());
    let (inner_x, inner_y) = (xs.inner(), ys.inner());

    log::trace!(
        "full blerp {} -> {}: inner columns {inner_x:?}, inner rows {inner_y:?}",
        src.size(),
        dst.size()
    );

    let cols: Vec<Tap<f32>> = (0..dst.width()).map(|x| xs.tap(x)).collect();
    let rows: Vec<Tap<f32>> = (0..dst.height()).map(|y| ys.tap(y)).collect();

    let (sw, sh) = (src.width(), src.height());
    let (dw, dh) = (dst.width(), dst.height());
    let (src_stride, dst_stride) = (src.row_stride(), dst.row_stride());
    let src_data = src.as_slice();
    let dst_data = dst.as_slice_mut();

    let px = |x: usize, y: usize| load_f32x4(&src_data[y * src_stride + x * 4..]);

    // inner
    blerp_rows_f32x4_rev(
        src_data,
        src_stride,
        &mut dst_data[inner_y.start * dst_stride..],
        dst_stride,
        Window {
            x0: inner_x.start,
            rows: &rows[inner_y.clone()],
            cols: &cols[inner_x.clone()],
        },
    );

    let (left, right) = (0..inner_x.start, inner_x.end..dw);
    let (top, bottom) = (0..inner_y.start, inner_y.end..dh);

    // side margins
    for (span, col) in [(left.clone(), 0), (right.clone(), sw - 1)] {
        fill_rect(dst_data, dst_stride, span, inner_y.clone(), |_, y| {
            let t = rows[y];
            edge_lerp(px(col, t.i0), px(col, t.i1), t.frac)
        });
    }

    // top and bottom margins
    for (span, row) in [(top.clone(), 0), (bottom.clone(), sh - 1)] {
        fill_rect(dst_data, dst_stride, inner_x.clone(), span, |x, _| {
            let t = cols[x];
            edge_lerp(px(t.i0, row), px(t.i1, row), t.frac)
        });
    }

    // corners
    for (span_x, span_y, corner) in [
        (left.clone(), top.clone(), px(0, 0)),
        (right.clone(), top, px(sw - 1, 0)),
        (left, bottom.clone(), px(0, sh - 1)),
        (right, bottom, px(sw - 1, sh - 1)),
    ] {
        fill_rect(dst_data, dst_stride, span_x, span_y, |_, _| corner);
    }

    Ok(())
}

/// Lerp two edge pixels, `frac` being the weight of `b`.
#[inline]
fn edge_lerp(a: F32x4, b: F32x4, frac: f32) -> F32x4 {
    let w = 1.0 - frac;
    std::array::from_fn(|k| lerp::lerp_f32_rev(a[k], b[k], w))
}

fn fill_rect(
    dst: &mut [f32],
    dst_stride: usize,
    xs: Range<usize>,
    ys: Range<usize>,
    mut value: impl FnMut(usize, usize) -> F32x4,
) {
    for y in ys {
        let row = &mut dst[y * dst_stride..(y + 1) * dst_stride];
        for x in xs.clone() {
            row[x * 4..(x + 1) * 4].copy_from_slice(&value(x, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(width: usize, height: usize) -> Result<ValueField<f32, 4>, FieldError> {
        let data = (0..width * height * 4)
            .map(|i| ((i * 53) % 97) as f32 / 96.0)
            .collect();
        ValueField::new([width, height].into(), data)
    }

    // every pixel blended from clamped centre taps, no regions
    fn reference(src: &ValueField<f32, 4>, dst: &mut ValueField<f32, 4>) {
        let xs = HalfPixelAxis::new(src.width(), dst.width());
        let ys = HalfPixelAxis::new(src.height(), dst.height());
        let px = |x: usize, y: usize| load_f32x4(&src.as_slice()[(y * src.width() + x) * 4..]);
        for y in 0..dst.height() {
            let ty = ys.tap(y);
            for x in 0..dst.width() {
                let tx = xs.tap(x);
                let (c00, c10) = (px(tx.i0, ty.i0), px(tx.i1, ty.i0));
                let (c01, c11) = (px(tx.i0, ty.i1), px(tx.i1, ty.i1));
                if let Some(out) = dst.pixel_mut(x, y) {
                    for k in 0..4 {
                        out[k] = lerp::blerp_f32_rev(
                            c00[k],
                            c10[k],
                            c01[k],
                            c11[k],
                            1.0 - tx.frac,
                            1.0 - ty.frac,
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn regions_match_clamped_blend() -> Result<(), FieldError> {
        let cases: [([usize; 2], [usize; 2]); 4] = [
            ([4, 3], [32, 24]),
            ([5, 5], [7, 13]),
            ([2, 2], [3, 3]),
            ([6, 4], [6, 9]),
        ];
        for (src_size, dst_size) in cases {
            let src = pattern(src_size[0], src_size[1])?;
            let mut dst = ValueField::<f32, 4>::zeros(dst_size.into())?;
            let mut expected = ValueField::<f32, 4>::zeros(dst_size.into())?;

            scale_blerp_full(&src, &mut dst)?;
            reference(&src, &mut expected);
            assert_eq!(dst, expected, "{src_size:?} -> {dst_size:?}");
        }
        Ok(())
    }

    #[test]
    fn corners_are_exact() -> Result<(), FieldError> {
        let src = pattern(4, 3)?;
        let mut dst = ValueField::<f32, 4>::zeros([32, 24].into())?;
        scale_blerp_full(&src, &mut dst)?;

        assert_eq!(dst.pixel(0, 0), src.pixel(0, 0));
        assert_eq!(dst.pixel(31, 0), src.pixel(3, 0));
        assert_eq!(dst.pixel(0, 23), src.pixel(0, 2));
        assert_eq!(dst.pixel(31, 23), src.pixel(3, 2));

        // the whole 4x4 corner block holds the corner value
        for (x, y) in [(3, 0), (0, 3), (3, 3)] {
            assert_eq!(dst.pixel(x, y), src.pixel(0, 0));
        }
        Ok(())
    }

    #[test]
    fn same_size_copies() -> Result<(), FieldError> {
        let src = pattern(9, 2)?;
        let mut dst = ValueField::<f32, 4>::zeros(src.size())?;
        scale_blerp_full(&src, &mut dst)?;
        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn single_pixel_source() -> Result<(), FieldError> {
        let src = ValueField::<f32, 4>::new([1, 1].into(), vec![0.1, 0.2, 0.3, 0.4])?;
        let mut dst = ValueField::<f32, 4>::zeros([5, 3].into())?;
        scale_blerp_full(&src, &mut dst)?;
        assert!(dst
            .as_slice()
            .chunks_exact(4)
            .all(|px| px == [0.1, 0.2, 0.3, 0.4]));
        Ok(())
    }

    #[test]
    fn rejects_empty_fields() -> Result<(), FieldError> {
        let src = ValueField::<f32, 4>::zeros([0, 4].into())?;
        let mut dst = ValueField::<f32, 4>::zeros([4, 4].into())?;
        assert!(matches!(
            scale_blerp_full(&src, &mut dst),
            Err(FieldError::FieldTooSmall { width: 0, height: 4, .. })
        ));
        Ok(())
    }
}
