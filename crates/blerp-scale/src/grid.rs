//! Destination-to-source coordinate mapping along one axis.
//!
//! A scaler walks the destination rows with one sampler and, for every row,
//! the destination columns with a clone of another. Each step yields a [`Tap`]:
//! the two source indices to blend and the weight of the second one.

use std::ops::Range;

use crate::fixed::{Fraction, FRACTION_BITS};

/// Two neighbouring source indices and the weight of `i1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tap<F> {
    /// The source index at or before the sample position.
    pub i0: usize,
    /// The next source index, clamped to the last one.
    pub i1: usize,
    /// The weight of `i1`.
    pub frac: F,
}

/// Corner-aligned sampler with a 32.32 fixed-point accumulator.
///
/// Destination index `x` samples source coordinate `x (src_len - 1) / (dst_len - 1)`.
/// The step is rounded up and the position clamped, so the last destination
/// index lands exactly on the last source index.
#[derive(Clone, Debug)]
pub struct FixedAxis {
    pos: u64,
    step: u64,
    end: u64,
    last: usize,
    remaining: usize,
}

impl FixedAxis {
    /// Create a sampler mapping `dst_len` destination indices onto `src_len` source ones.
    ///
    /// `src_len` must be at least 1.
    pub fn new(src_len: usize, dst_len: usize) -> Self {
        let last = src_len.saturating_sub(1);
        let end = (last as u64) << FRACTION_BITS;
        let step = match dst_len {
            0 | 1 => 0,
            n => end.div_ceil(n as u64 - 1),
        };
        Self {
            pos: 0,
            step,
            end,
            last,
            remaining: dst_len,
        }
    }
}

impl Iterator for FixedAxis {
    type Item = Tap<Fraction>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let pos = self.pos.min(self.end);
        self.pos = self.pos.saturating_add(self.step);

        let i0 = (pos >> FRACTION_BITS) as usize;
        Some(Tap {
            i0,
            i1: (i0 + 1).min(self.last),
            frac: Fraction::new(pos as u32),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for FixedAxis {}

/// Corner-aligned sampler in floating point.
///
/// Maps like [`FixedAxis`]. The position `x last / (dst_len - 1)` is split
/// into cell and remainder in integers, and only the remainder is divided in
/// `f32`, so the end points and every index of an identity mapping land
/// exactly on source indices whatever the field size.
#[derive(Clone, Debug)]
pub struct FloatAxis {
    last: usize,
    denom: usize,
    range: Range<usize>,
}

impl FloatAxis {
    /// Create a sampler mapping `dst_len` destination indices onto `src_len` source ones.
    pub fn new(src_len: usize, dst_len: usize) -> Self {
        Self {
            last: src_len.saturating_sub(1),
            denom: dst_len.saturating_sub(1).max(1),
            range: 0..dst_len,
        }
    }
}

impl Iterator for FloatAxis {
    type Item = Tap<f32>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.range.next()?;
        let pos = x * self.last;
        let i0 = pos / self.denom;
        Some(Tap {
            i0,
            i1: (i0 + 1).min(self.last),
            frac: (pos % self.denom) as f32 / self.denom as f32,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl ExactSizeIterator for FloatAxis {}

/// Pixel-centre-aligned sampler with explicit margins.
///
/// Destination index `x` samples source coordinate `(x + 0.5) src / dst - 0.5`.
/// Indices whose coordinate falls before the first or after the last source
/// index form the start and end margins; [`HalfPixelAxis::inner`] is the rest.
#[derive(Clone, Debug)]
pub struct HalfPixelAxis {
    scale: f32,
    last: usize,
    inner: Range<usize>,
}

impl HalfPixelAxis {
    /// Create a sampler mapping `dst_len` destination indices onto `src_len` source ones.
    pub fn new(src_len: usize, dst_len: usize) -> Self {
        let last = src_len.saturating_sub(1);
        let scale = match dst_len {
            0 => 0.0,
            n => src_len as f32 / n as f32,
        };
        let coord = |x: usize| (x as f32 + 0.5) * scale - 0.5;

        let start = (0..dst_len)
            .find(|&x| coord(x) >= 0.0)
            .unwrap_or(dst_len);
        let end = (start..dst_len)
            .find(|&x| coord(x) > last as f32)
            .unwrap_or(dst_len);

        Self {
            scale,
            last,
            inner: start..end,
        }
    }

    /// Destination indices sampling between the first and last source index.
    pub fn inner(&self) -> Range<usize> {
        self.inner.clone()
    }

    /// Tap for destination index `x`, its coordinate clamped into the source.
    #[inline]
    pub fn tap(&self, x: usize) -> Tap<f32> {
        let pos = ((x as f32 + 0.5) * self.scale - 0.5).clamp(0.0, self.last as f32);
        let i0 = pos as usize;
        Tap {
            i0,
            i1: (i0 + 1).min(self.last),
            frac: pos - i0 as f32,
        }
    }
}

/// A rectangle of destination pixels and the taps that fill it.
///
/// Row `j` of the window is destination row `j` of the slice handed to a
/// driver; column `i` is destination pixel `x0 + i` of that row.
#[derive(Clone, Copy, Debug)]
pub struct Window<'a, F> {
    /// First destination column written.
    pub x0: usize,
    /// One tap per window row.
    pub rows: &'a [Tap<F>],
    /// One tap per window column.
    pub cols: &'a [Tap<F>],
}

impl<'a, F> Window<'a, F> {
    /// A window covering whole destination rows.
    pub fn full(rows: &'a [Tap<F>], cols: &'a [Tap<F>]) -> Self {
        Self { x0: 0, rows, cols }
    }
}

/// Walk a window, blending the four source pixels around every tap pair.
///
/// `load` reads one `C`-channel source pixel from the start of a slice into
/// whatever form `blend` works on. The four loads are reused while
/// consecutive columns stay in the same source cell.
pub(crate) fn blend_window<S, P, F, D, const C: usize>(
    src: &[S],
    src_stride: usize,
    dst: &mut [D],
    dst_stride: usize,
    window: Window<'_, F>,
    load: impl Fn(&[S]) -> P,
    mut blend: impl FnMut([&P; 4], F, F, &mut [D]),
) where
    F: Copy,
{
    for (dst_row, ty) in dst.chunks_mut(dst_stride).zip(window.rows) {
        let row0 = &src[ty.i0 * src_stride..];
        let row1 = &src[ty.i1 * src_stride..];

        let mut cell: Option<(usize, [P; 4])> = None;
        for (px, tx) in dst_row[window.x0 * C..]
            .chunks_exact_mut(C)
            .zip(window.cols)
        {
            if cell.as_ref().map(|(i0, _)| *i0) != Some(tx.i0) {
                let (a, b) = (tx.i0 * C, tx.i1 * C);
                cell = Some((
                    tx.i0,
                    [load(&row0[a..]), load(&row0[b..]), load(&row1[a..]), load(&row1[b..])],
                ));
            }
            if let Some((_, [c00, c10, c01, c11])) = &cell {
                blend([c00, c10, c01, c11], tx.frac, ty.frac, px);
            }
        }
    }
}
