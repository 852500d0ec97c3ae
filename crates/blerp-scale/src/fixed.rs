/// Number of fractional bits of a [`Fraction`].
pub const FRACTION_BITS: u32 = 32;

/// Number of fractional bits of the byte path weights.
pub const Q12_BITS: u32 = 12;

/// 1.0 in Q12.
pub const Q12_ONE: u32 = 1 << Q12_BITS;

/// A fixed-point fraction in `[0, 1)`, representing `value / 2^32`.
///
/// # Examples
///
/// ```
/// use blerp_scale::fixed::Fraction;
///
/// let half = Fraction::from_f32(0.5);
/// assert_eq!(half.raw(), 1 << 31);
/// assert_eq!(half.to_f32(), 0.5);
/// assert_eq!(half.complement().raw(), (1 << 31) - 1);
/// ```
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fraction(pub u32);

impl Fraction {
    /// 0.0
    pub const ZERO: Self = Self(0);

    /// The largest representable fraction, `1 - 2^-32`.
    pub const MAX: Self = Self(u32::MAX);

    /// Wrap a raw `value / 2^32` fraction.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw numerator over `2^32`.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Convert from a float, clamping to `[0, MAX]`.
    pub fn from_f32(v: f32) -> Self {
        let scaled = v.clamp(0.0, 1.0) as f64 * (1u64 << FRACTION_BITS) as f64;
        Self(scaled.min(u32::MAX as f64) as u32)
    }

    /// Convert to a float in `[0, 1)`.
    pub fn to_f32(self) -> f32 {
        (self.0 as f64 / (1u64 << FRACTION_BITS) as f64) as f32
    }

    /// `MAX - self`, the weight of the opposite sample.
    #[inline]
    pub const fn complement(self) -> Self {
        Self(u32::MAX - self.0)
    }

    /// The fraction `num / den`, or `None` unless `num < den`.
    pub fn ratio(num: u64, den: u64) -> Option<Self> {
        if num >= den {
            return None;
        }
        let raw = ((num as u128) << FRACTION_BITS) / den as u128;
        Some(Self(raw as u32))
    }

    /// Truncate to a Q12 weight in `[0, Q12_ONE)`.
    #[inline]
    pub const fn to_q12(self) -> u32 {
        self.0 >> (FRACTION_BITS - Q12_BITS)
    }
}

impl From<Fraction> for f32 {
    fn from(f: Fraction) -> f32 {
        f.to_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_from_f32() {
        assert_eq!(Fraction::from_f32(0.0), Fraction::ZERO);
        assert_eq!(Fraction::from_f32(-3.0), Fraction::ZERO);
        assert_eq!(Fraction::from_f32(1.0), Fraction::MAX);
        assert_eq!(Fraction::from_f32(0.25).raw(), 1 << 30);
        assert_eq!(Fraction::from_f32(0.75).to_f32(), 0.75);
    }

    #[test]
    fn fraction_ratio() {
        assert_eq!(Fraction::ratio(1, 2), Some(Fraction(1 << 31)));
        assert_eq!(Fraction::ratio(1, 3), Some(Fraction(0x5555_5555)));
        let f: f32 = Fraction::ratio(36, 296).unwrap_or_default().into();
        assert!((f - 36.0 / 296.0).abs() < 1e-7);
        assert_eq!(Fraction::ratio(3, 3), None);
        assert_eq!(Fraction::ratio(0, 0), None);
    }

    #[test]
    fn fraction_q12() {
        assert_eq!(Fraction::ZERO.to_q12(), 0);
        assert_eq!(Fraction::from_f32(0.5).to_q12(), Q12_ONE / 2);
        assert_eq!(Fraction::MAX.to_q12(), Q12_ONE - 1);
    }
}
