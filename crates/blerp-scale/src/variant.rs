use std::fmt;
use std::str::FromStr;

use blerp_field::{convert, FieldError, FieldSize, ValueField};

use crate::full::scale_blerp_full;
use crate::scale::{
    scale_blerp, scale_blerp_f32x4, scale_blerp_f32x4_rev, scale_blerp_fixed,
    scale_blerp_fixed_weights, scale_blerp_q12, scale_blerp_u32x4, scale_blerp_u8x4,
};
use crate::simd::{self, Backend};

/// Error returned when parsing an unknown variant name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown scale variant `{0}`, expected one of: {names}", names = ScaleVariant::names())]
pub struct ParseVariantError(
    /// The rejected name.
    pub String,
);

/// The interchangeable scalers, by name.
///
/// # Example
///
/// ```
/// use blerp_scale::variant::ScaleVariant;
///
/// let variant: ScaleVariant = "u32x4".parse().unwrap();
/// assert_eq!(variant, ScaleVariant::U32x4);
/// assert_eq!(variant.to_string(), "u32x4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleVariant {
    /// Scalar float, [`scale_blerp`].
    Blerp,
    /// Scalar 32-bit fraction, [`scale_blerp_fixed`].
    Fixed,
    /// Product-of-weights, [`scale_blerp_fixed_weights`].
    FixedWeights,
    /// Scalar Q12 bytes, [`scale_blerp_q12`].
    Q12,
    /// Four float lanes, [`scale_blerp_f32x4`].
    F32x4,
    /// Four float lanes with the reversed weight, [`scale_blerp_f32x4_rev`].
    F32x4Rev,
    /// Four 64-bit lanes, [`scale_blerp_u32x4`].
    U32x4,
    /// Four 32-bit Q12 lanes, [`scale_blerp_u8x4`].
    U8x4,
    /// Pixel-centre sampling with edges and corners, [`scale_blerp_full`].
    Full,
}

impl ScaleVariant {
    /// Every variant, scalar ones first.
    pub const ALL: [ScaleVariant; 9] = [
        ScaleVariant::Blerp,
        ScaleVariant::Fixed,
        ScaleVariant::FixedWeights,
        ScaleVariant::Q12,
        ScaleVariant::F32x4,
        ScaleVariant::F32x4Rev,
        ScaleVariant::U32x4,
        ScaleVariant::U8x4,
        ScaleVariant::Full,
    ];

    /// The name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ScaleVariant::Blerp => "blerp",
            ScaleVariant::Fixed => "fixed",
            ScaleVariant::FixedWeights => "fixed-weights",
            ScaleVariant::Q12 => "q12",
            ScaleVariant::F32x4 => "f32x4",
            ScaleVariant::F32x4Rev => "f32x4-rev",
            ScaleVariant::U32x4 => "u32x4",
            ScaleVariant::U8x4 => "u8x4",
            ScaleVariant::Full => "full",
        }
    }

    /// The SIMD backend the variant dispatches to, `None` for scalar variants.
    pub fn backend(self) -> Option<Backend> {
        match self {
            ScaleVariant::F32x4 => Some(simd::f32x4_backend()),
            ScaleVariant::F32x4Rev | ScaleVariant::Full => Some(simd::f32x4_rev_backend()),
            ScaleVariant::U32x4 => Some(simd::u32x4_backend()),
            ScaleVariant::U8x4 => Some(simd::u8x4_backend()),
            _ => None,
        }
    }

    fn names() -> String {
        Self::ALL.map(ScaleVariant::name).join(", ")
    }
}

impl fmt::Display for ScaleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScaleVariant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseVariantError(s.to_string()))
    }
}

/// Source and destination fields for every variant, built from one float field.
///
/// Each representation of the source is prepared once, so running a variant
/// only scales.
pub struct ScaleBuffers {
    src_f32: ValueField<f32, 4>,
    src_u32: ValueField<u32, 4>,
    src_u8: ValueField<u8, 4>,
    dst_f32: ValueField<f32, 4>,
    dst_u32: ValueField<u32, 4>,
}

impl ScaleBuffers {
    /// Prepare buffers scaling `src` to `dst_size`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::AllocationFailed`] if a destination field cannot
    /// be allocated.
    pub fn new(src: ValueField<f32, 4>, dst_size: FieldSize) -> Result<Self, FieldError> {
        let src_u32 = convert::to_fixed(&src)?;
        let src_u8 = convert::to_u8(&src)?;
        Ok(Self {
            src_f32: src,
            src_u32,
            src_u8,
            dst_f32: ValueField::try_from_size_val(dst_size, 0.0)?,
            dst_u32: ValueField::try_from_size_val(dst_size, 0)?,
        })
    }

    /// Scale the source with `variant`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::FieldTooSmall`] if the variant rejects the sizes.
    pub fn run(&mut self, variant: ScaleVariant) -> Result<(), FieldError> {
        match variant {
            ScaleVariant::Blerp => scale_blerp(&self.src_f32, &mut self.dst_f32),
            ScaleVariant::Fixed => scale_blerp_fixed(&self.src_u32, &mut self.dst_u32),
            ScaleVariant::FixedWeights => {
                scale_blerp_fixed_weights(&self.src_u32, &mut self.dst_u32)
            }
            ScaleVariant::Q12 => scale_blerp_q12(&self.src_u8, &mut self.dst_u32),
            ScaleVariant::F32x4 => scale_blerp_f32x4(&self.src_f32, &mut self.dst_f32),
            ScaleVariant::F32x4Rev => scale_blerp_f32x4_rev(&self.src_f32, &mut self.dst_f32),
            ScaleVariant::U32x4 => scale_blerp_u32x4(&self.src_u32, &mut self.dst_u32),
            ScaleVariant::U8x4 => scale_blerp_u8x4(&self.src_u8, &mut self.dst_u32),
            ScaleVariant::Full => scale_blerp_full(&self.src_f32, &mut self.dst_f32),
        }
    }

    /// The last result of `variant`, normalized back to `[0, 1]`.
    pub fn output(&self, variant: ScaleVariant) -> Result<ValueField<f32, 4>, FieldError> {
        match variant {
            ScaleVariant::Blerp
            | ScaleVariant::F32x4
            | ScaleVariant::F32x4Rev
            | ScaleVariant::Full => Ok(self.dst_f32.clone()),
            ScaleVariant::Fixed | ScaleVariant::FixedWeights | ScaleVariant::U32x4 => {
                convert::fixed_to_f32(&self.dst_u32)
            }
            ScaleVariant::Q12 | ScaleVariant::U8x4 => {
                let data = self
                    .dst_u32
                    .as_slice()
                    .iter()
                    .map(|&v| v as f32 / 255.0)
                    .collect();
                ValueField::new(self.dst_u32.size(), data)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() -> Result<(), ParseVariantError> {
        for variant in ScaleVariant::ALL {
            assert_eq!(variant.name().parse::<ScaleVariant>()?, variant);
        }
        assert_eq!("U32X4".parse::<ScaleVariant>()?, ScaleVariant::U32x4);

        let err = "bicubic".parse::<ScaleVariant>().err();
        assert_eq!(err, Some(ParseVariantError("bicubic".to_string())));
        let message = err.map(|e| e.to_string()).unwrap_or_default();
        assert!(message.contains("fixed-weights"));
        Ok(())
    }

    #[test]
    fn scalar_variants_have_no_backend() {
        assert_eq!(ScaleVariant::Blerp.backend(), None);
        assert_eq!(ScaleVariant::Q12.backend(), None);
        assert!(ScaleVariant::U32x4.backend().is_some());
    }

    #[test]
    fn every_variant_agrees_on_a_gradient() -> Result<(), FieldError> {
        let size: FieldSize = [4, 3].into();
        let data = (0..size.num_pixels())
            .flat_map(|i| {
                let v = i as f32 / 11.0;
                [v, 1.0 - v, 0.5, 1.0]
            })
            .collect();
        let src = ValueField::new(size, data)?;
        let mut buffers = ScaleBuffers::new(src, [13, 9].into())?;

        buffers.run(ScaleVariant::Blerp)?;
        let reference = buffers.output(ScaleVariant::Blerp)?;

        for variant in ScaleVariant::ALL {
            if variant == ScaleVariant::Full {
                continue;
            }
            buffers.run(variant)?;
            let out = buffers.output(variant)?;
            for (a, b) in out.as_slice().iter().zip(reference.as_slice()) {
                assert!((a - b).abs() < 1e-2, "{variant}: {a} vs {b}");
            }
        }
        Ok(())
    }
}
