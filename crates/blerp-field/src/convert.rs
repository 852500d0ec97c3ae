//! Conversions between field representations.
//!
//! Normalized float fields hold values in `[0, 1]`. The fixed-point form maps
//! that range onto the full `u32` range and the byte form onto `0..=255`.

use crate::error::FieldError;
use crate::field::{FieldSize, ValueField};

/// Convert a normalized float field to full-scale 32-bit fixed point.
///
/// Values outside `[0, 1]` are clamped.
///
/// # Examples
///
/// ```
/// use blerp_field::{convert, ValueField};
///
/// let field = ValueField::<f32, 1>::new([2, 1].into(), vec![0.0, 1.0]).unwrap();
/// let fixed = convert::to_fixed(&field).unwrap();
///
/// assert_eq!(fixed.as_slice(), &[0, u32::MAX]);
/// ```
pub fn to_fixed<const C: usize>(src: &ValueField<f32, C>) -> Result<ValueField<u32, C>, FieldError> {
    let data = src
        .as_slice()
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) as f64 * u32::MAX as f64) as u32)
        .collect();
    ValueField::new(src.size(), data)
}

/// Convert a full-scale 32-bit fixed-point field back to normalized floats.
pub fn fixed_to_f32<const C: usize>(
    src: &ValueField<u32, C>,
) -> Result<ValueField<f32, C>, FieldError> {
    let data = src
        .as_slice()
        .iter()
        .map(|&v| (v as f64 / u32::MAX as f64) as f32)
        .collect();
    ValueField::new(src.size(), data)
}

/// Convert a normalized float field to bytes.
///
/// Values outside `[0, 1]` are clamped.
pub fn to_u8<const C: usize>(src: &ValueField<f32, C>) -> Result<ValueField<u8, C>, FieldError> {
    let data = src
        .as_slice()
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0) as u8)
        .collect();
    ValueField::new(src.size(), data)
}

/// Build a normalized 3-channel field from a packed RGBA8 buffer, dropping alpha.
///
/// # Errors
///
/// If the buffer is not `width * height * 4` bytes long, an error is returned.
pub fn rgb_from_rgba8(size: FieldSize, pixels: &[u8]) -> Result<ValueField<f32, 3>, FieldError> {
    check_rgba8_len(size, pixels)?;
    let data = pixels
        .chunks_exact(4)
        .flat_map(|px| px[..3].iter().map(|&v| v as f32 / 255.0))
        .collect();
    ValueField::new(size, data)
}

/// Build a normalized 4-channel field from a packed RGBA8 buffer.
///
/// # Errors
///
/// If the buffer is not `width * height * 4` bytes long, an error is returned.
pub fn rgba_from_rgba8(size: FieldSize, pixels: &[u8]) -> Result<ValueField<f32, 4>, FieldError> {
    check_rgba8_len(size, pixels)?;
    let data = pixels.iter().map(|&v| v as f32 / 255.0).collect();
    ValueField::new(size, data)
}

/// Pack a normalized 3- or 4-channel field into an RGBA8 buffer.
///
/// Alpha is set to 255 when the field has no fourth channel.
pub fn to_rgba8<const C: usize>(src: &ValueField<f32, C>) -> Vec<u8> {
    let quantize = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u8;

    let mut out = Vec::with_capacity(src.num_pixels() * 4);
    for px in src.as_slice().chunks_exact(C) {
        for k in 0..4 {
            out.push(match px.get(k) {
                Some(&v) => quantize(v),
                None if k == 3 => u8::MAX,
                None => 0,
            });
        }
    }
    out
}

fn check_rgba8_len(size: FieldSize, pixels: &[u8]) -> Result<(), FieldError> {
    let expected = size.num_pixels() * 4;
    if pixels.len() != expected {
        return Err(FieldError::InvalidChannelShape(pixels.len(), expected));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn fixed_round_trip_endpoints() -> Result<(), FieldError> {
        let field = ValueField::<f32, 2>::new([2, 1].into(), vec![0.0, 1.0, 0.5, 2.0])?;
        let fixed = to_fixed(&field)?;
        assert_eq!(fixed.as_slice()[0], 0);
        assert_eq!(fixed.as_slice()[1], u32::MAX);
        // clamped
        assert_eq!(fixed.as_slice()[3], u32::MAX);

        let back = fixed_to_f32(&fixed)?;
        assert_abs_diff_eq!(back.as_slice()[2], 0.5, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn bytes_clamp() -> Result<(), FieldError> {
        let field = ValueField::<f32, 1>::new([3, 1].into(), vec![-1.0, 0.5, 1.0])?;
        let bytes = to_u8(&field)?;
        assert_eq!(bytes.as_slice(), &[0, 127, 255]);
        Ok(())
    }

    #[test]
    fn rgba8_layouts() -> Result<(), FieldError> {
        let pixels = [255u8, 0, 51, 255, 0, 255, 0, 0];

        let rgb = rgb_from_rgba8([2, 1].into(), &pixels)?;
        assert_eq!(rgb.as_slice(), &[1.0, 0.0, 0.2, 0.0, 1.0, 0.0]);
        assert_eq!(to_rgba8(&rgb), vec![255, 0, 51, 255, 0, 255, 0, 255]);

        let rgba = rgba_from_rgba8([2, 1].into(), &pixels)?;
        assert_eq!(to_rgba8(&rgba), pixels.to_vec());

        assert_eq!(
            rgba_from_rgba8([3, 1].into(), &pixels),
            Err(FieldError::InvalidChannelShape(8, 12))
        );
        Ok(())
    }
}
