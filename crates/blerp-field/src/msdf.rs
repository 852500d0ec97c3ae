//! Multi-channel signed distance field helpers.

use crate::error::FieldError;
use crate::field::ValueField;

/// Median of three values.
///
/// # Examples
///
/// ```
/// use blerp_field::msdf::median3;
///
/// assert_eq!(median3(0.2, 0.9, 0.5), 0.5);
/// ```
#[inline]
pub fn median3(a: f32, b: f32, c: f32) -> f32 {
    a.min(b).max(a.max(b).min(c))
}

/// Reduce a 3-channel MSDF to the single-channel distance field it encodes.
///
/// # Arguments
///
/// * `src` - The multi-channel distance field.
/// * `dst` - The scalar distance field, same size as `src`.
///
/// # Errors
///
/// If `src` and `dst` differ in size, an error is returned.
pub fn median_field(src: &ValueField<f32, 3>, dst: &mut ValueField<f32, 1>) -> Result<(), FieldError> {
    if src.size() != dst.size() {
        return Err(FieldError::InvalidFieldSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    src.as_slice()
        .chunks_exact(3)
        .zip(dst.as_slice_mut().iter_mut())
        .for_each(|(px, out)| *out = median3(px[0], px[1], px[2]));

    Ok(())
}
