//! Bilinear upscaling of vector-valued fields.
//!
//! A [`field::ValueField`] holds `C` interleaved channels per pixel as floats,
//! full-scale 32-bit fixed point or bytes. The scalers in [`scale`] fill a
//! larger destination field from it, each with a different arithmetic
//! strategy: scalar float, 32-bit fractions, Q12 bytes and four-lane SIMD.
//!
//! ```
//! use blerp::field::ValueField;
//! use blerp::scale::ScaleVariant;
//! use blerp::scale::ScaleBuffers;
//!
//! let src = ValueField::<f32, 4>::from_size_val([37, 37].into(), 0.5).unwrap();
//! let mut buffers = ScaleBuffers::new(src, [296, 296].into()).unwrap();
//!
//! for variant in ScaleVariant::ALL {
//!     buffers.run(variant).unwrap();
//! }
//! ```

#[doc(inline)]
pub use blerp_field as field;

#[doc(inline)]
pub use blerp_scale as scale;
