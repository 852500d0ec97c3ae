#![deny(missing_docs)]
//! Value field types for bilinear field scaling.
//!
//! A value field is a rectangular grid of pixels, each holding `C` interleaved
//! channel samples. Fields come in three representations: normalized floats,
//! full-scale 32-bit fixed point and bytes.

/// value field representation.
pub mod field;

/// Error types for the field module.
pub mod error;

/// conversions between field representations.
pub mod convert;

/// multi-channel signed distance field helpers.
pub mod msdf;

pub use crate::error::FieldError;
pub use crate::field::{
    FieldDtype, FieldSize, ValueField, ValueFieldF32, ValueFieldI32, ValueFieldI8,
};
