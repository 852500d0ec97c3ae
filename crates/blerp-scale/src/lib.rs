#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// fixed-point fractions.
pub mod fixed;

/// scalar lerp and blerp kernels.
pub mod lerp;

/// destination to source coordinate mapping.
pub mod grid;

/// four-lane SIMD primitives and drivers.
pub mod simd;

/// corner-aligned field scalers.
pub mod scale;

/// pixel-centre-aligned scaler with explicit edges.
pub mod full;

/// scaler selection by name.
pub mod variant;

pub use crate::full::scale_blerp_full;
pub use crate::scale::{
    scale_blerp, scale_blerp_f32x4, scale_blerp_f32x4_rev, scale_blerp_fixed,
    scale_blerp_fixed_weights, scale_blerp_q12, scale_blerp_u32x4, scale_blerp_u8x4,
};
pub use crate::variant::{ScaleBuffers, ScaleVariant};
