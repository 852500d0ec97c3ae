//! Four-lane lerp and blerp primitives.
//!
//! Two backends share one set of operations:
//! - [`x86`]: SSE2, SSE4.1, AVX2 and FMA intrinsics on x86_64
//! - [`portable`]: lane arrays, used when the CPU lacks a feature or the
//!   target is not x86_64
//!
//! Integer results are bit-identical between the backends and the scalar
//! kernels in [`crate::lerp`].

pub mod cpu_features;

pub mod portable;

#[cfg(target_arch = "x86_64")]
pub mod x86;

/// The implementation a vector scaler dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// 256-bit integer lanes.
    Avx2,
    /// 128-bit lanes with 32-bit multiplies.
    Sse41,
    /// 128-bit float lanes with fused multiply-add.
    Fma,
    /// 128-bit float lanes.
    Sse2,
    /// Lane arrays.
    Portable,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Backend::Avx2 => "avx2",
            Backend::Sse41 => "sse4.1",
            Backend::Fma => "fma",
            Backend::Sse2 => "sse2",
            Backend::Portable => "portable",
        };
        write!(f, "{name}")
    }
}

/// Backend used for 4-channel `u32` fields.
pub fn u32x4_backend() -> Backend {
    if cpu_features::has_avx2() {
        Backend::Avx2
    } else {
        Backend::Portable
    }
}

/// Backend used for 4-channel byte fields.
pub fn u8x4_backend() -> Backend {
    if cpu_features::has_sse4_1() {
        Backend::Sse41
    } else {
        Backend::Portable
    }
}

/// Backend used for the fused 4-channel float blend.
///
/// Without FMA this falls back to the SSE2 blend rather than to lane arrays,
/// trading the fused rounding for speed.
pub fn f32x4_backend() -> Backend {
    if cpu_features::has_fma() {
        Backend::Fma
    } else if cpu_features::has_sse2() {
        Backend::Sse2
    } else {
        Backend::Portable
    }
}

/// Backend used for the reversed-weight 4-channel float blend.
pub fn f32x4_rev_backend() -> Backend {
    if cpu_features::has_sse2() {
        Backend::Sse2
    } else {
        Backend::Portable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backends_follow_features() {
        let features = cpu_features::get();
        assert_eq!(u32x4_backend() == Backend::Avx2, features.avx2);
        assert_eq!(u8x4_backend() == Backend::Sse41, features.sse4_1);
        assert_eq!(f32x4_backend() == Backend::Fma, features.fma);
        assert_eq!(Backend::Sse41.to_string(), "sse4.1");
    }
}
