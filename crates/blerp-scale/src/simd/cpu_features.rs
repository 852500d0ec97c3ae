//! Cached CPU feature detection for runtime SIMD dispatch.
//!
//! Detection runs once, on the first query; later queries read the cache.

/// The x86 features the vector scalers can use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct X86Features {
    /// 128-bit float and integer lanes.
    pub sse2: bool,
    /// 32-bit lane multiplies.
    pub sse4_1: bool,
    /// 256-bit integer lanes and cross-lane permutes.
    pub avx2: bool,
    /// Fused multiply-add.
    pub fma: bool,
}

#[cfg(target_arch = "x86_64")]
static FEATURES: std::sync::OnceLock<X86Features> = std::sync::OnceLock::new();

/// The detected features.
#[cfg(target_arch = "x86_64")]
#[inline]
pub fn get() -> X86Features {
    *FEATURES.get_or_init(|| {
        let features = X86Features {
            sse2: is_x86_feature_detected!("sse2"),
            sse4_1: is_x86_feature_detected!("sse4.1"),
            avx2: is_x86_feature_detected!("avx2"),
            fma: is_x86_feature_detected!("fma"),
        };
        log::debug!("detected cpu features: {features:?}");
        features
    })
}

/// The detected features, always empty off x86_64.
#[cfg(not(target_arch = "x86_64"))]
#[inline]
pub fn get() -> X86Features {
    X86Features::default()
}

/// Check if SSE2 is available.
#[inline]
pub fn has_sse2() -> bool {
    get().sse2
}

/// Check if SSE4.1 is available.
#[inline]
pub fn has_sse4_1() -> bool {
    get().sse4_1
}

/// Check if AVX2 is available.
#[inline]
pub fn has_avx2() -> bool {
    get().avx2
}

/// Check if FMA is available.
#[inline]
pub fn has_fma() -> bool {
    get().fma
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_is_stable() {
        assert_eq!(get(), get());
        #[cfg(target_arch = "x86_64")]
        assert!(has_sse2());
        #[cfg(not(target_arch = "x86_64"))]
        assert!(!has_sse2() && !has_sse4_1() && !has_avx2() && !has_fma());
    }
}
