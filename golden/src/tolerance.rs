//! Element-kind promotion and the per-kind tolerance table.

use golden_types::{ElementKind, ToleranceProfile};

/// Common kind of two operands, following NumPy's `promote_types` over the
/// supported kinds. Integers need float64 to be represented exactly, so
/// `int32` with `float32` promotes to `float64`.
pub fn promote(a: ElementKind, b: ElementKind) -> ElementKind {
    use ElementKind::*;

    if a == b {
        return a;
    }

    match (a, b) {
        (Int32, Int64) | (Int64, Int32) => return Int64,
        _ => {}
    }

    let complex = a.is_complex() || b.is_complex();
    let wide = float_bits(a).max(float_bits(b)) == 64;
    match (complex, wide) {
        (true, true) => Complex128,
        (true, false) => Complex64,
        (false, true) => Float64,
        (false, false) => Float32,
    }
}

fn float_bits(kind: ElementKind) -> u32 {
    match kind {
        ElementKind::Float32 | ElementKind::Complex64 => 32,
        ElementKind::Float64 | ElementKind::Complex128 => 64,
        ElementKind::Int32 | ElementKind::Int64 => 64,
    }
}

/// Picks the kind whose tolerance applies to a comparison of `a` against `b`:
/// whichever operand is not the promoted kind. When `a` is already the
/// promoted kind, `b` is chosen.
pub fn resolve_kind(a: ElementKind, b: ElementKind) -> ElementKind {
    if promote(a, b) == a {
        b
    } else {
        a
    }
}

pub fn profile_for(kind: ElementKind) -> ToleranceProfile {
    let (relative, absolute) = match kind {
        ElementKind::Float32 => (1e-5, 1e-8),
        ElementKind::Float64 => (1e-10, 1e-12),
        ElementKind::Complex64 => (1e-5, 1e-8),
        ElementKind::Complex128 => (1e-10, 1e-12),
        _ => (1e-5, 1e-8),
    };
    ToleranceProfile { relative, absolute }
}

pub fn scaled(profile: ToleranceProfile, scale_factor: f64) -> ToleranceProfile {
    ToleranceProfile {
        relative: profile.relative * scale_factor,
        absolute: profile.absolute * scale_factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ElementKind::*;

    #[test]
    fn test_promotion_table() {
        assert_eq!(promote(Float32, Float64), Float64);
        assert_eq!(promote(Float32, Complex64), Complex64);
        assert_eq!(promote(Float64, Complex64), Complex128);
        assert_eq!(promote(Complex64, Complex128), Complex128);
        assert_eq!(promote(Int32, Float32), Float64);
        assert_eq!(promote(Int64, Complex64), Complex128);
        assert_eq!(promote(Int32, Int64), Int64);
        assert_eq!(promote(Complex64, Complex64), Complex64);
    }

    #[test]
    fn test_promotion_is_symmetric() {
        let kinds = [Float32, Float64, Complex64, Complex128, Int32, Int64];
        for &a in &kinds {
            for &b in &kinds {
                assert_eq!(promote(a, b), promote(b, a), "{:?} {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_resolve_picks_the_side_that_is_not_promoted() {
        // float64 is the promoted kind, so the float32 side wins either way round
        assert_eq!(resolve_kind(Float32, Float64), Float32);
        assert_eq!(resolve_kind(Float64, Float32), Float32);
        assert_eq!(resolve_kind(Complex64, Complex128), Complex64);
        assert_eq!(resolve_kind(Complex128, Complex128), Complex128);
        // neither side equals complex128, so `a` is kept
        assert_eq!(resolve_kind(Float64, Complex64), Float64);
        assert_eq!(resolve_kind(Complex64, Float64), Complex64);
    }

    #[test]
    fn test_profile_lookup() {
        assert_eq!(
            profile_for(Float32),
            ToleranceProfile { relative: 1e-5, absolute: 1e-8 }
        );
        assert_eq!(
            profile_for(Complex128),
            ToleranceProfile { relative: 1e-10, absolute: 1e-12 }
        );
        assert_eq!(profile_for(Int64), profile_for(Float32));
    }

    #[test]
    fn test_scaled() {
        let p = scaled(profile_for(Float64), 1000.0);
        assert!((p.relative - 1e-7).abs() < 1e-20);
        assert!((p.absolute - 1e-9).abs() < 1e-22);
    }
}
