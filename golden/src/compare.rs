use std::fmt;

use golden_types::{CompareOptions, ElementKind, ToleranceProfile};
use num_complex::Complex64;
use tracing::info;

use crate::array::NumericArray;
use crate::tolerance::{profile_for, resolve_kind, scaled};
use crate::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub matched: bool,
    /// Kind whose tolerance row was used.
    pub kind: ElementKind,
    /// Tolerance after `scale_factor` was applied.
    pub tolerance: ToleranceProfile,
    pub mismatched: usize,
    /// NaN when any difference is NaN.
    pub max_abs_diff: f64,
    /// Largest `|a - b| / |a|` over elements where `a` is nonzero.
    pub max_rel_diff: Option<f64>,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max_rel_diff {
            Some(rel) => write!(f, "relative error={:e}, ", rel)?,
            None => write!(f, "relative error=n/a, ")?,
        }
        write!(f, "abs error={:e}", self.max_abs_diff)
    }
}

/// Elementwise `|a - b| <= atol + rtol * |b|`, with the tolerance picked from
/// the element kinds of `a` and `b` and multiplied by `options.scale_factor`.
///
/// The diagnostics in the returned [`Comparison`] never influence `matched`.
/// Every call prints them to stdout as one `relative error=.., abs error=..`
/// line.
pub fn compare(
    a: &NumericArray,
    b: &NumericArray,
    options: &CompareOptions,
) -> Result<Comparison, Error> {
    if a.shape() != b.shape() {
        return Err(Error::ShapeMismatch {
            candidate: a.shape().to_vec(),
            golden: b.shape().to_vec(),
        });
    }

    let kind = resolve_kind(a.kind(), b.kind());
    let tolerance = scaled(profile_for(kind), options.scale_factor);

    let lhs = a.to_complex128();
    let rhs = b.to_complex128();

    let mut mismatched = 0usize;
    let mut max_abs_diff = 0.0f64;
    let mut max_rel_diff: Option<f64> = None;
    for (&x, &y) in lhs.iter().zip(rhs.iter()) {
        if !is_close(x, y, tolerance, options.treat_nan_as_equal) {
            mismatched += 1;
        }

        let diff = (x - y).norm();
        max_abs_diff = nan_max(max_abs_diff, diff);

        let denominator = x.norm();
        if denominator != 0.0 {
            let rel = diff / denominator;
            max_rel_diff = Some(max_rel_diff.map_or(rel, |m| nan_max(m, rel)));
        }
    }

    let matched = mismatched == 0;
    info!(
        kind = kind.name(),
        rtol = tolerance.relative,
        atol = tolerance.absolute,
        max_abs_diff,
        max_rel_diff = ?max_rel_diff,
        mismatched,
        matched,
        "compare"
    );

    let comparison = Comparison {
        matched,
        kind,
        tolerance,
        mismatched,
        max_abs_diff,
        max_rel_diff,
    };
    println!("{}", comparison);
    Ok(comparison)
}

/// `max` that keeps NaN, like NumPy's reductions.
fn nan_max(acc: f64, v: f64) -> f64 {
    if acc.is_nan() || v.is_nan() {
        f64::NAN
    } else {
        acc.max(v)
    }
}

fn is_close(x: Complex64, y: Complex64, tolerance: ToleranceProfile, equal_nan: bool) -> bool {
    let x_nan = x.re.is_nan() || x.im.is_nan();
    let y_nan = y.re.is_nan() || y.im.is_nan();
    if x_nan || y_nan {
        return equal_nan && x_nan && y_nan;
    }

    if x.is_finite() && y.is_finite() {
        (x - y).norm() <= tolerance.absolute + tolerance.relative * y.norm()
    } else {
        x == y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2, ArrayD, IxDyn};
    use num_complex::Complex32;

    fn f64s(values: &[f64]) -> NumericArray {
        NumericArray::from(arr1(values).into_dyn())
    }

    #[test]
    fn test_reflexive() {
        let a = NumericArray::from(arr2(&[[1.0f32, -2.5], [3.25, 1e6]]).into_dyn());
        let result = compare(&a, &a, &CompareOptions::default()).unwrap();
        assert!(result.matched);
        assert_eq!(result.max_abs_diff, 0.0);
        assert_eq!(result.max_rel_diff, Some(0.0));
    }

    #[test]
    fn test_all_zero_arrays_match() {
        let a = NumericArray::from(ArrayD::<f64>::zeros(IxDyn(&[3, 4])));
        let result = compare(&a, &a, &CompareOptions::default()).unwrap();
        assert!(result.matched);
        assert_eq!(result.max_rel_diff, None);
    }

    #[test]
    fn test_offset_within_absolute_tolerance() {
        // float64 at scale 1000: atol = 1e-9
        let a = f64s(&[1.0, -2.0, 0.5, 0.0]);
        let b = f64s(&[1.0 + 5e-10, -2.0 + 5e-10, 0.5 + 5e-10, 5e-10]);
        assert!(compare(&a, &b, &CompareOptions::default()).unwrap().matched);
    }

    #[test]
    fn test_large_offset_fails() {
        let a = f64s(&[1.0, -2.0, 0.5]);
        let b = f64s(&[2.0, -1.0, 1.5]);
        let result = compare(&a, &b, &CompareOptions::default()).unwrap();
        assert!(!result.matched);
        assert_eq!(result.mismatched, 3);
        assert!((result.max_abs_diff - 1.0).abs() < 1e-12);
        assert!((result.max_rel_diff.unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_float32_against_float64_uses_float32_profile() {
        let a = NumericArray::from(arr1(&[1.0f32, 2.0]).into_dyn());
        let b = f64s(&[1.005, 2.0]);
        let result = compare(&a, &b, &CompareOptions::default()).unwrap();
        assert_eq!(result.kind, ElementKind::Float32);
        assert!((result.tolerance.relative - 1e-2).abs() < 1e-15);
        assert!((result.tolerance.absolute - 1e-5).abs() < 1e-18);
        // would fail under the float64 row
        assert!(result.matched);
    }

    #[test]
    fn test_scale_factor_widens_band() {
        let a = f64s(&[1.0]);
        let b = f64s(&[1.0 + 1e-6]);
        assert!(!compare(&a, &b, &CompareOptions::default()).unwrap().matched);
        let loose = CompareOptions {
            scale_factor: 1e6,
            ..CompareOptions::default()
        };
        assert!(compare(&a, &b, &loose).unwrap().matched);
    }

    #[test]
    fn test_nan_pairs() {
        let a = f64s(&[f64::NAN, 1.0]);
        let result = compare(&a, &a, &CompareOptions::default()).unwrap();
        assert!(!result.matched);
        assert_eq!(result.mismatched, 1);

        let equal_nan = CompareOptions {
            treat_nan_as_equal: true,
            ..CompareOptions::default()
        };
        assert!(compare(&a, &a, &equal_nan).unwrap().matched);

        let b = f64s(&[0.0, 1.0]);
        assert!(!compare(&a, &b, &equal_nan).unwrap().matched);
    }

    #[test]
    fn test_complex_nan_in_one_component() {
        let a = NumericArray::from(arr1(&[Complex32::new(f32::NAN, 0.0)]).into_dyn());
        let b = NumericArray::from(arr1(&[Complex64::new(0.0, f64::NAN)]).into_dyn());
        let equal_nan = CompareOptions {
            treat_nan_as_equal: true,
            ..CompareOptions::default()
        };
        assert!(compare(&a, &b, &equal_nan).unwrap().matched);
    }

    #[test]
    fn test_nan_propagates_into_diagnostics() {
        let a = f64s(&[f64::NAN, 2.0]);
        let b = f64s(&[1.0, 2.0]);
        let result = compare(&a, &b, &CompareOptions::default()).unwrap();
        assert!(!result.matched);
        assert!(result.max_abs_diff.is_nan());
        assert!(result.max_rel_diff.unwrap().is_nan());

        // NaN in the reference side only: |a| is finite, the ratio is NaN
        let result = compare(&b, &a, &CompareOptions::default()).unwrap();
        assert!(result.max_abs_diff.is_nan());
        assert!(result.max_rel_diff.unwrap().is_nan());
    }

    #[test]
    fn test_report_line() {
        let a = f64s(&[2.0, 4.0]);
        let b = f64s(&[3.0, 4.0]);
        let result = compare(&a, &b, &CompareOptions::default()).unwrap();
        assert_eq!(result.to_string(), "relative error=5e-1, abs error=1e0");

        let zeros = NumericArray::from(ArrayD::<f64>::zeros(IxDyn(&[2])));
        let result = compare(&zeros, &zeros, &CompareOptions::default()).unwrap();
        assert_eq!(result.to_string(), "relative error=n/a, abs error=0e0");
    }

    #[test]
    fn test_infinities_match_only_when_equal() {
        let a = f64s(&[f64::INFINITY]);
        let b = f64s(&[f64::NEG_INFINITY]);
        assert!(compare(&a, &a, &CompareOptions::default()).unwrap().matched);
        assert!(!compare(&a, &b, &CompareOptions::default()).unwrap().matched);
    }

    #[test]
    fn test_relative_diff_skips_zero_denominators() {
        let a = f64s(&[0.0, 4.0]);
        let b = f64s(&[1.0, 5.0]);
        let result = compare(&a, &b, &CompareOptions::default()).unwrap();
        assert!((result.max_abs_diff - 1.0).abs() < 1e-12);
        assert!((result.max_rel_diff.unwrap() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch_is_an_error() {
        let a = NumericArray::from(ArrayD::<f64>::zeros(IxDyn(&[4, 4])));
        let b = NumericArray::from(ArrayD::<f64>::zeros(IxDyn(&[4, 8])));
        match compare(&a, &b, &CompareOptions::default()) {
            Err(Error::ShapeMismatch { candidate, golden }) => {
                assert_eq!(candidate, vec![4, 4]);
                assert_eq!(golden, vec![4, 8]);
            }
            other => panic!("expected shape mismatch, got {:?}", other),
        }
    }
}
