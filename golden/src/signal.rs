//! Seeded test signals.

use golden_types::ElementKind;
use ndarray::{ArrayD, IxDyn};
use num_complex::{Complex32, Complex64};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::array::NumericArray;

/// Uniform values in [-1, 1) of the requested kind. Integer kinds draw
/// from [-100, 100].
pub fn random(kind: ElementKind, shape: &[usize], seed: u64) -> NumericArray {
    let mut rng = StdRng::seed_from_u64(seed);
    let shape = IxDyn(shape);
    match kind {
        ElementKind::Float32 => {
            NumericArray::Float32(ArrayD::from_shape_fn(shape, |_| rng.gen_range(-1.0..1.0)))
        }
        ElementKind::Float64 => {
            NumericArray::Float64(ArrayD::from_shape_fn(shape, |_| rng.gen_range(-1.0..1.0)))
        }
        ElementKind::Complex64 => NumericArray::Complex64(ArrayD::from_shape_fn(shape, |_| {
            Complex32::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
        })),
        ElementKind::Complex128 => NumericArray::Complex128(ArrayD::from_shape_fn(shape, |_| {
            Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
        })),
        ElementKind::Int32 => {
            NumericArray::Int32(ArrayD::from_shape_fn(shape, |_| rng.gen_range(-100..=100)))
        }
        ElementKind::Int64 => {
            NumericArray::Int64(ArrayD::from_shape_fn(shape, |_| rng.gen_range(-100..=100)))
        }
    }
}

/// Sum of two separable tones, real valued, for checks that want structure
/// rather than noise.
pub fn tones(rows: usize, cols: usize) -> ArrayD<f64> {
    ArrayD::from_shape_fn(IxDyn(&[rows, cols]), |idx| {
        let (r, c) = (idx[0] as f64, idx[1] as f64);
        let tau = 2.0 * std::f64::consts::PI;
        (tau * 3.0 * c / cols as f64).cos() + 0.5 * (tau * 2.0 * r / rows as f64).sin()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_deterministic() {
        let a = random(ElementKind::Complex64, &[3, 5], 7);
        let b = random(ElementKind::Complex64, &[3, 5], 7);
        let c = random(ElementKind::Complex64, &[3, 5], 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.shape(), &[3, 5]);
    }

    #[test]
    fn test_kinds_and_ranges() {
        for kind in [
            ElementKind::Float32,
            ElementKind::Float64,
            ElementKind::Complex128,
            ElementKind::Int32,
            ElementKind::Int64,
        ] {
            let a = random(kind, &[16], 1);
            assert_eq!(a.kind(), kind);
            assert!(a.magnitude().iter().all(|&m| m <= 142.0));
        }
        let floats = random(ElementKind::Float64, &[64], 2);
        assert!(floats.magnitude().iter().all(|&m| m <= 1.0));
    }
}
