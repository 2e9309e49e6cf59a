//! Golden transforms. The trusted implementation is `rustfft`, applied axis
//! by axis over `ndarray` lanes with NumPy's conventions: row-major layout,
//! forward transforms unnormalized, inverse transforms scaled by `1/N`, and
//! the real-input variants halving the last axis.

use golden_types::ElementKind;
use ndarray::{ArrayD, Axis, Slice};
use num_complex::Complex64;
use rustfft::{Fft, FftDirection, FftPlanner};
use tracing::debug;

use crate::validation::validate_transform_shape;
use crate::Error;

/// Which entry point of the provider computes the golden result.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransformVariant {
    /// Hermitian half spectrum of real floating-point input.
    RealInput,
    /// Full complex-to-complex transform.
    ComplexInput,
}

impl TransformVariant {
    /// Real floats take the half-spectrum path. Integers are not floating
    /// point and go through the complex transform.
    pub fn for_kind(kind: ElementKind) -> Self {
        if kind.is_real_float() {
            TransformVariant::RealInput
        } else {
            TransformVariant::ComplexInput
        }
    }
}

pub trait FftProvider {
    fn fftn(&self, input: &ArrayD<Complex64>) -> Result<ArrayD<Complex64>, Error>;

    /// Output has `n / 2 + 1` entries on the last axis.
    fn rfftn(&self, input: &ArrayD<f64>) -> Result<ArrayD<Complex64>, Error>;

    fn ifftn(&self, input: &ArrayD<Complex64>) -> Result<ArrayD<Complex64>, Error>;

    /// Inverse of [`FftProvider::rfftn`]; `last_len` is the length of the
    /// real output's last axis.
    fn irfftn(&self, input: &ArrayD<Complex64>, last_len: usize) -> Result<ArrayD<f64>, Error>;
}

#[derive(Copy, Clone, Debug, Default)]
pub struct RustFftProvider;

impl FftProvider for RustFftProvider {
    fn fftn(&self, input: &ArrayD<Complex64>) -> Result<ArrayD<Complex64>, Error> {
        validate_transform_shape(input.shape())?;
        let mut planner = FftPlanner::new();
        let mut data = input.clone();
        transform_axes(&mut data, 0..input.ndim(), FftDirection::Forward, &mut planner);
        debug!(shape = ?data.shape(), "fftn");
        Ok(data)
    }

    fn rfftn(&self, input: &ArrayD<f64>) -> Result<ArrayD<Complex64>, Error> {
        validate_transform_shape(input.shape())?;
        let mut planner = FftPlanner::new();
        let last = input.ndim() - 1;
        let n = input.len_of(Axis(last));

        let mut full = input.mapv(|v| Complex64::new(v, 0.0));
        transform_axes(&mut full, last..last + 1, FftDirection::Forward, &mut planner);
        let mut half = full
            .slice_axis(Axis(last), Slice::from(0..n / 2 + 1))
            .to_owned();
        transform_axes(&mut half, 0..last, FftDirection::Forward, &mut planner);
        debug!(shape = ?half.shape(), "rfftn");
        Ok(half)
    }

    fn ifftn(&self, input: &ArrayD<Complex64>) -> Result<ArrayD<Complex64>, Error> {
        validate_transform_shape(input.shape())?;
        let mut planner = FftPlanner::new();
        let mut data = input.clone();
        transform_axes(&mut data, 0..input.ndim(), FftDirection::Inverse, &mut planner);
        let scale = 1.0 / data.len() as f64;
        data.mapv_inplace(|v| v * scale);
        debug!(shape = ?data.shape(), "ifftn");
        Ok(data)
    }

    fn irfftn(&self, input: &ArrayD<Complex64>, last_len: usize) -> Result<ArrayD<f64>, Error> {
        validate_transform_shape(input.shape())?;
        if last_len == 0 {
            return Err(Error::InvalidArray(
                "irfftn output length must be positive".into(),
            ));
        }
        let mut planner = FftPlanner::new();
        let last = input.ndim() - 1;
        let m = input.len_of(Axis(last));

        let mut data = input.clone();
        transform_axes(&mut data, 0..last, FftDirection::Inverse, &mut planner);
        let lead: usize = input.shape()[..last].iter().product();

        let mut out_shape = input.shape().to_vec();
        out_shape[last] = last_len;
        let mut out = ArrayD::<f64>::zeros(out_shape);

        let n = last_len;
        let fft = planner.plan_fft(n, FftDirection::Inverse);
        let mut full = vec![Complex64::default(); n];
        let mut scratch = vec![Complex64::default(); fft.get_inplace_scratch_len()];
        let scale = 1.0 / (n * lead) as f64;
        for (spectrum, mut target) in data
            .lanes(Axis(last))
            .into_iter()
            .zip(out.lanes_mut(Axis(last)))
        {
            full.iter_mut().for_each(|v| *v = Complex64::default());
            for k in 0..=n / 2 {
                if k < m {
                    full[k] = spectrum[k];
                }
            }
            for k in 1..(n + 1) / 2 {
                full[n - k] = full[k].conj();
            }
            fft.process_with_scratch(&mut full, &mut scratch);
            for (dst, src) in target.iter_mut().zip(full.iter()) {
                *dst = src.re * scale;
            }
        }
        debug!(shape = ?out.shape(), "irfftn");
        Ok(out)
    }
}

fn transform_axes(
    data: &mut ArrayD<Complex64>,
    axes: std::ops::Range<usize>,
    direction: FftDirection,
    planner: &mut FftPlanner<f64>,
) {
    for axis in axes {
        let len = data.len_of(Axis(axis));
        let fft = planner.plan_fft(len, direction);
        let mut buffer = vec![Complex64::default(); len];
        let mut scratch = vec![Complex64::default(); fft.get_inplace_scratch_len()];
        for mut lane in data.lanes_mut(Axis(axis)) {
            for (dst, src) in buffer.iter_mut().zip(lane.iter()) {
                *dst = *src;
            }
            fft.process_with_scratch(&mut buffer, &mut scratch);
            for (dst, src) in lane.iter_mut().zip(buffer.iter()) {
                *dst = *src;
            }
        }
    }
}
