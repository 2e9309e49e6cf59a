use std::fmt;

use golden_types::{CheckOptions, ElementKind};
use tracing::{debug, info, warn};

use crate::array::{NumericArray, Scalar};
use crate::compare::{compare, Comparison};
use crate::fft::{FftProvider, RustFftProvider, TransformVariant};
use crate::plot::{NoopVisualizer, Panel, PngVisualizer, Visualizer};
use crate::validation::validate_result_shape;
use crate::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct ArraySummary {
    pub shape: Vec<usize>,
    pub kind: ElementKind,
    pub min: Option<Scalar>,
    pub max: Option<Scalar>,
}

impl ArraySummary {
    fn of(array: &NumericArray) -> Self {
        ArraySummary {
            shape: array.shape().to_vec(),
            kind: array.kind(),
            min: array.min(),
            max: array.max(),
        }
    }
}

/// Diagnostic block printed when a check fails or runs in debug mode.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub input: ArraySummary,
    pub candidate: ArraySummary,
    pub golden: ArraySummary,
    pub max_abs_diff: f64,
    pub max_rel_diff: Option<f64>,
}

impl Summary {
    fn new(
        input: &NumericArray,
        candidate: &NumericArray,
        golden: &NumericArray,
        comparison: &Comparison,
    ) -> Self {
        Summary {
            input: ArraySummary::of(input),
            candidate: ArraySummary::of(candidate),
            golden: ArraySummary::of(golden),
            max_abs_diff: comparison.max_abs_diff,
            max_rel_diff: comparison.max_rel_diff,
        }
    }

    fn rows(&self) -> [&ArraySummary; 3] {
        [&self.input, &self.candidate, &self.golden]
    }
}

fn or_na(value: Option<Scalar>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.rows();
        writeln!(f, "shape : {:?} {:?} {:?}", a.shape, b.shape, c.shape)?;
        writeln!(
            f,
            "type : {} {} {}",
            a.kind.name(),
            b.kind.name(),
            c.kind.name()
        )?;
        writeln!(f, "min : {} {} {}", or_na(a.min), or_na(b.min), or_na(c.min))?;
        write!(f, "max : {} {} {}", or_na(a.max), or_na(b.max), or_na(c.max))
    }
}

#[derive(Clone, Debug)]
pub struct CheckOutcome {
    pub matched: bool,
    pub variant: TransformVariant,
    pub comparison: Comparison,
    pub golden: NumericArray,
    /// Present when the summary was printed.
    pub summary: Option<Summary>,
}

/// Checks candidate transforms against a golden FFT.
pub struct Checker {
    options: CheckOptions,
    provider: Box<dyn FftProvider>,
    visualizer: Box<dyn Visualizer>,
}

impl Checker {
    pub fn new(options: CheckOptions) -> Self {
        let visualizer: Box<dyn Visualizer> = match &options.plot_path {
            Some(path) => Box::new(PngVisualizer::new(path.clone())),
            None => Box::new(NoopVisualizer),
        };
        Checker {
            options,
            provider: Box::new(RustFftProvider),
            visualizer,
        }
    }

    pub fn with_provider(mut self, provider: impl FftProvider + 'static) -> Self {
        self.provider = Box::new(provider);
        self
    }

    pub fn with_visualizer(mut self, visualizer: impl Visualizer + 'static) -> Self {
        self.visualizer = Box::new(visualizer);
        self
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    /// Forward golden transform of `signal`, always complex128.
    pub fn golden(&self, signal: &NumericArray) -> Result<(TransformVariant, NumericArray), Error> {
        let variant = TransformVariant::for_kind(signal.kind());
        let golden = match variant {
            TransformVariant::RealInput => {
                let real = signal.to_float64().ok_or_else(|| {
                    Error::InvalidArray(format!("{} is not real", signal.kind().name()))
                })?;
                self.provider.rfftn(&real)?
            }
            TransformVariant::ComplexInput => self.provider.fftn(&signal.to_complex128())?,
        };
        debug!(?variant, kind = signal.kind().name(), shape = ?signal.shape(), "golden_forward");
        Ok((variant, NumericArray::Complex128(golden)))
    }

    /// Inverse golden transform of `spectrum`, shaped to match `candidate`:
    /// a real float candidate selects the half-spectrum inverse with the
    /// candidate's last axis length.
    pub fn golden_inverse(
        &self,
        spectrum: &NumericArray,
        candidate: &NumericArray,
    ) -> Result<(TransformVariant, NumericArray), Error> {
        let variant = TransformVariant::for_kind(candidate.kind());
        let spectrum = spectrum.to_complex128();
        let golden = match variant {
            TransformVariant::RealInput => {
                let last_len = candidate.shape().last().copied().ok_or_else(|| {
                    Error::InvalidArray("zero-dimensional candidate".into())
                })?;
                NumericArray::Float64(self.provider.irfftn(&spectrum, last_len)?)
            }
            TransformVariant::ComplexInput => {
                NumericArray::Complex128(self.provider.ifftn(&spectrum)?)
            }
        };
        debug!(?variant, shape = ?golden.shape(), "golden_inverse");
        Ok((variant, golden))
    }

    /// Compares `candidate` against the forward FFT of `signal`.
    ///
    /// A shape disagreement with the golden result is returned as
    /// [`Error::ShapeMismatch`]; a numeric disagreement is an `Ok` outcome
    /// with `matched == false`.
    pub fn check(
        &self,
        signal: &NumericArray,
        candidate: &NumericArray,
    ) -> Result<CheckOutcome, Error> {
        let (variant, golden) = self.golden(signal)?;
        self.judge(signal, candidate, golden, variant)
    }

    /// Compares `candidate` against the inverse FFT of `spectrum`.
    pub fn check_inverse(
        &self,
        spectrum: &NumericArray,
        candidate: &NumericArray,
    ) -> Result<CheckOutcome, Error> {
        let (variant, golden) = self.golden_inverse(spectrum, candidate)?;
        self.judge(spectrum, candidate, golden, variant)
    }

    fn judge(
        &self,
        input: &NumericArray,
        candidate: &NumericArray,
        golden: NumericArray,
        variant: TransformVariant,
    ) -> Result<CheckOutcome, Error> {
        validate_result_shape(candidate.shape(), golden.shape())?;
        let comparison = compare(candidate, &golden, &self.options.compare)?;

        let summary = if self.options.debug || !comparison.matched {
            let summary = Summary::new(input, candidate, &golden, &comparison);
            println!("{}", summary);
            Some(summary)
        } else {
            None
        };

        if comparison.matched {
            info!(?variant, shape = ?golden.shape(), "golden_match");
        } else {
            warn!(
                ?variant,
                mismatched = comparison.mismatched,
                total = golden.len(),
                "golden_mismatch"
            );
            let error = (&candidate.to_complex128() - &golden.to_complex128()).mapv(|v| v.norm());
            let panels = [
                Panel::new("Input", &input.magnitude())?,
                Panel::new("Result", &candidate.magnitude())?,
                Panel::new("Golden result", &golden.magnitude())?,
                Panel::new("Error Image", &error)?,
            ];
            if let Err(e) = self.visualizer.render(&panels) {
                warn!(error = %e, "plot_failed");
            }
        }

        Ok(CheckOutcome {
            matched: comparison.matched,
            variant,
            comparison,
            golden,
            summary,
        })
    }
}

/// Boolean form of [`Checker::check`] with default options.
///
/// # Panics
///
/// Panics when the candidate's shape differs from the golden result's or the
/// signal cannot be transformed; those are harness errors, not mismatches.
pub fn check_fft(signal: &NumericArray, candidate: &NumericArray, debug: bool) -> bool {
    let checker = Checker::new(CheckOptions {
        debug,
        ..CheckOptions::default()
    });
    match checker.check(signal, candidate) {
        Ok(outcome) => outcome.matched,
        Err(e) => panic!("golden FFT check aborted: {}", e),
    }
}
