use std::fmt;

pub use golden_types::{
    ArrayData, CheckOptions, CompareOptions, ElementKind, StoredArray, ToleranceProfile,
    DEFAULT_PLOT_PATH,
};

pub mod array;
pub mod check;
pub mod compare;
pub mod fft;
pub mod plot;
pub mod signal;
pub mod tolerance;
mod validation;

pub use crate::array::{NumericArray, Scalar};
pub use crate::check::{check_fft, ArraySummary, CheckOutcome, Checker, Summary};
pub use crate::compare::{compare, Comparison};
pub use crate::fft::{FftProvider, RustFftProvider, TransformVariant};
pub use crate::plot::{NoopVisualizer, Panel, PngVisualizer, Visualizer};
pub use crate::tolerance::{profile_for, promote, resolve_kind};

#[derive(Debug)]
pub enum Error {
    ShapeMismatch {
        candidate: Vec<usize>,
        golden: Vec<usize>,
    },
    InvalidArray(String),
    Plot(String),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ShapeMismatch { candidate, golden } => write!(
                f,
                "shape mismatch: candidate {:?}, golden {:?}",
                candidate, golden
            ),
            Error::InvalidArray(msg) => write!(f, "invalid array: {}", msg),
            Error::Plot(msg) => write!(f, "plot failed: {}", msg),
            Error::Io(e) => write!(f, "io: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
