use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Element kinds a checked array can carry. Complex kinds use NumPy naming:
/// `Complex64` is a pair of f32, `Complex128` a pair of f64.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Float32,
    Float64,
    Complex64,
    Complex128,
    Int32,
    Int64,
}

impl ElementKind {
    pub fn is_complex(self) -> bool {
        matches!(self, ElementKind::Complex64 | ElementKind::Complex128)
    }

    pub fn is_real_float(self) -> bool {
        matches!(self, ElementKind::Float32 | ElementKind::Float64)
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Float32 => "float32",
            ElementKind::Float64 => "float64",
            ElementKind::Complex64 => "complex64",
            ElementKind::Complex128 => "complex128",
            ElementKind::Int32 => "int32",
            ElementKind::Int64 => "int64",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToleranceProfile {
    pub relative: f64,
    pub absolute: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompareOptions {
    pub scale_factor: f64,
    pub treat_nan_as_equal: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            scale_factor: 1000.0,
            treat_nan_as_equal: false,
        }
    }
}

/// File the mismatch heatmap goes to unless the caller picks another.
pub const DEFAULT_PLOT_PATH: &str = "fft_check_mismatch.png";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CheckOptions {
    pub debug: bool,
    pub compare: CompareOptions,
    /// Where a mismatch heatmap is written. `None` skips rendering.
    pub plot_path: Option<PathBuf>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        CheckOptions {
            debug: false,
            compare: CompareOptions::default(),
            plot_path: Some(PathBuf::from(DEFAULT_PLOT_PATH)),
        }
    }
}

/// Element storage of an array file. Complex values are (re, im) pairs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ArrayData {
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Complex64(Vec<(f32, f32)>),
    Complex128(Vec<(f64, f64)>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
}

impl ArrayData {
    pub fn kind(&self) -> ElementKind {
        match self {
            ArrayData::Float32(_) => ElementKind::Float32,
            ArrayData::Float64(_) => ElementKind::Float64,
            ArrayData::Complex64(_) => ElementKind::Complex64,
            ArrayData::Complex128(_) => ElementKind::Complex128,
            ArrayData::Int32(_) => ElementKind::Int32,
            ArrayData::Int64(_) => ElementKind::Int64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ArrayData::Float32(v) => v.len(),
            ArrayData::Float64(v) => v.len(),
            ArrayData::Complex64(v) => v.len(),
            ArrayData::Complex128(v) => v.len(),
            ArrayData::Int32(v) => v.len(),
            ArrayData::Int64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Row-major array as exchanged with kernels under test.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoredArray {
    pub shape: Vec<usize>,
    pub data: ArrayData,
}
