use std::fmt;

use golden_types::{ArrayData, ElementKind, StoredArray};
use ndarray::{ArrayD, IxDyn};
use num_complex::{Complex32, Complex64};

use crate::Error;

/// An n-dimensional array of one of the supported element kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum NumericArray {
    Float32(ArrayD<f32>),
    Float64(ArrayD<f64>),
    Complex64(ArrayD<Complex32>),
    Complex128(ArrayD<Complex64>),
    Int32(ArrayD<i32>),
    Int64(ArrayD<i64>),
}

macro_rules! each_array {
    ($value:expr, $a:ident => $body:expr) => {
        match $value {
            NumericArray::Float32($a) => $body,
            NumericArray::Float64($a) => $body,
            NumericArray::Complex64($a) => $body,
            NumericArray::Complex128($a) => $body,
            NumericArray::Int32($a) => $body,
            NumericArray::Int64($a) => $body,
        }
    };
}

impl NumericArray {
    pub fn kind(&self) -> ElementKind {
        match self {
            NumericArray::Float32(_) => ElementKind::Float32,
            NumericArray::Float64(_) => ElementKind::Float64,
            NumericArray::Complex64(_) => ElementKind::Complex64,
            NumericArray::Complex128(_) => ElementKind::Complex128,
            NumericArray::Int32(_) => ElementKind::Int32,
            NumericArray::Int64(_) => ElementKind::Int64,
        }
    }

    pub fn shape(&self) -> &[usize] {
        each_array!(self, a => a.shape())
    }

    pub fn ndim(&self) -> usize {
        each_array!(self, a => a.ndim())
    }

    pub fn len(&self) -> usize {
        each_array!(self, a => a.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Widens every element to complex128; all comparisons run at this width.
    pub fn to_complex128(&self) -> ArrayD<Complex64> {
        match self {
            NumericArray::Float32(a) => a.mapv(|v| Complex64::new(v as f64, 0.0)),
            NumericArray::Float64(a) => a.mapv(|v| Complex64::new(v, 0.0)),
            NumericArray::Complex64(a) => a.mapv(|v| Complex64::new(v.re as f64, v.im as f64)),
            NumericArray::Complex128(a) => a.clone(),
            NumericArray::Int32(a) => a.mapv(|v| Complex64::new(v as f64, 0.0)),
            NumericArray::Int64(a) => a.mapv(|v| Complex64::new(v as f64, 0.0)),
        }
    }

    /// Real-valued view at f64, or `None` for complex kinds.
    pub fn to_float64(&self) -> Option<ArrayD<f64>> {
        match self {
            NumericArray::Float32(a) => Some(a.mapv(|v| v as f64)),
            NumericArray::Float64(a) => Some(a.clone()),
            NumericArray::Int32(a) => Some(a.mapv(|v| v as f64)),
            NumericArray::Int64(a) => Some(a.mapv(|v| v as f64)),
            NumericArray::Complex64(_) | NumericArray::Complex128(_) => None,
        }
    }

    pub fn magnitude(&self) -> ArrayD<f64> {
        match self {
            NumericArray::Float32(a) => a.mapv(|v| (v as f64).abs()),
            NumericArray::Float64(a) => a.mapv(f64::abs),
            NumericArray::Complex64(a) => a.mapv(|v| v.norm() as f64),
            NumericArray::Complex128(a) => a.mapv(|v| v.norm()),
            NumericArray::Int32(a) => a.mapv(|v| (v as f64).abs()),
            NumericArray::Int64(a) => a.mapv(|v| (v as f64).abs()),
        }
    }

    pub fn min(&self) -> Option<Scalar> {
        self.extreme(std::cmp::Ordering::Less)
    }

    pub fn max(&self) -> Option<Scalar> {
        self.extreme(std::cmp::Ordering::Greater)
    }

    // NaN wins, as with NumPy's min/max. Complex values order lexicographically.
    fn extreme(&self, want: std::cmp::Ordering) -> Option<Scalar> {
        let values: Box<dyn Iterator<Item = Scalar> + '_> = match self {
            NumericArray::Float32(a) => Box::new(a.iter().map(|&v| Scalar::Real(v as f64))),
            NumericArray::Float64(a) => Box::new(a.iter().map(|&v| Scalar::Real(v))),
            NumericArray::Complex64(a) => Box::new(
                a.iter()
                    .map(|v| Scalar::Complex(Complex64::new(v.re as f64, v.im as f64))),
            ),
            NumericArray::Complex128(a) => Box::new(a.iter().map(|&v| Scalar::Complex(v))),
            NumericArray::Int32(a) => Box::new(a.iter().map(|&v| Scalar::Int(v as i64))),
            NumericArray::Int64(a) => Box::new(a.iter().map(|&v| Scalar::Int(v))),
        };

        let mut best: Option<Scalar> = None;
        for value in values {
            if value.is_nan() {
                return Some(value);
            }
            best = match best {
                Some(current) if value.ordering(&current) != want => Some(current),
                _ => Some(value),
            };
        }
        best
    }

    pub fn to_stored(&self) -> StoredArray {
        let data = match self {
            NumericArray::Float32(a) => ArrayData::Float32(a.iter().copied().collect()),
            NumericArray::Float64(a) => ArrayData::Float64(a.iter().copied().collect()),
            NumericArray::Complex64(a) => {
                ArrayData::Complex64(a.iter().map(|v| (v.re, v.im)).collect())
            }
            NumericArray::Complex128(a) => {
                ArrayData::Complex128(a.iter().map(|v| (v.re, v.im)).collect())
            }
            NumericArray::Int32(a) => ArrayData::Int32(a.iter().copied().collect()),
            NumericArray::Int64(a) => ArrayData::Int64(a.iter().copied().collect()),
        };
        StoredArray {
            shape: self.shape().to_vec(),
            data,
        }
    }
}

fn shaped<T>(shape: &[usize], data: Vec<T>) -> Result<ArrayD<T>, Error> {
    let len = data.len();
    ArrayD::from_shape_vec(IxDyn(shape), data).map_err(|_| {
        Error::InvalidArray(format!(
            "{} elements do not fill shape {:?}",
            len, shape
        ))
    })
}

impl TryFrom<StoredArray> for NumericArray {
    type Error = Error;

    fn try_from(stored: StoredArray) -> Result<Self, Error> {
        let shape = stored.shape;
        Ok(match stored.data {
            ArrayData::Float32(v) => NumericArray::Float32(shaped(&shape, v)?),
            ArrayData::Float64(v) => NumericArray::Float64(shaped(&shape, v)?),
            ArrayData::Complex64(v) => NumericArray::Complex64(shaped(
                &shape,
                v.into_iter().map(|(re, im)| Complex32::new(re, im)).collect(),
            )?),
            ArrayData::Complex128(v) => NumericArray::Complex128(shaped(
                &shape,
                v.into_iter().map(|(re, im)| Complex64::new(re, im)).collect(),
            )?),
            ArrayData::Int32(v) => NumericArray::Int32(shaped(&shape, v)?),
            ArrayData::Int64(v) => NumericArray::Int64(shaped(&shape, v)?),
        })
    }
}

impl From<ArrayD<f32>> for NumericArray {
    fn from(a: ArrayD<f32>) -> Self {
        NumericArray::Float32(a)
    }
}

impl From<ArrayD<f64>> for NumericArray {
    fn from(a: ArrayD<f64>) -> Self {
        NumericArray::Float64(a)
    }
}

impl From<ArrayD<Complex32>> for NumericArray {
    fn from(a: ArrayD<Complex32>) -> Self {
        NumericArray::Complex64(a)
    }
}

impl From<ArrayD<Complex64>> for NumericArray {
    fn from(a: ArrayD<Complex64>) -> Self {
        NumericArray::Complex128(a)
    }
}

impl From<ArrayD<i32>> for NumericArray {
    fn from(a: ArrayD<i32>) -> Self {
        NumericArray::Int32(a)
    }
}

impl From<ArrayD<i64>> for NumericArray {
    fn from(a: ArrayD<i64>) -> Self {
        NumericArray::Int64(a)
    }
}

/// A single element widened for reporting.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Scalar {
    Real(f64),
    Int(i64),
    Complex(Complex64),
}

impl Scalar {
    fn is_nan(&self) -> bool {
        match self {
            Scalar::Real(v) => v.is_nan(),
            Scalar::Int(_) => false,
            Scalar::Complex(v) => v.re.is_nan() || v.im.is_nan(),
        }
    }

    fn ordering(&self, other: &Scalar) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (self, other) {
            (Scalar::Int(a), Scalar::Int(b)) => a.cmp(b),
            (Scalar::Complex(a), Scalar::Complex(b)) => a
                .re
                .partial_cmp(&b.re)
                .filter(|o| *o != Ordering::Equal)
                .or_else(|| a.im.partial_cmp(&b.im))
                .unwrap_or(Ordering::Equal),
            (a, b) => a
                .as_f64()
                .partial_cmp(&b.as_f64())
                .unwrap_or(Ordering::Equal),
        }
    }

    fn as_f64(&self) -> f64 {
        match self {
            Scalar::Real(v) => *v,
            Scalar::Int(v) => *v as f64,
            Scalar::Complex(v) => v.re,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Real(v) => write!(f, "{}", v),
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Complex(v) => {
                let sign = if v.im.is_sign_negative() { '-' } else { '+' };
                write!(f, "({}{}{}j)", v.re, sign, v.im.abs())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_complex_min_max_lexicographic() {
        let a = NumericArray::from(
            arr1(&[
                Complex64::new(1.0, 5.0),
                Complex64::new(1.0, -2.0),
                Complex64::new(0.5, 9.0),
                Complex64::new(3.0, 0.0),
            ])
            .into_dyn(),
        );
        assert_eq!(a.min(), Some(Scalar::Complex(Complex64::new(0.5, 9.0))));
        assert_eq!(a.max(), Some(Scalar::Complex(Complex64::new(3.0, 0.0))));

        let b = NumericArray::from(
            arr1(&[Complex64::new(2.0, 1.0), Complex64::new(2.0, -1.0)]).into_dyn(),
        );
        assert_eq!(b.min(), Some(Scalar::Complex(Complex64::new(2.0, -1.0))));
    }

    #[test]
    fn test_nan_propagates_to_min() {
        let a = NumericArray::from(arr1(&[1.0f64, f64::NAN, -3.0]).into_dyn());
        match a.min() {
            Some(Scalar::Real(v)) => assert!(v.is_nan()),
            other => panic!("expected NaN, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_has_no_extremes() {
        let a = NumericArray::from(ArrayD::<f32>::zeros(IxDyn(&[0, 3])));
        assert!(a.is_empty());
        assert_eq!(a.min(), None);
    }

    #[test]
    fn test_stored_length_must_fill_shape() {
        let stored = StoredArray {
            shape: vec![2, 3],
            data: ArrayData::Float64(vec![0.0; 5]),
        };
        assert!(matches!(
            NumericArray::try_from(stored),
            Err(Error::InvalidArray(_))
        ));
    }

    #[test]
    fn test_stored_keeps_row_major_order() {
        let stored = StoredArray {
            shape: vec![2, 2],
            data: ArrayData::Complex64(vec![(1.0, 0.0), (2.0, 0.5), (3.0, 0.0), (4.0, -1.0)]),
        };
        let array = NumericArray::try_from(stored.clone()).unwrap();
        assert_eq!(array.kind(), ElementKind::Complex64);
        match &array {
            NumericArray::Complex64(a) => assert_eq!(a[IxDyn(&[1, 1])], Complex32::new(4.0, -1.0)),
            other => panic!("unexpected kind {:?}", other.kind()),
        }
        assert_eq!(array.to_stored(), stored);
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Complex(Complex64::new(1.5, -2.0)).to_string(), "(1.5-2j)");
        assert_eq!(Scalar::Complex(Complex64::new(0.0, 3.0)).to_string(), "(0+3j)");
        assert_eq!(Scalar::Int(-4).to_string(), "-4");
    }
}
