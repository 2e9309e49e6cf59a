use crate::Error;

pub(crate) fn validate_transform_shape(shape: &[usize]) -> Result<(), Error> {
    if shape.is_empty() {
        return Err(Error::InvalidArray(
            "cannot transform a zero-dimensional array".into(),
        ));
    }

    if let Some(axis) = shape.iter().position(|&n| n == 0) {
        return Err(Error::InvalidArray(format!(
            "axis {} of shape {:?} is empty",
            axis, shape
        )));
    }

    Ok(())
}

/// Candidate and golden result must agree exactly before any elementwise work.
pub(crate) fn validate_result_shape(candidate: &[usize], golden: &[usize]) -> Result<(), Error> {
    if candidate != golden {
        return Err(Error::ShapeMismatch {
            candidate: candidate.to_vec(),
            golden: golden.to_vec(),
        });
    }
    Ok(())
}
