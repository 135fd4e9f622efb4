use thiserror::Error;

use crate::atmosphere::LookupError;
use crate::broadcast::ShapeMismatch;
use crate::resample::ResampleError;

#[derive(Debug, Error)]
pub enum AirglowError {
    #[error(
        "zenith angles with repeated values are evaluated once per distinct angle, \
         which needs a trailing axis of length 1; got shape {shape:?}"
    )]
    Precondition { shape: Vec<usize> },
    #[error("wavelengths must be a scalar or a 1-D grid, got shape {shape:?}")]
    WavelengthShape { shape: Vec<usize> },
    #[error(transparent)]
    Shape(#[from] ShapeMismatch),
    #[error("atmosphere lookup failed: {0}")]
    Lookup(#[from] LookupError),
    #[error("resampling failed: {0}")]
    Resample(#[from] ResampleError),
}
