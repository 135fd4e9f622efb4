use ndarray::{Array3, ArrayD};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("Altitude values must be between 0 (exclusive) and 90 degrees, got {0}")]
    Altitude(f64),
    #[error("At least one azimuth sample is required")]
    NoAzimuth,
}

/// Altitude/azimuth sampling of the sky above a site.
///
/// The airglow only depends on altitude, so every azimuth in a row shares the
/// same zenith angle.
#[derive(Debug, Clone, PartialEq)]
pub struct ZenithGrid {
    altitudes: Vec<f64>,
    n_azimuth: usize,
}

impl ZenithGrid {
    pub fn new(altitudes: Vec<f64>, n_azimuth: usize) -> Result<Self, GridError> {
        if let Some(&alt) = altitudes.iter().find(|a| !(**a > 0.0 && **a <= 90.0)) {
            return Err(GridError::Altitude(alt));
        }

        if n_azimuth == 0 {
            return Err(GridError::NoAzimuth);
        }

        Ok(ZenithGrid {
            altitudes,
            n_azimuth,
        })
    }

    pub fn altitudes(&self) -> &[f64] {
        &self.altitudes
    }

    /// Azimuths in degrees, evenly spaced over [0, 360).
    pub fn azimuths(&self) -> Vec<f64> {
        let step = 360.0 / self.n_azimuth as f64;
        (0..self.n_azimuth).map(|i| i as f64 * step).collect()
    }

    /// Zenith angles in degrees with shape `(n_alt, n_az, 1)`, ready to be
    /// broadcast against a wavelength grid.
    pub fn zenith(&self) -> ArrayD<f64> {
        Array3::from_shape_fn((self.altitudes.len(), self.n_azimuth, 1), |(i, _, _)| {
            90.0 - self.altitudes[i]
        })
        .into_dyn()
    }
}
