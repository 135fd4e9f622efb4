//! Zenith optical depths for Rayleigh and aerosol (Mie) scattering.
//!
//! Both follow Section 2 of Noll et al. (2012), "An atmospheric radiation model
//! for Cerro Paranal", A&A 543, A92. Wavelengths are given in nanometers and
//! converted to micrometers internally.

use ndarray::{Array1, ArrayD, Zip};

use crate::broadcast::{ShapeMismatch, broadcast_shape, broadcast_to};

/// Standard sea-level pressure in hPa
pub const STANDARD_PRESSURE_HPA: f64 = 1013.25;

/// Mean pressure at Cerro Paranal in hPa
pub const PARANAL_PRESSURE_HPA: f64 = 744.0;

/// Elevation of Cerro Paranal in km
pub const PARANAL_ELEVATION_KM: f64 = 2.64;

/// Aerosol extinction at 1 µm for Paranal
pub const MIE_K0: f64 = 0.013;

/// Aerosol extinction power-law index for Paranal
pub const MIE_ALPHA: f64 = -1.38;

/// Rayleigh optical depth for a single wavelength, pressure and elevation.
///
/// Equation (3) of Noll 2012, with `lam_nm` in nm, `pressure` in hPa and
/// `elevation` in km.
pub fn rayleigh_optical_depth(lam_nm: f64, pressure: f64, elevation: f64) -> f64 {
    let lam = lam_nm / 1e3;
    pressure / STANDARD_PRESSURE_HPA
        * (0.00864 + 6.5e-6 * elevation)
        * lam.powf(-(3.916 + 0.074 * lam + 0.050 / lam))
}

/// Rayleigh zenith optical depth over a wavelength grid.
///
/// `lam` occupies the trailing axis; `pressure` and `elevation` are broadcast
/// against it, so the result has shape `broadcast(pressure, elevation, lam)`.
pub fn tau0_rayleigh(
    lam: &Array1<f64>,
    pressure: &ArrayD<f64>,
    elevation: &ArrayD<f64>,
) -> Result<ArrayD<f64>, ShapeMismatch> {
    let site_shape = broadcast_shape(pressure.shape(), elevation.shape())?;
    let shape = broadcast_shape(&site_shape, lam.shape())?;

    let lam = broadcast_to(&lam.clone().into_dyn(), &shape)?;
    let pressure = broadcast_to(pressure, &shape)?;
    let elevation = broadcast_to(elevation, &shape)?;

    let tau = Zip::from(&lam)
        .and(&pressure)
        .and(&elevation)
        .map_collect(|&l, &p, &h| rayleigh_optical_depth(l, p, h));

    Ok(tau)
}

/// Aerosol zenith optical depth `k0 * lam^alpha` with `lam` in µm.
pub fn tau0_mie_with(lam: &Array1<f64>, k0: f64, alpha: f64) -> Array1<f64> {
    lam.mapv(|l| k0 * (l / 1e3).powf(alpha))
}

/// Aerosol zenith optical depth using the Paranal parameters.
pub fn tau0_mie(lam: &Array1<f64>) -> Array1<f64> {
    tau0_mie_with(lam, MIE_K0, MIE_ALPHA)
}
