//! Airglow continuum and line fluxes at a ground-based site.
//!
//! Follows Section 4 of Noll 2012: the unextincted airglow spectrum of the
//! reference atmosphere is attenuated by molecular absorption along the
//! airglow airmass, resampled onto the requested wavelengths, and then
//! corrected for the net Rayleigh and Mie scattering of the extended layer.
//!
//! ## Broadcasting
//!
//! All array inputs follow NumPy broadcasting (see [`crate::broadcast`]).
//! Wavelengths always occupy the trailing axis, so zenith-angle arrays need a
//! trailing axis of length 1 to be combined with a wavelength grid, e.g. shape
//! `(3, 1)` for three angles. The output has shape
//! `broadcast(z, pressure, elevation, lam)`.
//!
//! When fewer than 3/4 of the zenith angles are distinct (typical for an
//! altitude/azimuth grid), the calculation runs once per distinct angle and
//! the rows are copied back to their positions. That layout must then have
//! a trailing axis of length 1 and produces shape `z.shape[..-1] ++ [lam]`,
//! which is the same as the broadcast shape.

use log::debug;
use ndarray::{Array1, ArrayD, Axis, arr0};

use super::airmass::airmass_ag;
use super::dedup::UniqueKeys;
use super::error::AirglowError;
use super::scattering::airglow_scattering;
use crate::atmosphere::AtmosphereProvider;
use crate::broadcast::{broadcast_shapes, broadcast_to, zip_with};
use crate::resample::resample_density;
use crate::transmission::{PARANAL_ELEVATION_KM, PARANAL_PRESSURE_HPA, tau0_mie, tau0_rayleigh};

/// Name of the reference atmosphere table holding the airglow columns
pub const ATMOSPHERE_TABLE: &str = "atmosphere";

/// Site conditions and the physical effects to include.
#[derive(Debug, Clone, PartialEq)]
pub struct AirglowOptions {
    /// Pressure at the observatory in hPa (0-d for a single value)
    pub pressure: ArrayD<f64>,
    /// Observatory elevation in km (0-d for a single value)
    pub elevation: ArrayD<f64>,
    pub rayleigh: bool,
    pub mie: bool,
    /// Molecular (but not ozone) absorption
    pub absorption: bool,
}

impl Default for AirglowOptions {
    fn default() -> Self {
        Self {
            pressure: arr0(PARANAL_PRESSURE_HPA).into_dyn(),
            elevation: arr0(PARANAL_ELEVATION_KM).into_dyn(),
            rayleigh: true,
            mie: true,
            absorption: true,
        }
    }
}

impl AirglowOptions {
    pub fn with_pressure(self, pressure: f64) -> Self {
        self.with_pressure_array(arr0(pressure).into_dyn())
    }

    pub fn with_pressure_array(mut self, pressure: ArrayD<f64>) -> Self {
        self.pressure = pressure;
        self
    }

    pub fn with_elevation(self, elevation: f64) -> Self {
        self.with_elevation_array(arr0(elevation).into_dyn())
    }

    pub fn with_elevation_array(mut self, elevation: ArrayD<f64>) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn with_rayleigh(mut self, enabled: bool) -> Self {
        self.rayleigh = enabled;
        self
    }

    pub fn with_mie(mut self, enabled: bool) -> Self {
        self.mie = enabled;
        self
    }

    pub fn with_absorption(mut self, enabled: bool) -> Self {
        self.absorption = enabled;
        self
    }

    fn has_scalar_site(&self) -> bool {
        self.pressure.ndim() == 0 && self.elevation.ndim() == 0
    }
}

/// Airglow flux densities in ph / (s cm2 nm).
#[derive(Debug, Clone, PartialEq)]
pub struct AirglowFlux {
    pub continuum: ArrayD<f64>,
    pub line: ArrayD<f64>,
}

/// Promotes a scalar wavelength to a one-point grid.
pub fn atleast_1d(lam: &ArrayD<f64>) -> Result<Array1<f64>, AirglowError> {
    match lam.ndim() {
        0 | 1 => Ok(lam.iter().copied().collect()),
        _ => Err(AirglowError::WavelengthShape {
            shape: lam.shape().to_vec(),
        }),
    }
}

fn multiply(a: &ArrayD<f64>, b: &ArrayD<f64>) -> Result<ArrayD<f64>, AirglowError> {
    Ok(zip_with(a, b, |x, y| x * y)?)
}

/// Computes the airglow continuum and line fluxes seen at zenith angle(s) `z`
/// (degrees) on the wavelength grid `lam` (nm, strictly increasing). A 0-d
/// `lam` is treated as a one-point grid.
///
/// The reference table is fetched from `provider` under [`ATMOSPHERE_TABLE`]
/// and is only read, never modified. Zenith angles close to the horizon are
/// not rejected; non-finite inputs propagate into the result.
pub fn get_airglow<P>(
    provider: &P,
    lam: &ArrayD<f64>,
    z: &ArrayD<f64>,
    options: &AirglowOptions,
) -> Result<AirglowFlux, AirglowError>
where
    P: AtmosphereProvider + ?Sized,
{
    let lam = &atleast_1d(lam)?;
    let keys = UniqueKeys::new(z.iter());
    let mut compressed = keys.worth_compressing();
    if compressed && !options.has_scalar_site() {
        debug!("pressure or elevation varies per position, evaluating every zenith angle");
        compressed = false;
    }

    // Evaluate once per distinct angle, laid out as a column
    let (z, leading) = if compressed {
        let Some((&1, leading)) = z.shape().split_last() else {
            return Err(AirglowError::Precondition {
                shape: z.shape().to_vec(),
            });
        };
        debug!(
            "evaluating {} distinct zenith angles for {} positions",
            keys.len(),
            z.len()
        );
        let column = Array1::from(keys.values().to_vec())
            .insert_axis(Axis(1))
            .into_dyn();
        (column, Some(leading.to_vec()))
    } else {
        (z.clone(), None)
    };

    let atm = provider.get(ATMOSPHERE_TABLE)?;
    let mut cont = atm.airglow_cont()?.clone().into_dyn();
    let mut line = atm.airglow_line()?.clone().into_dyn();
    let xag = airmass_ag(&z);

    // Absorption acts on the high-resolution table grid
    if options.absorption {
        let trans_ma = atm.trans_ma()?.clone().into_dyn();
        let transmission = zip_with(&trans_ma, &xag, f64::powf)?;
        cont = multiply(&cont, &transmission)?;
        line = multiply(&line, &transmission)?;
    }

    let ag_lam = atm.wavelength()?;
    cont = resample_density(lam, ag_lam, &cont)?;
    line = resample_density(lam, ag_lam, &line)?;

    if options.rayleigh || options.mie {
        let factors = airglow_scattering(&z);
        let mut tau0 = ArrayD::zeros(cont.shape());
        if options.rayleigh {
            let tau_r = tau0_rayleigh(lam, &options.pressure, &options.elevation)?;
            tau0 = zip_with(&tau0, &multiply(&factors.rayleigh, &tau_r)?, |a, b| a + b)?;
        }
        if options.mie {
            let tau_m = tau0_mie(lam).into_dyn();
            tau0 = zip_with(&tau0, &multiply(&factors.mie, &tau_m)?, |a, b| a + b)?;
        }
        let scattering = zip_with(&tau0, &xag, |tau, x| (-tau * x).exp())?;
        cont = multiply(&cont, &scattering)?;
        line = multiply(&line, &scattering)?;
    }

    // Disabled effects leave lower-rank arrays behind, so fill out the shape
    let shape = broadcast_shapes([
        z.shape(),
        options.pressure.shape(),
        options.elevation.shape(),
        lam.shape(),
    ])?;
    cont = broadcast_to(&cont, &shape)?;
    line = broadcast_to(&line, &shape)?;

    if let Some(leading) = leading {
        cont = keys.gather(&cont, &leading)?;
        line = keys.gather(&line, &leading)?;
    }

    Ok(AirglowFlux {
        continuum: cont,
        line,
    })
}
