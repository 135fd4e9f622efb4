use ndarray::{Array, ArrayBase, Data, Dimension};

use super::airmass::airmass;

/// Net Rayleigh and Mie optical depth multipliers for airglow.
///
/// Negative values mean that airglow scattered into the line of sight from
/// elsewhere in the layer exceeds the direct airglow scattered out of it,
/// which is the normal case close to the zenith.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatteringFactors<D: Dimension> {
    pub rayleigh: Array<f64, D>,
    pub mie: Array<f64, D>,
}

/// Equations (24) and (25) of Noll 2012 for a single zenith angle in degrees,
/// returned as `(f_rayleigh, f_mie)`.
pub fn scattering_factors(z: f64) -> (f64, f64) {
    let x = airmass(z).log10();
    (1.669 * x - 0.146, 1.732 * x - 0.318)
}

pub fn airglow_scattering<S, D>(z: &ArrayBase<S, D>) -> ScatteringFactors<D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    ScatteringFactors {
        rayleigh: z.mapv(|z| scattering_factors(z).0),
        mie: z.mapv(|z| scattering_factors(z).1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{arr0, arr1};

    #[test]
    fn test_scattering_at_zenith() {
        assert_eq!(scattering_factors(0.0), (-0.146, -0.318));

        let f = airglow_scattering(&arr0(0.0));
        assert_eq!(f.rayleigh, arr0(-0.146));
        assert_eq!(f.mie, arr0(-0.318));
    }

    #[test]
    fn test_scattering_reference_values() {
        let f = airglow_scattering(&arr1(&[10.0, 20.0, 30.0]));

        let rayleigh = [-0.135, -0.102, -0.045];
        let mie = [-0.307, -0.273, -0.213];
        for i in 0..3 {
            assert_abs_diff_eq!(f.rayleigh[i], rayleigh[i], epsilon = 5e-4);
            assert_abs_diff_eq!(f.mie[i], mie[i], epsilon = 5e-4);
        }
    }

    #[test]
    fn test_scattering_turns_positive_at_low_altitude() {
        // Direct scattering out of the beam wins once the airmass is large
        let (f_r, f_m) = scattering_factors(80.0);
        assert!(f_r > 0.0);
        assert!(f_m > 0.0);
    }
}
