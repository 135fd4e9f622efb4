use ndarray::{Array, ArrayBase, Data, Dimension};

/// Effective airmass of light emitted by the ~90 km airglow layer.
///
/// Equation (23) of Noll 2012, with `z` the zenith angle in degrees. The
/// result is 1 at the zenith and grows monotonically towards the horizon.
/// Inputs are not range-checked: non-finite angles propagate as NaN.
pub fn airmass(z: f64) -> f64 {
    (1.0 - 0.972 * z.to_radians().sin().powi(2)).powf(-0.5)
}

/// Elementwise [`airmass`] over an array of zenith angles of any shape.
pub fn airmass_ag<S, D>(z: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    z.mapv(airmass)
}
