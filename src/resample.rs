//! Density-conserving spectral resampling.
//!
//! Values are treated as a density sampled on `source` (e.g. photons per nm).
//! The cumulative integral is built with the trapezoid rule, evaluated at the
//! edges of bins centred on the target grid, and differenced. The integral
//! over any run of target bins is therefore preserved, unlike point
//! interpolation which loses narrow emission lines falling between samples.

use ndarray::{Array1, ArrayD, Axis, IxDyn};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ResampleError {
    #[error("source grid needs at least 2 points, got {0}")]
    SourceTooShort(usize),
    #[error("{grid} grid must be strictly increasing (index {index})")]
    NotIncreasing { grid: &'static str, index: usize },
    #[error("values have trailing length {values} but the source grid has {grid} points")]
    LengthMismatch { values: usize, grid: usize },
    #[error("target grid is empty")]
    EmptyTarget,
}

fn check_increasing(grid: &[f64], name: &'static str) -> Result<(), ResampleError> {
    match grid.windows(2).position(|w| !(w[1] > w[0])) {
        Some(index) => Err(ResampleError::NotIncreasing {
            grid: name,
            index: index + 1,
        }),
        None => Ok(()),
    }
}

/// Edges of bins centred on `centers`: midpoints between neighbours, with the
/// outermost edges extrapolated by half the adjacent spacing.
pub fn bin_edges(centers: &[f64]) -> Vec<f64> {
    let n = centers.len();
    if n < 2 {
        return centers.to_vec();
    }

    let mut edges = Vec::with_capacity(n + 1);
    edges.push(centers[0] - 0.5 * (centers[1] - centers[0]));
    edges.extend(centers.windows(2).map(|w| 0.5 * (w[0] + w[1])));
    edges.push(centers[n - 1] + 0.5 * (centers[n - 1] - centers[n - 2]));
    edges
}

fn cumulative_trapezoid(x: &[f64], y: &[f64]) -> Vec<f64> {
    let mut total = 0.0;
    let mut cumulative = Vec::with_capacity(x.len());
    cumulative.push(0.0);
    for i in 1..x.len() {
        total += 0.5 * (y[i] + y[i - 1]) * (x[i] - x[i - 1]);
        cumulative.push(total);
    }
    cumulative
}

/// Linear interpolation of `fp(xp)` at `x`, clamped to the end values outside
/// the grid. `xp` must be strictly increasing with at least 2 points.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let n = xp.len();
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }

    // First index with xp[i] > x, so xp[i - 1] <= x < xp[i]
    let i = xp.partition_point(|&v| v <= x);
    let r = (x - xp[i - 1]) / (xp[i] - xp[i - 1]);
    (1.0 - r) * fp[i - 1] + r * fp[i]
}

fn resample_lane(target: &[f64], edges: &[f64], source: &[f64], values: &[f64]) -> Vec<f64> {
    if target.len() == 1 {
        return vec![interp(target[0], source, values)];
    }

    let cumulative = cumulative_trapezoid(source, values);
    let at_edges: Vec<f64> = edges
        .iter()
        .map(|&e| interp(e, source, &cumulative))
        .collect();

    at_edges
        .windows(2)
        .zip(edges.windows(2))
        .map(|(c, e)| (c[1] - c[0]) / (e[1] - e[0]))
        .collect()
}

/// Resamples `values` from `source` onto `target`, conserving integrated
/// density.
///
/// The trailing axis of `values` must match `source`; any leading axes are
/// carried through unchanged, so the result has shape
/// `values.shape[..-1] ++ [target.len()]`.
pub fn resample_density(
    target: &Array1<f64>,
    source: &Array1<f64>,
    values: &ArrayD<f64>,
) -> Result<ArrayD<f64>, ResampleError> {
    let target = target.to_vec();
    let source = source.to_vec();

    if source.len() < 2 {
        return Err(ResampleError::SourceTooShort(source.len()));
    }
    if target.is_empty() {
        return Err(ResampleError::EmptyTarget);
    }
    check_increasing(&source, "source")?;
    check_increasing(&target, "target")?;

    let trailing = values.shape().last().copied().unwrap_or(0);
    if values.ndim() == 0 || trailing != source.len() {
        return Err(ResampleError::LengthMismatch {
            values: trailing,
            grid: source.len(),
        });
    }

    let edges = bin_edges(&target);
    let last = Axis(values.ndim() - 1);

    let mut shape = values.shape().to_vec();
    if let Some(n) = shape.last_mut() {
        *n = target.len();
    }
    let mut resampled = ArrayD::zeros(IxDyn(&shape));

    for (lane, mut out) in values.lanes(last).into_iter().zip(resampled.lanes_mut(last)) {
        let lane = lane.to_vec();
        for (o, v) in out
            .iter_mut()
            .zip(resample_lane(&target, &edges, &source, &lane))
        {
            *o = v;
        }
    }

    Ok(resampled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array2, arr1};

    fn fine_grid() -> Array1<f64> {
        Array1::linspace(300.0, 1100.0, 801)
    }

    #[test]
    fn test_bin_edges() {
        let edges = bin_edges(&[1.0, 2.0, 4.0]);
        assert_eq!(edges, vec![0.5, 1.5, 3.0, 5.0]);
    }

    #[test]
    fn test_interp_clamps() {
        let xp = [0.0, 1.0, 2.0];
        let fp = [0.0, 10.0, 30.0];
        assert_eq!(interp(-1.0, &xp, &fp), 0.0);
        assert_eq!(interp(0.5, &xp, &fp), 5.0);
        assert_eq!(interp(1.5, &xp, &fp), 20.0);
        assert_eq!(interp(3.0, &xp, &fp), 30.0);
    }

    #[test]
    fn test_constant_density_is_preserved() {
        let source = fine_grid();
        let values = ArrayD::from_elem(IxDyn(&[source.len()]), 2.5);
        let target = Array1::linspace(400.0, 1000.0, 7);

        let out = resample_density(&target, &source, &values).unwrap();

        assert_eq!(out.shape(), &[7]);
        for v in out.iter() {
            assert_relative_eq!(*v, 2.5, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_narrow_line_flux_is_conserved() {
        let source = fine_grid();
        // A single-sample emission line at 650 nm
        let mut values = ArrayD::<f64>::zeros(IxDyn(&[source.len()]));
        values[[350]] = 4.0;
        let source_flux = 4.0; // trapezoid area of a unit-spaced spike

        let target = Array1::linspace(400.0, 900.0, 11);
        let out = resample_density(&target, &source, &values).unwrap();

        let edges = bin_edges(target.as_slice().unwrap());
        let flux: f64 = out
            .iter()
            .zip(edges.windows(2))
            .map(|(d, e)| d * (e[1] - e[0]))
            .sum();
        assert_relative_eq!(flux, source_flux, max_relative = 1e-12);
    }

    #[test]
    fn test_leading_axes_are_carried() {
        let source = fine_grid();
        let mut values = Array2::<f64>::zeros((3, source.len()));
        for (row, mut lane) in values.rows_mut().into_iter().enumerate() {
            lane.fill(row as f64 + 1.0);
        }
        let target = arr1(&[500.0, 600.0, 700.0, 800.0]);

        let out = resample_density(&target, &source, &values.into_dyn()).unwrap();

        assert_eq!(out.shape(), &[3, 4]);
        assert_relative_eq!(out[[2, 1]], 3.0, max_relative = 1e-12);
    }

    #[test]
    fn test_single_point_target_interpolates() {
        let source = arr1(&[0.0, 10.0]);
        let values = arr1(&[1.0, 3.0]).into_dyn();
        let out = resample_density(&arr1(&[5.0]), &source, &values).unwrap();
        assert_eq!(out, arr1(&[2.0]).into_dyn());
    }

    #[test]
    fn test_errors() {
        let source = arr1(&[1.0, 2.0, 3.0]);
        let values = arr1(&[1.0, 1.0, 1.0]).into_dyn();

        assert_eq!(
            resample_density(&arr1(&[2.0, 1.0]), &source, &values).unwrap_err(),
            ResampleError::NotIncreasing {
                grid: "target",
                index: 1
            }
        );
        assert_eq!(
            resample_density(&arr1(&[1.5]), &arr1(&[1.0, 2.0]), &values).unwrap_err(),
            ResampleError::LengthMismatch { values: 3, grid: 2 }
        );
        assert_eq!(
            resample_density(&arr1(&[1.5]), &arr1(&[1.0]), &values).unwrap_err(),
            ResampleError::SourceTooShort(1)
        );
    }
}
