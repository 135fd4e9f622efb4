//! Explicit NumPy-style broadcasting for `ndarray` arrays.
//!
//! Shapes are aligned on their trailing axes. Each pair of aligned axes must
//! either be equal or one of them must be 1, and the result takes the larger
//! extent. Missing leading axes behave as length 1, so a 0-d array broadcasts
//! against anything.

use ndarray::{ArrayD, IxDyn, Zip};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot broadcast shape {left:?} against shape {right:?}")]
pub struct ShapeMismatch {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
}

/// Combined shape of `a` and `b` under the broadcasting rules.
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Result<Vec<usize>, ShapeMismatch> {
    let ndim = a.len().max(b.len());
    let mut shape = vec![0; ndim];

    for axis in 0..ndim {
        // Walk from the trailing axis, padding the shorter shape with ones
        let da = axis
            .checked_sub(ndim - a.len())
            .map(|i| a[i])
            .unwrap_or(1);
        let db = axis
            .checked_sub(ndim - b.len())
            .map(|i| b[i])
            .unwrap_or(1);

        shape[axis] = match (da, db) {
            (x, y) if x == y => x,
            (1, y) => y,
            (x, 1) => x,
            _ => {
                return Err(ShapeMismatch {
                    left: a.to_vec(),
                    right: b.to_vec(),
                });
            }
        };
    }

    Ok(shape)
}

/// Folds `broadcast_shape` over any number of shapes.
pub fn broadcast_shapes<'a, I>(shapes: I) -> Result<Vec<usize>, ShapeMismatch>
where
    I: IntoIterator<Item = &'a [usize]>,
{
    shapes
        .into_iter()
        .try_fold(Vec::new(), |acc, shape| broadcast_shape(&acc, shape))
}

/// Materialises `a` at `shape`, which must be a valid broadcast target.
pub fn broadcast_to(a: &ArrayD<f64>, shape: &[usize]) -> Result<ArrayD<f64>, ShapeMismatch> {
    a.broadcast(IxDyn(shape))
        .map(|view| view.to_owned())
        .ok_or_else(|| ShapeMismatch {
            left: a.shape().to_vec(),
            right: shape.to_vec(),
        })
}

/// Applies `f` elementwise over the broadcast of `a` and `b`.
pub fn zip_with<F>(a: &ArrayD<f64>, b: &ArrayD<f64>, f: F) -> Result<ArrayD<f64>, ShapeMismatch>
where
    F: Fn(f64, f64) -> f64,
{
    let shape = broadcast_shape(a.shape(), b.shape())?;
    let mismatch = || ShapeMismatch {
        left: a.shape().to_vec(),
        right: b.shape().to_vec(),
    };
    let av = a.broadcast(IxDyn(&shape)).ok_or_else(mismatch)?;
    let bv = b.broadcast(IxDyn(&shape)).ok_or_else(mismatch)?;

    Ok(Zip::from(&av).and(&bv).map_collect(|&x, &y| f(x, y)))
}
