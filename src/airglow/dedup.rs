use ndarray::{ArrayD, Axis, IxDyn};

use crate::broadcast::ShapeMismatch;

/// Sorted distinct values of an array plus, for every original position, the
/// index of its value in the sorted set.
///
/// Work done once per distinct value can then be expanded back to the
/// original layout with [`UniqueKeys::gather`]. Ordering uses `total_cmp`,
/// so NaNs never panic and identical NaN payloads share one slot. Negative
/// zero is folded into zero first.
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueKeys {
    values: Vec<f64>,
    index: Vec<usize>,
}

impl UniqueKeys {
    pub fn new<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a f64>,
    {
        let original: Vec<f64> = values
            .into_iter()
            .map(|&v| if v == 0.0 { 0.0 } else { v })
            .collect();

        let mut unique = original.clone();
        unique.sort_by(f64::total_cmp);
        unique.dedup_by(|a, b| a.total_cmp(b).is_eq());

        let index = original
            .iter()
            .map(|v| {
                unique
                    .binary_search_by(|probe| probe.total_cmp(v))
                    .unwrap_or_else(|i| i)
            })
            .collect();

        Self {
            values: unique,
            index,
        }
    }

    /// Distinct values in ascending order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Index into [`values`](Self::values) for every original position.
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Deduplication pays off once fewer than 3/4 of the positions hold
    /// distinct values.
    pub fn worth_compressing(&self) -> bool {
        4 * self.values.len() < 3 * self.index.len()
    }

    /// Expands per-key rows back to the original positions.
    ///
    /// `rows` has one row per distinct value along axis 0. The result has
    /// shape `leading ++ rows.shape[1..]`, where `leading` is the original
    /// layout and must hold exactly `self.index().len()` positions.
    pub fn gather(
        &self,
        rows: &ArrayD<f64>,
        leading: &[usize],
    ) -> Result<ArrayD<f64>, ShapeMismatch> {
        let mut shape = leading.to_vec();
        shape.extend_from_slice(rows.shape().get(1..).unwrap_or_default());

        let mismatch = || ShapeMismatch {
            left: rows.shape().to_vec(),
            right: shape.clone(),
        };
        if rows.shape().first() != Some(&self.values.len()) {
            return Err(mismatch());
        }

        rows.select(Axis(0), &self.index)
            .into_shape_with_order(IxDyn(&shape))
            .map_err(|_| mismatch())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_unique_values_and_index() {
        let z = arr2(&[[20.0], [0.0], [20.0], [10.0]]);
        let keys = UniqueKeys::new(z.iter());

        assert_eq!(keys.values(), &[0.0, 10.0, 20.0]);
        assert_eq!(keys.index(), &[2, 0, 2, 1]);
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_worth_compressing_threshold() {
        // 3 distinct out of 4: 12 < 12 is false
        assert!(!UniqueKeys::new(arr1(&[0.0, 1.0, 2.0, 2.0]).iter()).worth_compressing());
        // 2 distinct out of 4
        assert!(UniqueKeys::new(arr1(&[0.0, 1.0, 1.0, 1.0]).iter()).worth_compressing());
        // A scalar is never compressed
        assert!(!UniqueKeys::new([5.0].iter()).worth_compressing());
    }

    #[test]
    fn test_nan_values_do_not_panic() {
        let keys = UniqueKeys::new([f64::NAN, 1.0, f64::NAN].iter());
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.index(), &[1, 0, 1]);
    }

    #[test]
    fn test_signed_zeros_share_one_slot() {
        let keys = UniqueKeys::new([0.0, -0.0, 1.0, 1.0].iter());

        assert_eq!(keys.len(), 2);
        assert_eq!(keys.index(), &[0, 0, 1, 1]);
        assert!(keys.values()[0].is_sign_positive());
        assert!(keys.worth_compressing());
    }

    #[test]
    fn test_gather_restores_layout() {
        let keys = UniqueKeys::new([3.0, 1.0, 3.0, 3.0, 1.0, 2.0].iter());
        // One row of two samples per distinct value: 1.0, 2.0, 3.0
        let rows = arr2(&[[1.0, -1.0], [2.0, -2.0], [3.0, -3.0]]).into_dyn();

        let out = keys.gather(&rows, &[2, 3]).unwrap();

        assert_eq!(out.shape(), &[2, 3, 2]);
        assert_eq!(out[[0, 0, 0]], 3.0);
        assert_eq!(out[[0, 1, 1]], -1.0);
        assert_eq!(out[[1, 2, 0]], 2.0);

        assert!(keys.gather(&rows, &[3, 3]).is_err());
    }
}
