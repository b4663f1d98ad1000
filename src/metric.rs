//! Distance functions over coordinate slices.
//!
//! Distances must be finite and non-negative. Search is exact only when the
//! metric is also symmetric and obeys the triangle inequality. Nothing
//! checks those two properties at runtime; a function that violates them
//! may cause searches to miss true neighbors.

use crate::error::{Error, Result};
use crate::Scalar;

/// A distance between two coordinate vectors of equal length.
pub trait Metric<F> {
    fn distance(&self, a: &[F], b: &[F]) -> F;
}

impl<F, D> Metric<F> for D
where
    D: Fn(&[F], &[F]) -> F,
{
    fn distance(&self, a: &[F], b: &[F]) -> F {
        self(a, b)
    }
}

/// Manhattan (taxicab) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct L1;

impl<F: Scalar> Metric<F> for L1 {
    fn distance(&self, a: &[F], b: &[F]) -> F {
        a.iter()
            .zip(b.iter())
            .fold(F::zero(), |acc, (&x, &y)| acc + (y - x).abs())
    }
}

/// Euclidean distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct L2;

impl<F: Scalar> Metric<F> for L2 {
    fn distance(&self, a: &[F], b: &[F]) -> F {
        a.iter()
            .zip(b.iter())
            .fold(F::zero(), |acc, (&x, &y)| {
                let d = y - x;
                acc + d * d
            })
            .sqrt()
    }
}

/// Evaluate `metric`, rejecting NaN, infinite and negative results.
///
/// Pruning subtracts distances from one another, so an infinite distance
/// would turn the bounds into NaN and silently drop subtrees.
pub(crate) fn checked_distance<F: Scalar, M: Metric<F>>(metric: &M, a: &[F], b: &[F]) -> Result<F> {
    let d = metric.distance(a, b);
    if !d.is_finite() || d < F::zero() {
        return Err(Error::InvalidDistance(format!(
            "distance function returned {}",
            d
        )));
    }
    Ok(d)
}
