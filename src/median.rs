use std::cmp::Ordering;

use order_stat::kth_by;

use crate::Scalar;

/// Compare two scalars, treating incomparable values as equal.
///
/// Distances are validated before they reach a selection, so NaN never
/// shows up here in practice.
pub(crate) fn cmp_scalar<F: Scalar>(x: &F, y: &F) -> Ordering {
    x.partial_cmp(y).unwrap_or(Ordering::Equal)
}

/// Median of `values`, or `None` when empty.
///
/// An even count yields the midpoint of the two middle values. The slice is
/// reordered in the process.
///
/// ```
/// use vpindex::median;
/// assert_eq!(median(&mut [3.0]), Some(3.0));
/// assert_eq!(median(&mut [1.0, 2.0]), Some(1.5));
/// assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&mut [4.0, 1.0, 1.0, 9.0]), Some(2.5));
/// assert_eq!(median::<f64>(&mut []), None);
/// ```
pub fn median<F: Scalar>(values: &mut [F]) -> Option<F> {
    let n = values.len();
    if n == 0 {
        return None;
    }

    let mid = n / 2;
    let upper = *kth_by(values, mid, cmp_scalar);
    if n % 2 == 1 {
        return Some(upper);
    }

    let lower = *kth_by(values, mid - 1, cmp_scalar);
    let two = F::one() + F::one();
    Some(lower + (upper - lower) / two)
}
