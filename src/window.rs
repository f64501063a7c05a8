use std::collections::VecDeque;

use crate::{Price, Series};

/// All-undefined series of `len` values.
#[inline]
pub(crate) fn undefined(len: usize) -> Series {
    vec![f64::NAN; len]
}

/// Index of the first defined (non-`NaN`) value.
#[inline]
pub(crate) fn first_defined(values: &[f64]) -> Option<usize> {
    values.iter().position(|v| !v.is_nan())
}

/// Arithmetic mean of a non-empty slice.
#[inline]
pub(crate) fn mean(values: &[f64]) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let len = values.len() as f64;
    values.iter().sum::<f64>() / len
}

/// Sample standard deviation (`N - 1` denominator) of a slice with at least
/// two values, computed in two passes around the mean.
#[inline]
pub(crate) fn sample_std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let squares: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    #[allow(clippy::cast_precision_loss)]
    let denominator = (values.len() - 1) as f64;
    (squares / denominator).sqrt()
}

/// Rolling maximum over the trailing `length` values; defined from index
/// `length - 1`.
pub(crate) fn rolling_max(values: &[Price], length: usize) -> Series {
    rolling_extreme(values, length, |kept, new| kept > new)
}

/// Rolling minimum over the trailing `length` values; defined from index
/// `length - 1`.
pub(crate) fn rolling_min(values: &[Price], length: usize) -> Series {
    rolling_extreme(values, length, |kept, new| kept < new)
}

/// Midpoint of the rolling highest high and lowest low. Shared by Donchian
/// and the Ichimoku lines.
pub(crate) fn midpoint_channel(high: &[Price], low: &[Price], length: usize) -> Series {
    rolling_max(high, length)
        .into_iter()
        .zip(rolling_min(low, length))
        .map(|(h, l)| f64::midpoint(h, l))
        .collect()
}

/// Monotonic-deque sliding extreme. `dominates(kept, new)` decides whether an
/// older candidate survives the arrival of `new`.
fn rolling_extreme(
    values: &[Price],
    length: usize,
    dominates: impl Fn(f64, f64) -> bool,
) -> Series {
    let mut out = undefined(values.len());
    let mut candidates: VecDeque<usize> = VecDeque::with_capacity(length.min(values.len()));

    for (i, &value) in values.iter().enumerate() {
        while candidates
            .back()
            .is_some_and(|&j| !dominates(values[j], value))
        {
            candidates.pop_back();
        }
        candidates.push_back(i);

        if candidates.front().is_some_and(|&j| i - j >= length) {
            candidates.pop_front();
        }

        if i + 1 >= length
            && let Some(&j) = candidates.front()
        {
            out[i] = values[j];
        }
    }

    out
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::assert_approx;

    mod stats {
        use super::*;

        #[test]
        fn mean_of_window() {
            assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
        }

        #[test]
        fn sample_std_dev_uses_n_minus_one() {
            // mean 2, squares 1 + 0 + 1 = 2, 2 / 2 = 1
            assert_eq!(sample_std_dev(&[1.0, 2.0, 3.0]), 1.0);
        }

        #[test]
        fn sample_std_dev_of_constant_is_zero() {
            assert_eq!(sample_std_dev(&[5.0, 5.0, 5.0, 5.0]), 0.0);
        }

        #[test]
        fn first_defined_skips_nan() {
            assert_eq!(first_defined(&[f64::NAN, f64::NAN, 1.0]), Some(2));
            assert_eq!(first_defined(&[f64::NAN]), None);
        }
    }

    mod extremes {
        use super::*;

        #[test]
        fn rolling_max_slides() {
            let out = rolling_max(&[1.0, 3.0, 2.0, 0.5, 0.25], 2);
            assert!(out[0].is_nan());
            assert_eq!(&out[1..], &[3.0, 3.0, 2.0, 0.5]);
        }

        #[test]
        fn rolling_min_slides() {
            let out = rolling_min(&[4.0, 2.0, 3.0, 5.0, 1.0], 3);
            assert!(out[0].is_nan() && out[1].is_nan());
            assert_eq!(&out[2..], &[2.0, 2.0, 1.0]);
        }

        #[test]
        fn window_longer_than_input_is_undefined() {
            let out = rolling_max(&[1.0, 2.0], 3);
            assert!(out.iter().all(|v| v.is_nan()));
        }

        #[test]
        fn window_of_max_length_is_undefined() {
            let out = rolling_min(&[1.0, 2.0, 3.0], usize::MAX);
            assert!(out.iter().all(|v| v.is_nan()));
        }

        #[test]
        fn window_of_one_is_identity() {
            assert_eq!(rolling_min(&[3.0, 1.0, 2.0], 1), vec![3.0, 1.0, 2.0]);
        }

        #[test]
        fn ties_keep_value() {
            assert_eq!(rolling_max(&[2.0, 2.0, 2.0], 2)[1..], [2.0, 2.0]);
        }

        #[test]
        fn midpoint_of_channel() {
            let out = midpoint_channel(&[10.0, 12.0, 11.0], &[8.0, 9.0, 5.0], 2);
            assert!(out[0].is_nan());
            assert_approx!(out[1], 10.0);
            assert_approx!(out[2], 8.5);
        }
    }
}
