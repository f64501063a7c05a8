// src/test_util.rs

use crate::{Bar, PriceSeries};

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() <= e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

/// Asserts that two `f64` values are within `1e-9` of each other.
macro_rules! assert_near {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() < 1e-9,
            "assert_near failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;
pub(crate) use assert_near;

/// Series from `(open, high, low, close)` tuples keyed by index, volume 0.
pub fn series_of(bars: &[(f64, f64, f64, f64)]) -> PriceSeries<usize> {
    PriceSeries::from_bars(
        bars.iter()
            .enumerate()
            .map(|(i, &(o, h, l, c))| (i, Bar::new(o, h, l, c, 0.0))),
    )
    .unwrap()
}

/// Series where open, high, low and close all equal the given price.
pub fn closes(prices: &[f64]) -> PriceSeries<usize> {
    PriceSeries::from_bars(
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| (i, Bar::new(p, p, p, p, 0.0))),
    )
    .unwrap()
}

/// Series of `(high, low, close)` bars with open equal to close.
pub fn hlc(bars: &[(f64, f64, f64)]) -> PriceSeries<usize> {
    PriceSeries::from_bars(
        bars.iter()
            .enumerate()
            .map(|(i, &(h, l, c))| (i, Bar::new(c, h, l, c, 0.0))),
    )
    .unwrap()
}

/// Series of `(close, volume)` bars.
pub fn with_volume(bars: &[(f64, f64)]) -> PriceSeries<usize> {
    PriceSeries::from_bars(
        bars.iter()
            .enumerate()
            .map(|(i, &(c, v))| (i, Bar::new(c, c, c, c, v))),
    )
    .unwrap()
}

/// Deterministic zig-zag trend with a real high/low range, for
/// shape and bounds checks.
#[allow(clippy::cast_precision_loss)]
pub fn wavy(len: usize) -> PriceSeries<usize> {
    PriceSeries::from_bars((0..len).map(|i| {
        let t = i as f64;
        let mid = 100.0 + t * 0.3 + (t * 0.7).sin() * 4.0;
        let close = mid + (t * 1.3).cos();
        let bar = Bar::new(
            mid,
            mid.max(close) + 1.0 + (t * 0.5).sin().abs(),
            mid.min(close) - 1.0,
            close,
            1000.0 + (t * 0.9).cos() * 300.0,
        );
        (i, bar)
    }))
    .unwrap()
}

/// Number of leading `NaN` values.
pub fn leading_nan(values: &[f64]) -> usize {
    values.iter().take_while(|v| v.is_nan()).count()
}
