use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, PriceSeries, PriceSource, Result, Series,
    window::{first_defined, undefined},
};

/// Configuration for the Exponential Moving Average ([`Ema`]) indicator.
///
/// # Convergence
///
/// The EMA is seeded with the SMA of the first `length` values, so the first
/// value appears at index `length - 1`. The seed's influence decays
/// exponentially but never fully disappears.
///
/// # Example
///
/// ```
/// use indicator_engine::{EmaConfig, IndicatorConfig};
/// use std::num::NonZero;
///
/// let config = EmaConfig::close(NonZero::new(20).unwrap());
///
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.warm_up(), 19);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct EmaConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for EmaConfig {
    type Builder = EmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        EmaConfigBuilder::new()
    }

    #[inline]
    fn warm_up(&self) -> usize {
        self.length - 1
    }
}

impl EmaConfig {
    /// EMA on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self {
            length: length.get(),
            source: PriceSource::Close,
        }
    }

    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Price source the average is computed on.
    #[inline]
    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }

    /// Smoothing factor `α = 2 / (length + 1)`.
    #[inline]
    #[must_use]
    pub fn alpha(&self) -> f64 {
        smoothing_factor(self.length)
    }
}

impl Display for EmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`EmaConfig`].
///
/// Defaults: length = 20, source = [`PriceSource::Close`].
pub struct EmaConfigBuilder {
    length: usize,
    source: PriceSource,
}

impl EmaConfigBuilder {
    fn new() -> Self {
        Self {
            length: 20,
            source: PriceSource::Close,
        }
    }

    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = length.get();
        self
    }

    #[inline]
    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<EmaConfig> for EmaConfigBuilder {
    #[inline]
    fn build(self) -> Result<EmaConfig> {
        Ok(EmaConfig {
            length: self.length,
            source: self.source,
        })
    }
}

/// Exponential Moving Average (EMA).
///
/// A weighted moving average that gives more weight to recent
/// prices. Uses the standard smoothing factor
/// `α = 2 / (length + 1)`. Each value is computed as:
///
/// ```text
/// EMA = α × price + (1 − α) × prev_EMA
/// ```
///
/// The accumulator is seeded with the SMA of the first `length`
/// values and then advanced left to right with a single fused
/// multiply-add per bar.
///
/// # Example
///
/// ```
/// use indicator_engine::{Bar, Ema, EmaConfig, PriceSeries};
/// use std::num::NonZero;
///
/// let series = PriceSeries::from_bars(
///     [2.0, 4.0, 6.0, 8.0]
///         .into_iter()
///         .enumerate()
///         .map(|(i, p)| (i, Bar::new(p, p, p, p, 0.0))),
/// )
/// .unwrap();
///
/// let ema = Ema::new(EmaConfig::close(NonZero::new(3).unwrap()));
/// let values = ema.compute(&series);
///
/// // SMA seed = (2 + 4 + 6) / 3 = 4.0
/// assert_eq!(values[2], 4.0);
///
/// // EMA(3) α = 0.5: 8 × 0.5 + 4 × 0.5 = 6.0
/// assert_eq!(values[3], 6.0);
/// ```
#[derive(Clone, Debug)]
pub struct Ema {
    config: EmaConfig,
}

impl Indicator for Ema {
    type Config = EmaConfig;
    type Output = Series;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute<K>(&self, series: &PriceSeries<K>) -> Series {
        exponential_average(&self.config.source.extract(series), self.config.length)
    }
}

impl Display for Ema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({}, {})", self.config.length, self.config.source)
    }
}

#[inline]
pub(crate) fn smoothing_factor(length: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let length = length as f64;
    2.0 / (length + 1.0)
}

/// One EMA step: `α × value + (1 − α) × previous`.
#[inline]
pub(crate) fn advance(alpha: f64, previous: f64, value: f64) -> f64 {
    alpha.mul_add(value - previous, previous)
}

/// SMA-seeded EMA over `values`.
///
/// Leading `NaN` entries are skipped, so the seed covers the first `length`
/// defined values and the first output lands at `first_defined + length - 1`.
pub(crate) fn exponential_average(values: &[f64], length: usize) -> Series {
    let mut out = undefined(values.len());

    let Some(start) = first_defined(values) else {
        return out;
    };
    let seed_end = start.saturating_add(length);
    if seed_end > values.len() {
        return out;
    }

    #[allow(clippy::cast_precision_loss)]
    let mut ema = values[start..seed_end].iter().sum::<f64>() / length as f64;
    out[seed_end - 1] = ema;

    let alpha = smoothing_factor(length);
    for i in seed_end..values.len() {
        ema = advance(alpha, ema, values[i]);
        out[i] = ema;
    }

    out
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, closes, leading_nan};
    use std::num::NonZero;

    fn nz(n: usize) -> NonZero<usize> {
        NonZero::new(n).unwrap()
    }

    fn ema(length: usize, prices: &[f64]) -> Series {
        Ema::new(EmaConfig::close(nz(length))).compute(&closes(prices))
    }

    mod seeding {
        use super::*;

        #[test]
        fn undefined_before_seed() {
            let out = ema(3, &[2.0, 4.0, 6.0]);
            assert_eq!(leading_nan(&out), 2);
        }

        #[test]
        fn seed_is_simple_mean() {
            let out = ema(3, &[2.0, 4.0, 6.0]);
            assert_eq!(out[2], 4.0);
        }

        #[test]
        fn too_short_history_is_all_undefined() {
            let out = ema(5, &[1.0, 2.0]);
            assert!(out.iter().all(|v| v.is_nan()));
        }
    }

    mod smoothing {
        use super::*;

        #[test]
        fn alpha_is_two_over_length_plus_one() {
            assert_approx!(EmaConfig::close(nz(3)).alpha(), 0.5);
            assert_approx!(EmaConfig::close(nz(9)).alpha(), 0.2);
        }

        #[test]
        fn advances_with_alpha() {
            // seed 4, then 0.5 × 8 + 0.5 × 4 = 6, then 0.5 × 10 + 0.5 × 6 = 8
            let out = ema(3, &[2.0, 4.0, 6.0, 8.0, 10.0]);
            assert_eq!(&out[2..], &[4.0, 6.0, 8.0]);
        }

        #[test]
        fn constant_input_stays_constant() {
            let out = ema(4, &[7.0; 12]);
            assert!(out[3..].iter().all(|&v| v == 7.0));
        }

        #[test]
        fn length_one_tracks_input() {
            assert_eq!(ema(1, &[3.0, 5.0, 4.0]), vec![3.0, 5.0, 4.0]);
        }
    }

    mod skipping_warm_up {
        use super::*;

        #[test]
        fn seeds_after_first_defined_value() {
            let out = exponential_average(&[f64::NAN, 2.0, 4.0, 6.0, 8.0], 3);
            assert_eq!(leading_nan(&out), 3);
            assert_eq!(out[3], 4.0);
            assert_eq!(out[4], 6.0);
        }
    }

    mod config {
        use super::*;

        #[test]
        fn builder_defaults() {
            let config = EmaConfig::builder().build().unwrap();
            assert_eq!(config.length(), 20);
            assert_eq!(config.source(), PriceSource::Close);
        }

        #[test]
        fn display() {
            assert_eq!(EmaConfig::close(nz(9)).to_string(), "EmaConfig(9, Close)");
            assert_eq!(Ema::new(EmaConfig::close(nz(9))).to_string(), "EMA(9, Close)");
        }
    }
}
