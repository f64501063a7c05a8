use std::{
    fmt::{Debug, Display},
    num::NonZero,
};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, PriceSeries, PriceSource, Result, Series,
    window::{first_defined, undefined},
};

/// Configuration for the Simple Moving Average ([`Sma`]) indicator.
///
/// # Example
///
/// ```rust
/// use indicator_engine::{IndicatorConfig, SmaConfig};
/// use std::num::NonZero;
///
/// let config = SmaConfig::close(NonZero::new(20).unwrap());
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.warm_up(), 19);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct SmaConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for SmaConfig {
    type Builder = SmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        SmaConfigBuilder::new()
    }

    #[inline]
    fn warm_up(&self) -> usize {
        self.length - 1
    }
}

impl SmaConfig {
    /// SMA on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self {
            length: length.get(),
            source: PriceSource::Close,
        }
    }

    /// SMA on median price: `(high + low) / 2`.
    #[must_use]
    pub fn hl2(length: NonZero<usize>) -> Self {
        Self {
            length: length.get(),
            source: PriceSource::HL2,
        }
    }

    /// SMA on average price: `(open + high + low + close) / 4`.
    #[must_use]
    pub fn ohlc4(length: NonZero<usize>) -> Self {
        Self {
            length: length.get(),
            source: PriceSource::OHLC4,
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
}

impl Display for SmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`SmaConfig`].
///
/// Defaults: length = 20, source = [`PriceSource::Close`].
pub struct SmaConfigBuilder {
    length: usize,
    source: PriceSource,
}

impl SmaConfigBuilder {
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

impl IndicatorConfigBuilder<SmaConfig> for SmaConfigBuilder {
    #[inline]
    fn build(self) -> Result<SmaConfig> {
        Ok(SmaConfig {
            length: self.length,
            source: self.source,
        })
    }
}

/// Simple Moving Average (SMA).
///
/// Computes the unweighted mean of the last *n* values, where *n* is the
/// configured window length. The first `n - 1` entries are undefined.
///
/// # Example
///
/// ```rust
/// use indicator_engine::{Bar, PriceSeries, Sma, SmaConfig};
/// use std::num::NonZero;
///
/// let series = PriceSeries::from_bars(
///     [10.0, 20.0, 30.0, 40.0]
///         .into_iter()
///         .enumerate()
///         .map(|(i, p)| (i, Bar::new(p, p, p, p, 0.0))),
/// )
/// .unwrap();
///
/// let sma = Sma::new(SmaConfig::close(NonZero::new(3).unwrap()));
/// let values = sma.compute(&series);
///
/// assert!(values[1].is_nan());
/// assert_eq!(values[2], 20.0);
/// assert_eq!(values[3], 30.0);
/// ```
#[derive(Clone, Debug)]
pub struct Sma {
    config: SmaConfig,
}

impl Indicator for Sma {
    type Config = SmaConfig;
    type Output = Series;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute<K>(&self, series: &PriceSeries<K>) -> Series {
        simple_average(&self.config.source.extract(series), self.config.length)
    }
}

impl Display for Sma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({}, {})", self.config.length, self.config.source)
    }
}

/// Rolling mean over `length` values.
///
/// Leading `NaN` entries (another indicator's warm-up) are skipped: the first
/// output lands `length - 1` places after the first defined input. Each
/// window is summed directly, so bounded inputs give bounded means.
pub(crate) fn simple_average(values: &[f64], length: usize) -> Series {
    let mut out = undefined(values.len());

    let Some(start) = first_defined(values) else {
        return out;
    };

    #[allow(clippy::cast_precision_loss)]
    let divisor = length as f64;

    for i in start.saturating_add(length - 1)..values.len() {
        out[i] = values[i + 1 - length..=i].iter().sum::<f64>() / divisor;
    }

    out
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{closes, leading_nan, series_of};
    use std::num::NonZero;

    fn nz(n: usize) -> NonZero<usize> {
        NonZero::new(n).unwrap()
    }

    fn sma(length: usize, prices: &[f64]) -> Series {
        Sma::new(SmaConfig::close(nz(length))).compute(&closes(prices))
    }

    mod convergence {
        use super::*;

        #[test]
        fn undefined_until_window_full() {
            let out = sma(3, &[10.0, 20.0, 30.0]);
            assert!(out[0].is_nan());
            assert!(out[1].is_nan());
            assert_eq!(out[2], 20.0);
        }

        #[test]
        fn output_has_input_length() {
            assert_eq!(sma(3, &[1.0; 10]).len(), 10);
        }

        #[test]
        fn length_longer_than_history_is_all_undefined() {
            let out = sma(5, &[1.0, 2.0, 3.0]);
            assert_eq!(leading_nan(&out), 3);
        }

        #[test]
        fn warm_up_matches_leading_nan() {
            let config = SmaConfig::close(nz(4));
            let out = Sma::new(config).compute(&closes(&[1.0; 8]));
            assert_eq!(leading_nan(&out), config.warm_up());
        }
    }

    mod values {
        use super::*;

        #[test]
        fn slides_across_bars() {
            let out = sma(2, &[1.0, 2.0, 3.0, 4.0, 5.0]);
            assert_eq!(&out[1..], &[1.5, 2.5, 3.5, 4.5]);
        }

        #[test]
        fn length_one_is_identity() {
            assert_eq!(sma(1, &[3.0, 7.0, 5.0]), vec![3.0, 7.0, 5.0]);
        }

        #[test]
        fn uses_configured_source() {
            // HL2: (20 + 10) / 2 = 15, (30 + 10) / 2 = 20
            let series = series_of(&[(0.0, 20.0, 10.0, 0.0), (0.0, 30.0, 10.0, 0.0)]);
            let out = Sma::new(SmaConfig::hl2(nz(2))).compute(&series);
            assert_eq!(out[1], 17.5);
        }
    }

    mod skipping_warm_up {
        use super::*;

        #[test]
        fn starts_after_first_defined_value() {
            let input = [f64::NAN, f64::NAN, 1.0, 2.0, 3.0];
            let out = simple_average(&input, 2);
            assert_eq!(leading_nan(&out), 3);
            assert_eq!(&out[3..], &[1.5, 2.5]);
        }

        #[test]
        fn all_undefined_input_stays_undefined() {
            let out = simple_average(&[f64::NAN; 4], 2);
            assert!(out.iter().all(|v| v.is_nan()));
        }

        #[test]
        fn bounded_input_gives_bounded_mean() {
            let out = simple_average(&[100.0, 100.0, 100.0, 100.0], 3);
            assert!(out[2..].iter().all(|&v| v == 100.0));
        }
    }

    mod config {
        use super::*;

        #[test]
        fn builder_defaults() {
            let config = SmaConfig::builder().build().unwrap();
            assert_eq!(config.length(), 20);
            assert_eq!(config.source(), PriceSource::Close);
        }

        #[test]
        fn builder_overrides() {
            let config = SmaConfig::builder()
                .length(nz(50))
                .source(PriceSource::OHLC4)
                .build()
                .unwrap();
            assert_eq!(config, SmaConfig::ohlc4(nz(50)));
        }

        #[test]
        fn display() {
            assert_eq!(SmaConfig::close(nz(20)).to_string(), "SmaConfig(20, Close)");
            assert_eq!(Sma::new(SmaConfig::close(nz(20))).to_string(), "SMA(20, Close)");
        }
    }
}
