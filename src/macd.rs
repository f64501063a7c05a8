use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorError, IntoLines, NamedSeries,
    PriceSeries, PriceSource, Result, Series, ema::exponential_average, window::undefined,
};

/// Configuration for the [`Macd`] indicator.
///
/// The MACD line is defined from index `slow`, where both EMAs are past
/// their seeds. The signal line is seeded by the mean of the first `signal`
/// MACD values, so it is first defined at `slow + signal - 1`, which is
/// what [`warm_up`](IndicatorConfig::warm_up) reports.
///
/// # Example
///
/// ```
/// use indicator_engine::{IndicatorConfig, IndicatorConfigBuilder, MacdConfig};
///
/// let config = MacdConfig::builder().build().unwrap();
/// assert_eq!(config.to_string(), "MacdConfig(12, 26, 9, Close)");
/// assert_eq!(config.warm_up(), 34);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct MacdConfig {
    fast: usize,
    slow: usize,
    signal: usize,
    source: PriceSource,
}

impl IndicatorConfig for MacdConfig {
    type Builder = MacdConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        MacdConfigBuilder::new()
    }

    #[inline]
    fn warm_up(&self) -> usize {
        self.slow.saturating_add(self.signal) - 1
    }
}

impl MacdConfig {
    #[inline]
    #[must_use]
    pub fn fast(&self) -> usize {
        self.fast
    }

    #[inline]
    #[must_use]
    pub fn slow(&self) -> usize {
        self.slow
    }

    #[inline]
    #[must_use]
    pub fn signal(&self) -> usize {
        self.signal
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }
}

impl Display for MacdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MacdConfig({}, {}, {}, {})",
            self.fast, self.slow, self.signal, self.source
        )
    }
}

/// Builder for [`MacdConfig`].
///
/// Defaults: fast = 12, slow = 26, signal = 9, source =
/// [`PriceSource::Close`].
pub struct MacdConfigBuilder {
    fast: usize,
    slow: usize,
    signal: usize,
    source: PriceSource,
}

impl MacdConfigBuilder {
    fn new() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
            source: PriceSource::Close,
        }
    }

    #[inline]
    #[must_use]
    pub fn fast(mut self, fast: NonZero<usize>) -> Self {
        self.fast = fast.get();
        self
    }

    #[inline]
    #[must_use]
    pub fn slow(mut self, slow: NonZero<usize>) -> Self {
        self.slow = slow.get();
        self
    }

    #[inline]
    #[must_use]
    pub fn signal(mut self, signal: NonZero<usize>) -> Self {
        self.signal = signal.get();
        self
    }

    #[inline]
    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<MacdConfig> for MacdConfigBuilder {
    fn build(self) -> Result<MacdConfig> {
        if self.fast >= self.slow {
            return Err(IndicatorError::invalid(
                "macd",
                format!(
                    "fast period ({}) must be below slow period ({})",
                    self.fast, self.slow
                ),
            ));
        }
        if self.signal >= self.slow {
            return Err(IndicatorError::invalid(
                "macd",
                format!(
                    "signal period ({}) must be below slow period ({})",
                    self.signal, self.slow
                ),
            ));
        }

        Ok(MacdConfig {
            fast: self.fast,
            slow: self.slow,
            signal: self.signal,
            source: self.source,
        })
    }
}

/// MACD lines plus the two EMAs they are derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    /// `fast − slow`, defined from index `slow`.
    pub macd: Series,
    /// EMA of the MACD line.
    pub signal: Series,
    /// `macd − signal`.
    pub histogram: Series,
    /// Fast EMA of the source.
    pub fast: Series,
    /// Slow EMA of the source.
    pub slow: Series,
}

impl IntoLines for MacdOutput {
    /// Emits `macd`, `signal` and `histogram`. The EMAs stay on the struct.
    fn into_lines(self) -> Vec<NamedSeries> {
        vec![
            NamedSeries::new("macd", self.macd),
            NamedSeries::new("signal", self.signal),
            NamedSeries::new("histogram", self.histogram),
        ]
    }
}

/// Moving Average Convergence Divergence.
///
/// ```text
/// MACD      = EMA(fast) − EMA(slow)
/// signal    = EMA(MACD, signal)
/// histogram = MACD − signal
/// ```
///
/// Each EMA is seeded by the simple mean of its own first window and both
/// advance on every bar. The MACD line starts at index `slow`, the first bar
/// where the slow EMA has taken a step past its seed.
#[derive(Clone, Debug)]
pub struct Macd {
    config: MacdConfig,
}

impl Indicator for Macd {
    type Config = MacdConfig;
    type Output = MacdOutput;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute<K>(&self, series: &PriceSeries<K>) -> MacdOutput {
        let prices = self.config.source.extract(series);
        let fast = exponential_average(&prices, self.config.fast);
        let slow = exponential_average(&prices, self.config.slow);

        let mut macd = undefined(prices.len());
        for i in self.config.slow..prices.len() {
            macd[i] = fast[i] - slow[i];
        }

        let signal = exponential_average(&macd, self.config.signal);
        let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

        MacdOutput {
            macd,
            signal,
            histogram,
            fast,
            slow,
        }
    }
}

impl Display for Macd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({}, {}, {}, {})",
            self.config.fast, self.config.slow, self.config.signal, self.config.source
        )
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{assert_near, closes, leading_nan, wavy};

    fn nz(n: usize) -> NonZero<usize> {
        NonZero::new(n).unwrap()
    }

    fn config(fast: usize, slow: usize, signal: usize) -> MacdConfig {
        MacdConfig::builder()
            .fast(nz(fast))
            .slow(nz(slow))
            .signal(nz(signal))
            .build()
            .unwrap()
    }

    mod warm_up {
        use super::*;

        #[test]
        fn macd_starts_at_slow() {
            let out = Macd::new(config(12, 26, 9)).compute(&wavy(80));
            assert_eq!(leading_nan(&out.macd), 26);
        }

        #[test]
        fn signal_starts_at_slow_plus_signal_minus_one() {
            let cfg = config(12, 26, 9);
            let out = Macd::new(cfg).compute(&wavy(80));
            assert_eq!(leading_nan(&out.signal), 34);
            assert_eq!(leading_nan(&out.histogram), cfg.warm_up());
        }

        #[test]
        fn short_history_is_all_undefined() {
            let out = Macd::new(config(12, 26, 9)).compute(&wavy(20));
            assert!(out.macd.iter().all(|v| v.is_nan()));
            assert!(out.signal.iter().all(|v| v.is_nan()));
        }
    }

    mod values {
        use super::*;

        #[test]
        fn macd_is_fast_minus_slow() {
            let out = Macd::new(config(12, 26, 9)).compute(&wavy(120));
            for i in 26..120 {
                assert_eq!(out.macd[i], out.fast[i] - out.slow[i]);
            }
        }

        #[test]
        fn signal_seed_is_mean_of_first_macd_values() {
            let out = Macd::new(config(3, 5, 2)).compute(&wavy(30));
            assert_near!(out.signal[6], (out.macd[5] + out.macd[6]) / 2.0);
        }

        #[test]
        fn flat_prices_give_zero_lines() {
            let out = Macd::new(config(3, 5, 2)).compute(&closes(&[7.5; 20]));
            assert!(out.macd[5..].iter().all(|&v| v == 0.0));
            assert!(out.histogram[6..].iter().all(|&v| v == 0.0));
        }

        #[test]
        fn rising_prices_give_positive_macd() {
            let prices: Vec<f64> = (1..=40).map(f64::from).collect();
            let out = Macd::new(config(3, 6, 2)).compute(&closes(&prices));
            assert!(out.macd[6..].iter().all(|&v| v > 0.0));
        }
    }

    mod config {
        use super::*;

        #[test]
        fn rejects_fast_not_below_slow() {
            let result = MacdConfig::builder().fast(nz(26)).slow(nz(12)).build();
            assert!(matches!(
                result,
                Err(IndicatorError::InvalidParameter { indicator: "macd", .. })
            ));
        }

        #[test]
        fn rejects_signal_not_below_slow() {
            let result = MacdConfig::builder().slow(nz(9)).fast(nz(3)).signal(nz(9)).build();
            assert!(result.is_err());
        }

        #[test]
        fn lines_exclude_emas() {
            let out = Macd::new(config(3, 5, 2)).compute(&wavy(10));
            let names: Vec<_> = out.into_lines().into_iter().map(|l| l.name).collect();
            assert_eq!(names, ["macd", "signal", "histogram"]);
        }

        #[test]
        fn display() {
            assert_eq!(Macd::new(config(12, 26, 9)).to_string(), "MACD(12, 26, 9, Close)");
        }
    }
}
