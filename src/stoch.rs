use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorError, IntoLines, NamedSeries,
    Price, PriceSeries, Result, Series,
    sma::simple_average,
    window::{rolling_max, rolling_min, undefined},
};

/// Raw %K when the look-back range is zero.
pub(crate) const FLAT_RANGE_K: f64 = 50.0;

/// Configuration for the [`Stochastic`] oscillator.
///
/// Raw %K is defined from index `length - 1`; smoothing and the signal line
/// each add their own window, so %D is first defined at
/// `length + smooth + signal - 3`.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct StochasticConfig {
    length: usize,
    smooth: usize,
    signal: usize,
}

impl IndicatorConfig for StochasticConfig {
    type Builder = StochasticConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        StochasticConfigBuilder::new()
    }

    #[inline]
    fn warm_up(&self) -> usize {
        self.length
            .saturating_add(self.smooth)
            .saturating_add(self.signal)
            - 3
    }
}

impl StochasticConfig {
    /// Look-back for the highest high and lowest low.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// SMA window applied to raw %K.
    #[inline]
    #[must_use]
    pub fn smooth(&self) -> usize {
        self.smooth
    }

    /// SMA window applied to smoothed %K to form %D.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> usize {
        self.signal
    }
}

impl Display for StochasticConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StochasticConfig({}, {}, {})",
            self.length, self.smooth, self.signal
        )
    }
}

/// Builder for [`StochasticConfig`].
///
/// Defaults: length = 14, smooth = 3, signal = 3.
pub struct StochasticConfigBuilder {
    length: usize,
    smooth: usize,
    signal: usize,
}

impl StochasticConfigBuilder {
    fn new() -> Self {
        Self {
            length: 14,
            smooth: 3,
            signal: 3,
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
    pub fn smooth(mut self, smooth: NonZero<usize>) -> Self {
        self.smooth = smooth.get();
        self
    }

    #[inline]
    #[must_use]
    pub fn signal(mut self, signal: NonZero<usize>) -> Self {
        self.signal = signal.get();
        self
    }
}

impl IndicatorConfigBuilder<StochasticConfig> for StochasticConfigBuilder {
    fn build(self) -> Result<StochasticConfig> {
        if self.signal >= self.length {
            return Err(IndicatorError::invalid(
                "stochastic",
                format!(
                    "signal period ({}) must be below the %K period ({})",
                    self.signal, self.length
                ),
            ));
        }

        Ok(StochasticConfig {
            length: self.length,
            smooth: self.smooth,
            signal: self.signal,
        })
    }
}

/// %K and %D lines shared by [`Stochastic`] and
/// [`StochasticRsi`](crate::StochasticRsi).
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticOutput {
    /// Smoothed %K.
    pub k: Series,
    /// %D: SMA of smoothed %K.
    pub d: Series,
}

impl IntoLines for StochasticOutput {
    fn into_lines(self) -> Vec<NamedSeries> {
        vec![NamedSeries::new("k", self.k), NamedSeries::new("d", self.d)]
    }
}

/// Stochastic Oscillator.
///
/// ```text
/// raw %K = (close − LL) / (HH − LL) × 100
/// %K     = SMA(raw %K, smooth)
/// %D     = SMA(%K, signal)
/// ```
///
/// `HH`/`LL` are the highest high and lowest low over the last `length`
/// bars. A zero range gives a raw %K of 50. Histories shorter than `length`
/// give all-undefined lines.
#[derive(Clone, Debug)]
pub struct Stochastic {
    config: StochasticConfig,
}

impl Indicator for Stochastic {
    type Config = StochasticConfig;
    type Output = StochasticOutput;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute<K>(&self, series: &PriceSeries<K>) -> StochasticOutput {
        let highest = rolling_max(series.high(), self.config.length);
        let lowest = rolling_min(series.low(), self.config.length);

        let mut raw = undefined(series.len());
        for (i, value) in raw.iter_mut().enumerate() {
            if !highest[i].is_nan() {
                *value = percent_k(series.close()[i], highest[i], lowest[i]);
            }
        }

        let k = simple_average(&raw, self.config.smooth);
        let d = simple_average(&k, self.config.signal);

        StochasticOutput { k, d }
    }
}

impl Display for Stochastic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "STOCH({}, {}, {})",
            self.config.length, self.config.smooth, self.config.signal
        )
    }
}

/// Position of `value` inside `[lowest, highest]`, scaled to 0–100.
#[inline]
pub(crate) fn percent_k(value: Price, highest: Price, lowest: Price) -> f64 {
    let range = highest - lowest;
    if range == 0.0 {
        FLAT_RANGE_K
    } else {
        (value - lowest) / range * 100.0
    }
}
