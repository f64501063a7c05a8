use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorError, PriceSeries, Result,
    StochasticOutput,
    rsi::relative_strength,
    sma::simple_average,
    stoch::percent_k,
    window::undefined,
};

/// Configuration for the [`StochasticRsi`] indicator.
///
/// Warm-up accumulates across the composed windows: %D is first defined at
/// `max(rsi_length, stoch_length) + smooth + signal − 2`.
///
/// # Example
///
/// ```
/// use indicator_engine::{IndicatorConfig, IndicatorConfigBuilder, StochasticRsiConfig};
///
/// let config = StochasticRsiConfig::builder().build().unwrap();
/// assert_eq!(config.to_string(), "StochasticRsiConfig(14, 14, 3, 3)");
/// assert_eq!(config.warm_up(), 18);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct StochasticRsiConfig {
    rsi_length: usize,
    stoch_length: usize,
    smooth: usize,
    signal: usize,
}

impl IndicatorConfig for StochasticRsiConfig {
    type Builder = StochasticRsiConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        StochasticRsiConfigBuilder::new()
    }

    #[inline]
    fn warm_up(&self) -> usize {
        self.rsi_length
            .max(self.stoch_length)
            .saturating_add(self.smooth)
            .saturating_add(self.signal)
            - 2
    }
}

impl StochasticRsiConfig {
    #[inline]
    #[must_use]
    pub fn rsi_length(&self) -> usize {
        self.rsi_length
    }

    #[inline]
    #[must_use]
    pub fn stoch_length(&self) -> usize {
        self.stoch_length
    }

    #[inline]
    #[must_use]
    pub fn smooth(&self) -> usize {
        self.smooth
    }

    #[inline]
    #[must_use]
    pub fn signal(&self) -> usize {
        self.signal
    }
}

impl Display for StochasticRsiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StochasticRsiConfig({}, {}, {}, {})",
            self.rsi_length, self.stoch_length, self.smooth, self.signal
        )
    }
}

/// Builder for [`StochasticRsiConfig`].
///
/// Defaults: RSI 14, stochastic 14, smooth 3, signal 3.
pub struct StochasticRsiConfigBuilder {
    rsi_length: usize,
    stoch_length: usize,
    smooth: usize,
    signal: usize,
}

impl StochasticRsiConfigBuilder {
    fn new() -> Self {
        Self {
            rsi_length: 14,
            stoch_length: 14,
            smooth: 3,
            signal: 3,
        }
    }

    #[inline]
    #[must_use]
    pub fn rsi_length(mut self, length: NonZero<usize>) -> Self {
        self.rsi_length = length.get();
        self
    }

    #[inline]
    #[must_use]
    pub fn stoch_length(mut self, length: NonZero<usize>) -> Self {
        self.stoch_length = length.get();
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

impl IndicatorConfigBuilder<StochasticRsiConfig> for StochasticRsiConfigBuilder {
    fn build(self) -> Result<StochasticRsiConfig> {
        if self.signal >= self.stoch_length {
            return Err(IndicatorError::invalid(
                "stochrsi",
                format!(
                    "signal period ({}) must be below the stochastic period ({})",
                    self.signal, self.stoch_length
                ),
            ));
        }

        Ok(StochasticRsiConfig {
            rsi_length: self.rsi_length,
            stoch_length: self.stoch_length,
            smooth: self.smooth,
            signal: self.signal,
        })
    }
}

/// Stochastic RSI: the stochastic oscillator applied to the RSI line.
///
/// Raw %K at index `i ≥ max(rsi_length, stoch_length)` places `RSI[i]`
/// within the min/max of the trailing `stoch_length` RSI values, clipped to
/// the range where RSI is defined. A flat window gives 50. %K and %D are
/// SMA-smoothed exactly as in [`Stochastic`](crate::Stochastic).
#[derive(Clone, Debug)]
pub struct StochasticRsi {
    config: StochasticRsiConfig,
}

impl Indicator for StochasticRsi {
    type Config = StochasticRsiConfig;
    type Output = StochasticOutput;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute<K>(&self, series: &PriceSeries<K>) -> StochasticOutput {
        let StochasticRsiConfig {
            rsi_length,
            stoch_length,
            smooth,
            signal,
        } = self.config;

        let rsi = relative_strength(series.close(), rsi_length);

        let mut raw = undefined(series.len());
        for i in rsi_length.max(stoch_length)..series.len() {
            let window = &rsi[(i + 1 - stoch_length).max(rsi_length)..=i];
            let highest = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let lowest = window.iter().copied().fold(f64::INFINITY, f64::min);
            raw[i] = percent_k(rsi[i], highest, lowest);
        }

        let k = simple_average(&raw, smooth);
        let d = simple_average(&k, signal);

        StochasticOutput { k, d }
    }
}

impl Display for StochasticRsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = self.config;
        write!(
            f,
            "STOCHRSI({}, {}, {}, {})",
            c.rsi_length, c.stoch_length, c.smooth, c.signal
        )
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{closes, leading_nan, wavy};

    fn nz(n: usize) -> NonZero<usize> {
        NonZero::new(n).unwrap()
    }

    fn config(rsi: usize, stoch: usize, smooth: usize, signal: usize) -> StochasticRsiConfig {
        StochasticRsiConfig::builder()
            .rsi_length(nz(rsi))
            .stoch_length(nz(stoch))
            .smooth(nz(smooth))
            .signal(nz(signal))
            .build()
            .unwrap()
    }

    mod warm_up {
        use super::*;

        #[test]
        fn d_starts_at_composed_warm_up() {
            let cfg = config(14, 14, 3, 3);
            let out = StochasticRsi::new(cfg).compute(&wavy(80));
            assert_eq!(leading_nan(&out.d), 18);
            assert_eq!(leading_nan(&out.d), cfg.warm_up());
        }

        #[test]
        fn k_starts_before_d() {
            let out = StochasticRsi::new(config(14, 14, 3, 3)).compute(&wavy(80));
            assert_eq!(leading_nan(&out.k), 16);
        }

        #[test]
        fn stoch_length_shorter_than_rsi() {
            let cfg = config(10, 4, 2, 2);
            let out = StochasticRsi::new(cfg).compute(&wavy(60));
            assert_eq!(leading_nan(&out.d), cfg.warm_up());
            assert_eq!(cfg.warm_up(), 12);
        }

        #[test]
        fn everything_after_warm_up_is_finite() {
            let cfg = config(14, 14, 3, 3);
            let out = StochasticRsi::new(cfg).compute(&wavy(120));
            assert!(out.d[cfg.warm_up()..].iter().all(|v| v.is_finite()));
        }
    }

    mod degenerate {
        use super::*;

        #[test]
        fn flat_rsi_gives_midpoint() {
            // Flat prices: RSI is constantly 100, so every window is flat.
            let out = StochasticRsi::new(config(3, 3, 1, 1)).compute(&closes(&[10.0; 12]));
            assert!(out.k[3..].iter().all(|&v| v == 50.0));
        }

        #[test]
        fn monotonic_rise_is_flat_rsi() {
            let prices: Vec<f64> = (1..=20).map(f64::from).collect();
            let out = StochasticRsi::new(config(3, 3, 1, 1)).compute(&closes(&prices));
            assert!(out.d[3..].iter().all(|&v| v == 50.0));
        }
    }

    mod bounds {
        use super::*;

        #[test]
        fn stays_in_range() {
            let out = StochasticRsi::new(config(14, 14, 3, 3)).compute(&wavy(300));
            for v in out.k.iter().chain(&out.d).filter(|v| !v.is_nan()) {
                assert!((0.0..=100.0).contains(v), "out of range: {v}");
            }
        }
    }

    mod config {
        use super::*;

        #[test]
        fn rejects_signal_not_below_stoch_length() {
            let result = StochasticRsiConfig::builder()
                .stoch_length(nz(3))
                .signal(nz(3))
                .build();
            assert!(matches!(
                result,
                Err(IndicatorError::InvalidParameter { indicator: "stochrsi", .. })
            ));
        }

        #[test]
        fn display() {
            let ind = StochasticRsi::new(config(14, 14, 3, 3));
            assert_eq!(ind.to_string(), "STOCHRSI(14, 14, 3, 3)");
        }
    }
}
