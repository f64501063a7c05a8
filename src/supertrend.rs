use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IntoLines, Multiplier, NamedSeries,
    PriceSeries, PriceSource, Result, Series,
    atr::average_true_range,
    window::{first_defined, undefined},
};

/// Configuration for the [`SuperTrend`] indicator.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct SuperTrendConfig {
    length: usize,
    multiplier: Multiplier,
}

impl IndicatorConfig for SuperTrendConfig {
    type Builder = SuperTrendConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        SuperTrendConfigBuilder {
            length: 10,
            multiplier: Multiplier::from_const(3.0),
        }
    }

    #[inline]
    fn warm_up(&self) -> usize {
        self.length - 1
    }
}

impl SuperTrendConfig {
    /// ATR length.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// ATR multiple added to and subtracted from the median price.
    #[inline]
    #[must_use]
    pub fn multiplier(&self) -> Multiplier {
        self.multiplier
    }
}

impl Display for SuperTrendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SuperTrendConfig({}, {})", self.length, self.multiplier)
    }
}

/// Builder for [`SuperTrendConfig`]. Defaults: length = 10, multiplier = 3.
pub struct SuperTrendConfigBuilder {
    length: usize,
    multiplier: Multiplier,
}

impl SuperTrendConfigBuilder {
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = length.get();
        self
    }

    #[inline]
    #[must_use]
    pub fn multiplier(mut self, multiplier: Multiplier) -> Self {
        self.multiplier = multiplier;
        self
    }
}

impl IndicatorConfigBuilder<SuperTrendConfig> for SuperTrendConfigBuilder {
    #[inline]
    fn build(self) -> Result<SuperTrendConfig> {
        Ok(SuperTrendConfig {
            length: self.length,
            multiplier: self.multiplier,
        })
    }
}

/// Trend state of [`SuperTrend`].
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// `+1` for [`Trend::Up`], `−1` for [`Trend::Down`].
    #[inline]
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
        }
    }

    /// Next state after `close` is compared with the current final bands.
    #[inline]
    fn next(self, close: f64, upper: f64, lower: f64) -> Self {
        match self {
            Self::Up if close < lower => Self::Down,
            Self::Down if close > upper => Self::Up,
            unchanged => unchanged,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuperTrendOutput {
    /// Lower band while trending up, upper band while trending down.
    pub supertrend: Series,
    /// `+1` up, `−1` down.
    pub direction: Series,
    /// Final (ratcheted) upper band.
    pub upper: Series,
    /// Final (ratcheted) lower band.
    pub lower: Series,
}

impl IntoLines for SuperTrendOutput {
    fn into_lines(self) -> Vec<NamedSeries> {
        vec![
            NamedSeries::new("supertrend", self.supertrend),
            NamedSeries::new("direction", self.direction),
            NamedSeries::new("upper", self.upper),
            NamedSeries::new("lower", self.lower),
        ]
    }
}

/// SuperTrend: ATR bands around the median price with a trend state.
///
/// ```text
/// basic upper = HL2 + multiplier × ATR
/// basic lower = HL2 − multiplier × ATR
/// ```
///
/// The final upper band only moves down unless the previous close broke
/// above it; the final lower band only moves up unless the previous close
/// broke below it. Starting in [`Trend::Up`], the trend flips down when the
/// close falls below the final lower band and flips up when the close rises
/// above the final upper band.
#[derive(Clone, Debug)]
pub struct SuperTrend {
    config: SuperTrendConfig,
}

impl Indicator for SuperTrend {
    type Config = SuperTrendConfig;
    type Output = SuperTrendOutput;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute<K>(&self, series: &PriceSeries<K>) -> SuperTrendOutput {
        let n = series.len();
        let mut out = SuperTrendOutput {
            supertrend: undefined(n),
            direction: undefined(n),
            upper: undefined(n),
            lower: undefined(n),
        };

        let atr = average_true_range(series, self.config.length);
        let Some(start) = first_defined(&atr) else {
            return out;
        };

        let multiplier = self.config.multiplier.value();
        let median = PriceSource::HL2.extract(series);
        let close = series.close();

        let mut upper = f64::NAN;
        let mut lower = f64::NAN;
        let mut trend = Trend::Up;

        for i in start..n {
            let basic_upper = multiplier.mul_add(atr[i], median[i]);
            let basic_lower = (-multiplier).mul_add(atr[i], median[i]);

            if i == start {
                upper = basic_upper;
                lower = basic_lower;
            } else {
                if basic_upper < upper || close[i - 1] > upper {
                    upper = basic_upper;
                }
                if basic_lower > lower || close[i - 1] < lower {
                    lower = basic_lower;
                }
            }

            trend = trend.next(close[i], upper, lower);

            out.upper[i] = upper;
            out.lower[i] = lower;
            out.direction[i] = trend.sign();
            out.supertrend[i] = match trend {
                Trend::Up => lower,
                Trend::Down => upper,
            };
        }

        out
    }
}

impl Display for SuperTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SUPERTREND({}, {})",
            self.config.length, self.config.multiplier
        )
    }
}
