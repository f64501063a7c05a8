use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IntoLines, NamedSeries, PriceSeries,
    Result, Series, window::undefined,
};

/// Configuration for the [`Aroon`] indicator.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct AroonConfig {
    length: usize,
}

impl IndicatorConfig for AroonConfig {
    type Builder = AroonConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        AroonConfigBuilder { length: 25 }
    }

    #[inline]
    fn warm_up(&self) -> usize {
        self.length - 1
    }
}

impl AroonConfig {
    #[must_use]
    pub fn new(length: NonZero<usize>) -> Self {
        Self {
            length: length.get(),
        }
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Display for AroonConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AroonConfig({})", self.length)
    }
}

/// Builder for [`AroonConfig`]. Defaults: length = 25.
pub struct AroonConfigBuilder {
    length: usize,
}

impl AroonConfigBuilder {
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = length.get();
        self
    }
}

impl IndicatorConfigBuilder<AroonConfig> for AroonConfigBuilder {
    #[inline]
    fn build(self) -> Result<AroonConfig> {
        Ok(AroonConfig {
            length: self.length,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AroonOutput {
    pub up: Series,
    pub down: Series,
    /// `up − down`.
    pub oscillator: Series,
}

impl IntoLines for AroonOutput {
    fn into_lines(self) -> Vec<NamedSeries> {
        vec![
            NamedSeries::new("up", self.up),
            NamedSeries::new("down", self.down),
            NamedSeries::new("oscillator", self.oscillator),
        ]
    }
}

/// Aroon Up/Down: how recently the window's high and low were set.
///
/// ```text
/// up   = (length − bars since highest high) × 100 / length
/// down = (length − bars since lowest low)   × 100 / length
/// ```
///
/// The window is the trailing `length` bars. Ties resolve to the most
/// recent bar.
#[derive(Clone, Debug)]
pub struct Aroon {
    config: AroonConfig,
}

impl Indicator for Aroon {
    type Config = AroonConfig;
    type Output = AroonOutput;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute<K>(&self, series: &PriceSeries<K>) -> AroonOutput {
        let length = self.config.length;
        let n = series.len();
        let mut out = AroonOutput {
            up: undefined(n),
            down: undefined(n),
            oscillator: undefined(n),
        };

        #[allow(clippy::cast_precision_loss)]
        let length_f = length as f64;

        for i in (length - 1)..n {
            let start = i + 1 - length;
            let mut high_at = start;
            let mut low_at = start;
            for j in start..=i {
                if series.high()[j] >= series.high()[high_at] {
                    high_at = j;
                }
                if series.low()[j] <= series.low()[low_at] {
                    low_at = j;
                }
            }

            #[allow(clippy::cast_precision_loss)]
            let up = (length - (i - high_at)) as f64 * 100.0 / length_f;
            #[allow(clippy::cast_precision_loss)]
            let down = (length - (i - low_at)) as f64 * 100.0 / length_f;

            out.up[i] = up;
            out.down[i] = down;
            out.oscillator[i] = up - down;
        }

        out
    }
}

impl Display for Aroon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AROON({})", self.config.length)
    }
}
