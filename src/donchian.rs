use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IntoLines, NamedSeries, PriceSeries,
    Result, Series,
    window::{rolling_max, rolling_min},
};

/// Configuration for [`Donchian`] channels.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct DonchianConfig {
    length: usize,
}

impl IndicatorConfig for DonchianConfig {
    type Builder = DonchianConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        DonchianConfigBuilder { length: 20 }
    }

    #[inline]
    fn warm_up(&self) -> usize {
        self.length - 1
    }
}

impl DonchianConfig {
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

impl Display for DonchianConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DonchianConfig({})", self.length)
    }
}

/// Builder for [`DonchianConfig`]. Defaults: length = 20.
pub struct DonchianConfigBuilder {
    length: usize,
}

impl DonchianConfigBuilder {
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = length.get();
        self
    }
}

impl IndicatorConfigBuilder<DonchianConfig> for DonchianConfigBuilder {
    #[inline]
    fn build(self) -> Result<DonchianConfig> {
        Ok(DonchianConfig {
            length: self.length,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DonchianOutput {
    /// Highest high.
    pub upper: Series,
    pub middle: Series,
    /// Lowest low.
    pub lower: Series,
}

impl IntoLines for DonchianOutput {
    fn into_lines(self) -> Vec<NamedSeries> {
        vec![
            NamedSeries::new("upper", self.upper),
            NamedSeries::new("middle", self.middle),
            NamedSeries::new("lower", self.lower),
        ]
    }
}

/// Donchian channels: highest high, lowest low and their midpoint over the
/// last `length` bars.
#[derive(Clone, Debug)]
pub struct Donchian {
    config: DonchianConfig,
}

impl Indicator for Donchian {
    type Config = DonchianConfig;
    type Output = DonchianOutput;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute<K>(&self, series: &PriceSeries<K>) -> DonchianOutput {
        let upper = rolling_max(series.high(), self.config.length);
        let lower = rolling_min(series.low(), self.config.length);
        let middle = upper
            .iter()
            .zip(&lower)
            .map(|(&u, &l)| f64::midpoint(u, l))
            .collect();

        DonchianOutput {
            upper,
            middle,
            lower,
        }
    }
}

impl Display for Donchian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DONCHIAN({})", self.config.length)
    }
}
