use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, PriceSeries, PriceSource, Result, Series,
    rsi::wilder_average,
};

/// Configuration for the Average True Range ([`Atr`]).
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct AtrConfig {
    length: usize,
}

impl IndicatorConfig for AtrConfig {
    type Builder = AtrConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        AtrConfigBuilder { length: 14 }
    }

    #[inline]
    fn warm_up(&self) -> usize {
        self.length - 1
    }
}

impl AtrConfig {
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

impl Display for AtrConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AtrConfig({})", self.length)
    }
}

/// Builder for [`AtrConfig`]. Defaults: length = 14.
pub struct AtrConfigBuilder {
    length: usize,
}

impl AtrConfigBuilder {
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = length.get();
        self
    }
}

impl IndicatorConfigBuilder<AtrConfig> for AtrConfigBuilder {
    #[inline]
    fn build(self) -> Result<AtrConfig> {
        Ok(AtrConfig {
            length: self.length,
        })
    }
}

/// Average True Range: Wilder-smoothed [`PriceSource::TrueRange`].
///
/// The first bar has no previous close, so its true range is `high − low`.
/// Seeded by the mean of the first `length` true ranges at index
/// `length - 1`.
#[derive(Clone, Debug)]
pub struct Atr {
    config: AtrConfig,
}

impl Indicator for Atr {
    type Config = AtrConfig;
    type Output = Series;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute<K>(&self, series: &PriceSeries<K>) -> Series {
        average_true_range(series, self.config.length)
    }
}

impl Display for Atr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ATR({})", self.config.length)
    }
}

pub(crate) fn average_true_range<K>(series: &PriceSeries<K>, length: usize) -> Series {
    wilder_average(&PriceSource::TrueRange.extract(series), length)
}
