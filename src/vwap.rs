use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, PriceSeries, PriceSource, Result, Series,
    window::undefined,
};

/// Configuration for [`Vwap`].
///
/// Without a length the average is cumulative from the first bar. With a
/// length it rolls over the trailing `length` bars.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default)]
pub struct VwapConfig {
    length: Option<usize>,
}

impl IndicatorConfig for VwapConfig {
    type Builder = VwapConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        VwapConfigBuilder { length: None }
    }

    #[inline]
    fn warm_up(&self) -> usize {
        self.length.map_or(0, |length| length - 1)
    }
}

impl VwapConfig {
    /// Cumulative VWAP over the whole history.
    #[must_use]
    pub fn cumulative() -> Self {
        Self { length: None }
    }

    /// VWAP over the trailing `length` bars.
    #[must_use]
    pub fn rolling(length: NonZero<usize>) -> Self {
        Self {
            length: Some(length.get()),
        }
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> Option<usize> {
        self.length
    }
}

impl Display for VwapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.length {
            Some(length) => write!(f, "VwapConfig({length})"),
            None => write!(f, "VwapConfig(cumulative)"),
        }
    }
}

/// Builder for [`VwapConfig`]. Defaults: cumulative.
pub struct VwapConfigBuilder {
    length: Option<usize>,
}

impl VwapConfigBuilder {
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = Some(length.get());
        self
    }
}

impl IndicatorConfigBuilder<VwapConfig> for VwapConfigBuilder {
    #[inline]
    fn build(self) -> Result<VwapConfig> {
        Ok(VwapConfig {
            length: self.length,
        })
    }
}

/// Volume-Weighted Average Price of the typical price (HLC3).
///
/// Where the volume summed so far (or over the window) is zero, the bar's
/// own typical price is used.
#[derive(Clone, Debug)]
pub struct Vwap {
    config: VwapConfig,
}

impl Indicator for Vwap {
    type Config = VwapConfig;
    type Output = Series;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute<K>(&self, series: &PriceSeries<K>) -> Series {
        let typical = PriceSource::HLC3.extract(series);
        let volume = series.volume();

        match self.config.length {
            None => {
                let mut weighted = 0.0;
                let mut total = 0.0;
                typical
                    .iter()
                    .zip(volume)
                    .map(|(&tp, &v)| {
                        weighted = tp.mul_add(v, weighted);
                        total += v;
                        weighted_price(weighted, total, tp)
                    })
                    .collect()
            }
            Some(length) => {
                let mut out = undefined(typical.len());
                for i in (length - 1)..typical.len() {
                    let window = i + 1 - length..=i;
                    let weighted: f64 = typical[window.clone()]
                        .iter()
                        .zip(&volume[window.clone()])
                        .map(|(tp, v)| tp * v)
                        .sum();
                    let total: f64 = volume[window].iter().sum();
                    out[i] = weighted_price(weighted, total, typical[i]);
                }
                out
            }
        }
    }
}

impl Display for Vwap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.config.length {
            Some(length) => write!(f, "VWAP({length})"),
            None => write!(f, "VWAP"),
        }
    }
}

#[inline]
fn weighted_price(weighted: f64, volume: f64, typical: f64) -> f64 {
    if volume == 0.0 {
        typical
    } else {
        weighted / volume
    }
}
