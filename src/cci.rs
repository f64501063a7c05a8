use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, PriceSeries, PriceSource, Result, Series,
    window::{mean, undefined},
};

/// Lambert's constant: scales CCI so roughly 70–80% of values fall within
/// ±100.
const LAMBERT: f64 = 0.015;

/// Configuration for the Commodity Channel Index ([`Cci`]).
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct CciConfig {
    length: usize,
}

impl IndicatorConfig for CciConfig {
    type Builder = CciConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        CciConfigBuilder { length: 20 }
    }

    #[inline]
    fn warm_up(&self) -> usize {
        self.length - 1
    }
}

impl CciConfig {
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

impl Display for CciConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CciConfig({})", self.length)
    }
}

/// Builder for [`CciConfig`]. Defaults: length = 20.
pub struct CciConfigBuilder {
    length: usize,
}

impl CciConfigBuilder {
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = length.get();
        self
    }
}

impl IndicatorConfigBuilder<CciConfig> for CciConfigBuilder {
    #[inline]
    fn build(self) -> Result<CciConfig> {
        Ok(CciConfig {
            length: self.length,
        })
    }
}

/// Commodity Channel Index (CCI).
///
/// ```text
/// TP     = (high + low + close) / 3
/// SMA_TP = mean of TP over the window
/// MD     = mean of |TP − SMA_TP| over the same window
/// CCI    = (TP − SMA_TP) / (0.015 × MD)
/// ```
///
/// A window with no dispersion (flat typical price) gives 0.
#[derive(Clone, Debug)]
pub struct Cci {
    config: CciConfig,
}

impl Indicator for Cci {
    type Config = CciConfig;
    type Output = Series;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute<K>(&self, series: &PriceSeries<K>) -> Series {
        let length = self.config.length;
        let typical = PriceSource::HLC3.extract(series);
        let mut out = undefined(typical.len());

        for i in (length - 1)..typical.len() {
            let window = &typical[i + 1 - length..=i];
            out[i] = channel_index(window, typical[i]);
        }

        out
    }
}

impl Display for Cci {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CCI({})", self.config.length)
    }
}

fn channel_index(window: &[f64], typical: f64) -> f64 {
    // A flat window has zero deviation even when its computed mean is off by
    // an ulp.
    if window.iter().all(|&tp| tp == window[0]) {
        return 0.0;
    }

    let average = mean(window);
    let deviation = window.iter().map(|tp| (tp - average).abs()).sum::<f64>();
    #[allow(clippy::cast_precision_loss)]
    let mean_deviation = deviation / window.len() as f64;

    if mean_deviation == 0.0 {
        0.0
    } else {
        (typical - average) / (LAMBERT * mean_deviation)
    }
}
