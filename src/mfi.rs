use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, PriceSeries, PriceSource, Result, Series,
    window::undefined,
};

/// Configuration for the Money Flow Index ([`Mfi`]).
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct MfiConfig {
    length: usize,
}

impl IndicatorConfig for MfiConfig {
    type Builder = MfiConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        MfiConfigBuilder { length: 14 }
    }

    #[inline]
    fn warm_up(&self) -> usize {
        self.length
    }
}

impl MfiConfig {
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

impl Display for MfiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MfiConfig({})", self.length)
    }
}

/// Builder for [`MfiConfig`]. Defaults: length = 14.
pub struct MfiConfigBuilder {
    length: usize,
}

impl MfiConfigBuilder {
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = length.get();
        self
    }
}

impl IndicatorConfigBuilder<MfiConfig> for MfiConfigBuilder {
    #[inline]
    fn build(self) -> Result<MfiConfig> {
        Ok(MfiConfig {
            length: self.length,
        })
    }
}

/// Money Flow Index (MFI): a volume-weighted RSI.
///
/// Raw money flow is `typical price × volume`. A bar's flow counts as
/// positive when its typical price rose from the previous bar, negative when
/// it fell, and is ignored when unchanged. Over the last `length` bars:
///
/// ```text
/// MFI = 100 − 100 / (1 + positive_flow / negative_flow)
/// ```
///
/// No negative flow gives 100; no flow at all (zero volume or a flat
/// typical price) gives 50.
#[derive(Clone, Debug)]
pub struct Mfi {
    config: MfiConfig,
}

impl Indicator for Mfi {
    type Config = MfiConfig;
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
        let n = typical.len();

        let mut positive = vec![0.0; n];
        let mut negative = vec![0.0; n];
        for i in 1..n {
            let flow = typical[i] * series.volume()[i];
            if typical[i] > typical[i - 1] {
                positive[i] = flow;
            } else if typical[i] < typical[i - 1] {
                negative[i] = flow;
            }
        }

        let mut out = undefined(n);
        for i in length..n {
            let window = i + 1 - length..=i;
            let pos: f64 = positive[window.clone()].iter().sum();
            let neg: f64 = negative[window].iter().sum();
            out[i] = money_flow_index(pos, neg);
        }

        out
    }
}

impl Display for Mfi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MFI({})", self.config.length)
    }
}

#[inline]
fn money_flow_index(positive: f64, negative: f64) -> f64 {
    if negative == 0.0 {
        if positive == 0.0 { 50.0 } else { 100.0 }
    } else {
        100.0 - 100.0 / (1.0 + positive / negative)
    }
}
