use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorError, IntoLines, NamedSeries,
    PriceSeries, Result, Series,
    window::{midpoint_channel, undefined},
};

/// Configuration for the [`Ichimoku`] cloud.
///
/// Both senkou spans are displaced forward, and chikou backward, by
/// `kijun - 1` bars. [`warm_up`](IndicatorConfig::warm_up) reports the first
/// index of senkou span B, the last line to become defined.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct IchimokuConfig {
    tenkan: usize,
    kijun: usize,
    senkou: usize,
}

impl IndicatorConfig for IchimokuConfig {
    type Builder = IchimokuConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        IchimokuConfigBuilder {
            tenkan: 9,
            kijun: 26,
            senkou: 52,
        }
    }

    #[inline]
    fn warm_up(&self) -> usize {
        (self.senkou - 1).saturating_add(self.displacement())
    }
}

impl IchimokuConfig {
    #[inline]
    #[must_use]
    pub fn tenkan(&self) -> usize {
        self.tenkan
    }

    #[inline]
    #[must_use]
    pub fn kijun(&self) -> usize {
        self.kijun
    }

    #[inline]
    #[must_use]
    pub fn senkou(&self) -> usize {
        self.senkou
    }

    /// Bars the senkou spans are projected forward and chikou backward.
    #[inline]
    #[must_use]
    pub fn displacement(&self) -> usize {
        self.kijun - 1
    }
}

impl Display for IchimokuConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "IchimokuConfig({}, {}, {})",
            self.tenkan, self.kijun, self.senkou
        )
    }
}

/// Builder for [`IchimokuConfig`]. Defaults: 9, 26, 52.
pub struct IchimokuConfigBuilder {
    tenkan: usize,
    kijun: usize,
    senkou: usize,
}

impl IchimokuConfigBuilder {
    #[inline]
    #[must_use]
    pub fn tenkan(mut self, tenkan: NonZero<usize>) -> Self {
        self.tenkan = tenkan.get();
        self
    }

    #[inline]
    #[must_use]
    pub fn kijun(mut self, kijun: NonZero<usize>) -> Self {
        self.kijun = kijun.get();
        self
    }

    #[inline]
    #[must_use]
    pub fn senkou(mut self, senkou: NonZero<usize>) -> Self {
        self.senkou = senkou.get();
        self
    }
}

impl IndicatorConfigBuilder<IchimokuConfig> for IchimokuConfigBuilder {
    fn build(self) -> Result<IchimokuConfig> {
        if self.tenkan > self.kijun || self.kijun > self.senkou {
            return Err(IndicatorError::invalid(
                "ichimoku",
                format!(
                    "periods must satisfy tenkan <= kijun <= senkou, got {}, {}, {}",
                    self.tenkan, self.kijun, self.senkou
                ),
            ));
        }

        Ok(IchimokuConfig {
            tenkan: self.tenkan,
            kijun: self.kijun,
            senkou: self.senkou,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IchimokuOutput {
    /// Conversion line.
    pub tenkan: Series,
    /// Base line.
    pub kijun: Series,
    /// Leading span A, displaced forward.
    pub senkou_a: Series,
    /// Leading span B, displaced forward.
    pub senkou_b: Series,
    /// Lagging span: close displaced backward.
    pub chikou: Series,
}

impl IntoLines for IchimokuOutput {
    fn into_lines(self) -> Vec<NamedSeries> {
        vec![
            NamedSeries::new("tenkan", self.tenkan),
            NamedSeries::new("kijun", self.kijun),
            NamedSeries::new("senkou_a", self.senkou_a),
            NamedSeries::new("senkou_b", self.senkou_b),
            NamedSeries::new("chikou", self.chikou),
        ]
    }
}

/// Ichimoku Kinko Hyo.
///
/// ```text
/// tenkan   = midpoint of HH/LL over `tenkan`
/// kijun    = midpoint of HH/LL over `kijun`
/// senkou A = (tenkan + kijun) / 2, written `kijun − 1` bars ahead
/// senkou B = midpoint of HH/LL over `senkou`, written `kijun − 1` bars ahead
/// chikou   = close, written `kijun − 1` bars back
/// ```
///
/// Projected values that would land past the last bar are dropped: every
/// line has the input's length.
#[derive(Clone, Debug)]
pub struct Ichimoku {
    config: IchimokuConfig,
}

impl Indicator for Ichimoku {
    type Config = IchimokuConfig;
    type Output = IchimokuOutput;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute<K>(&self, series: &PriceSeries<K>) -> IchimokuOutput {
        let n = series.len();
        let shift = self.config.displacement();
        let (high, low) = (series.high(), series.low());

        let tenkan = midpoint_channel(high, low, self.config.tenkan);
        let kijun = midpoint_channel(high, low, self.config.kijun);
        let span_b = midpoint_channel(high, low, self.config.senkou);

        // Values shifted past the last bar are dropped, so the lead never exceeds n.
        let lead = shift.min(n);
        let mut senkou_a = undefined(n + lead);
        let mut senkou_b = undefined(n + lead);
        if shift < n {
            for i in 0..n {
                senkou_a[i + shift] = f64::midpoint(tenkan[i], kijun[i]);
                senkou_b[i + shift] = span_b[i];
            }
        }
        senkou_a.truncate(n);
        senkou_b.truncate(n);

        let mut chikou = undefined(n);
        for (i, &close) in series.close().iter().enumerate().skip(shift) {
            chikou[i - shift] = close;
        }

        IchimokuOutput {
            tenkan,
            kijun,
            senkou_a,
            senkou_b,
            chikou,
        }
    }
}

impl Display for Ichimoku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ICHIMOKU({}, {}, {})",
            self.config.tenkan, self.config.kijun, self.config.senkou
        )
    }
}
