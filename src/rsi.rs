use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Price, PriceSeries, PriceSource, Result,
    Series,
    window::{first_defined, undefined},
};

/// Configuration for the Relative Strength Index ([`Rsi`])
/// indicator.
///
/// RSI uses Wilder's smoothing, which has infinite memory: the
/// SMA seed (first `length` price changes) influences all
/// subsequent values. Output begins at index `length`.
///
/// # Example
///
/// ```
/// use indicator_engine::{IndicatorConfig, RsiConfig};
/// use std::num::NonZero;
///
/// let config = RsiConfig::close(NonZero::new(14).unwrap());
/// assert_eq!(config.length(), 14);
/// assert_eq!(config.warm_up(), 14);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct RsiConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for RsiConfig {
    type Builder = RsiConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        RsiConfigBuilder::new()
    }

    #[inline]
    fn warm_up(&self) -> usize {
        self.length
    }
}

impl RsiConfig {
    /// RSI on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self {
            length: length.get(),
            source: PriceSource::Close,
        }
    }

    /// Number of price changes in the seed and the Wilder period.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }
}

impl Display for RsiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RsiConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`RsiConfig`].
///
/// Defaults: length = 14, source = [`PriceSource::Close`].
pub struct RsiConfigBuilder {
    length: usize,
    source: PriceSource,
}

impl RsiConfigBuilder {
    #[must_use]
    fn new() -> Self {
        Self {
            length: 14,
            source: PriceSource::Close,
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
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<RsiConfig> for RsiConfigBuilder {
    #[inline]
    fn build(self) -> Result<RsiConfig> {
        Ok(RsiConfig {
            length: self.length,
            source: self.source,
        })
    }
}

/// Relative Strength Index (RSI) with Wilder's smoothing.
///
/// Measures the speed and magnitude of recent price changes on
/// a 0–100 scale. Values above 70 are conventionally considered
/// overbought; below 30, oversold.
///
/// The first `length` price changes are averaged with a simple
/// mean (SMA seed). After seeding, gains and losses are smoothed
/// with Wilder's method (`α = 1 / length`):
///
/// ```text
/// avg_gain = (prev_avg_gain × (length − 1) + gain) / length
/// avg_loss = (prev_avg_loss × (length − 1) + loss) / length
/// RSI      = 100 − 100 / (1 + avg_gain / avg_loss)
/// ```
///
/// When `avg_loss` is zero the RSI is 100, including a perfectly
/// flat history.
///
/// # Example
///
/// ```
/// use indicator_engine::{Bar, PriceSeries, Rsi, RsiConfig};
/// use std::num::NonZero;
///
/// let series = PriceSeries::from_bars(
///     [10.0, 12.0, 11.0, 13.0]
///         .into_iter()
///         .enumerate()
///         .map(|(i, p)| (i, Bar::new(p, p, p, p, 0.0))),
/// )
/// .unwrap();
///
/// let rsi = Rsi::new(RsiConfig::close(NonZero::new(3).unwrap()));
/// let values = rsi.compute(&series);
///
/// // Seeding: need 3 price changes (4 bars)
/// assert!(values[2].is_nan());
///
/// // changes = +2, −1, +2 → avg_gain=4/3, avg_loss=1/3 → RSI=80
/// assert!((values[3] - 80.0).abs() < 1e-10);
/// ```
#[derive(Clone, Debug)]
pub struct Rsi {
    config: RsiConfig,
}

impl Indicator for Rsi {
    type Config = RsiConfig;
    type Output = Series;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute<K>(&self, series: &PriceSeries<K>) -> Series {
        relative_strength(&self.config.source.extract(series), self.config.length)
    }
}

impl Display for Rsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({}, {})", self.config.length, self.config.source)
    }
}

/// RSI of `prices`; defined from index `length`.
pub(crate) fn relative_strength(prices: &[Price], length: usize) -> Series {
    let mut gains = undefined(prices.len());
    let mut losses = undefined(prices.len());

    for i in 1..prices.len() {
        (gains[i], losses[i]) = gain_and_loss(prices[i - 1], prices[i]);
    }

    wilder_average(&gains, length)
        .into_iter()
        .zip(wilder_average(&losses, length))
        .map(|(avg_gain, avg_loss)| rsi_from_averages(avg_gain, avg_loss))
        .collect()
}

/// Wilder's running average.
///
/// Seeded by the simple mean of the first `length` defined values (leading
/// `NaN` entries are skipped), then advanced with
/// `avg = (prev × (length − 1) + value) / length`.
pub(crate) fn wilder_average(values: &[f64], length: usize) -> Series {
    let mut out = undefined(values.len());

    let Some(start) = first_defined(values) else {
        return out;
    };
    let seed_end = start.saturating_add(length);
    if seed_end > values.len() {
        return out;
    }

    #[allow(clippy::cast_precision_loss)]
    let length_f = length as f64;
    let length_reciprocal = 1.0 / length_f;
    let length_minus_one = length_f - 1.0;

    let mut avg = values[start..seed_end].iter().sum::<f64>() / length_f;
    out[seed_end - 1] = avg;

    for i in seed_end..values.len() {
        avg = avg.mul_add(length_minus_one, values[i]) * length_reciprocal;
        out[i] = avg;
    }

    out
}

#[inline]
fn gain_and_loss(prev_price: Price, price: Price) -> (Price, Price) {
    let change = price - prev_price;
    let gain = change.max(0.0);
    let loss = (-change).max(0.0);

    (gain, loss)
}

#[inline]
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain.is_nan() || avg_loss.is_nan() {
        f64::NAN
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
