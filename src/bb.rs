use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorError, IntoLines, Multiplier,
    NamedSeries, PriceSeries, PriceSource, Result, Series,
    window::{mean, sample_std_dev, undefined},
};

/// Configuration for the Bollinger Bands ([`Bb`]) indicator.
///
/// # Example
///
/// ```
/// use indicator_engine::{BbConfig, IndicatorConfig, IndicatorConfigBuilder, Multiplier};
/// use std::num::NonZero;
///
/// // Length 20 on close, 2.5 std devs
/// let config = BbConfig::builder()
///     .length(NonZero::new(20).unwrap())
///     .std_dev(Multiplier::new("bollinger", 2.5).unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.to_string(), "BbConfig(20, Close, 2.5)");
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct BbConfig {
    length: usize,
    source: PriceSource,
    std_dev: Multiplier,
}

impl IndicatorConfig for BbConfig {
    type Builder = BbConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        BbConfigBuilder::new()
    }

    #[inline]
    fn warm_up(&self) -> usize {
        self.length - 1
    }
}

impl BbConfig {
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

    /// Standard deviation multiplier for the upper and lower bands.
    #[inline]
    #[must_use]
    pub fn std_dev(&self) -> Multiplier {
        self.std_dev
    }
}

impl Display for BbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BbConfig({}, {}, {})",
            self.length, self.source, self.std_dev
        )
    }
}

/// Builder for [`BbConfig`].
///
/// Defaults: length = 20, source = [`PriceSource::Close`], `std_dev` = 2.0.
pub struct BbConfigBuilder {
    length: usize,
    source: PriceSource,
    std_dev: Multiplier,
}

impl BbConfigBuilder {
    fn new() -> Self {
        Self {
            length: 20,
            source: PriceSource::Close,
            std_dev: Multiplier::from_const(2.0),
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

    #[inline]
    #[must_use]
    pub fn std_dev(mut self, std_dev: Multiplier) -> Self {
        self.std_dev = std_dev;
        self
    }
}

impl IndicatorConfigBuilder<BbConfig> for BbConfigBuilder {
    fn build(self) -> Result<BbConfig> {
        // Sample standard deviation needs two values.
        if self.length < 2 {
            return Err(IndicatorError::invalid(
                "bollinger",
                format!("period must be at least 2, got {}", self.length),
            ));
        }

        Ok(BbConfig {
            length: self.length,
            source: self.source,
            std_dev: self.std_dev,
        })
    }
}

/// Bollinger Bands output: upper, middle, and lower bands.
///
/// ```text
/// upper  = SMA + k × σ
/// middle = SMA
/// lower  = SMA − k × σ
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BbOutput {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

impl BbOutput {
    /// Band width: `upper − lower`.
    ///
    /// Narrow width indicates consolidation (Bollinger squeeze); wide width
    /// indicates high volatility.
    #[must_use]
    pub fn width(&self) -> Series {
        self.upper
            .iter()
            .zip(&self.lower)
            .map(|(u, l)| u - l)
            .collect()
    }
}

impl IntoLines for BbOutput {
    fn into_lines(self) -> Vec<NamedSeries> {
        vec![
            NamedSeries::new("upper", self.upper),
            NamedSeries::new("middle", self.middle),
            NamedSeries::new("lower", self.lower),
        ]
    }
}

/// Bollinger Bands (BB).
///
/// A volatility indicator consisting of three bands: a simple moving average
/// (middle) with upper and lower bands offset by a configurable number of
/// standard deviations. `σ` is the sample standard deviation of the window
/// (`N − 1` denominator), computed around the window mean in two passes.
#[derive(Clone, Debug)]
pub struct Bb {
    config: BbConfig,
}

impl Indicator for Bb {
    type Config = BbConfig;
    type Output = BbOutput;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute<K>(&self, series: &PriceSeries<K>) -> BbOutput {
        let length = self.config.length;
        let multiplier = self.config.std_dev.value();
        let prices = self.config.source.extract(series);
        let n = prices.len();

        let mut out = BbOutput {
            upper: undefined(n),
            middle: undefined(n),
            lower: undefined(n),
        };

        for i in (length - 1)..n {
            let window = &prices[i + 1 - length..=i];
            let middle = mean(window);
            let half_width = multiplier * sample_std_dev(window);

            out.upper[i] = middle + half_width;
            out.middle[i] = middle;
            out.lower[i] = middle - half_width;
        }

        out
    }
}

impl Display for Bb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB({}, {}, {})",
            self.config.length, self.config.source, self.config.std_dev,
        )
    }
}
