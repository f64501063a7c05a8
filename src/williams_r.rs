use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, PriceSeries, Result, Series,
    window::{rolling_max, rolling_min},
};

/// %R when the look-back range is zero.
const FLAT_RANGE_R: f64 = -50.0;

/// Configuration for [`WilliamsR`].
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct WilliamsRConfig {
    length: usize,
}

impl IndicatorConfig for WilliamsRConfig {
    type Builder = WilliamsRConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        WilliamsRConfigBuilder { length: 14 }
    }

    #[inline]
    fn warm_up(&self) -> usize {
        self.length - 1
    }
}

impl WilliamsRConfig {
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

impl Display for WilliamsRConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WilliamsRConfig({})", self.length)
    }
}

/// Builder for [`WilliamsRConfig`]. Defaults: length = 14.
pub struct WilliamsRConfigBuilder {
    length: usize,
}

impl WilliamsRConfigBuilder {
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = length.get();
        self
    }
}

impl IndicatorConfigBuilder<WilliamsRConfig> for WilliamsRConfigBuilder {
    #[inline]
    fn build(self) -> Result<WilliamsRConfig> {
        Ok(WilliamsRConfig {
            length: self.length,
        })
    }
}

/// Williams %R: where the close sits inside the recent high/low range,
/// on a −100 (at the low) to 0 (at the high) scale.
///
/// ```text
/// %R = (HH − close) / (HH − LL) × −100
/// ```
///
/// A zero range gives the midpoint, −50.
#[derive(Clone, Debug)]
pub struct WilliamsR {
    config: WilliamsRConfig,
}

impl Indicator for WilliamsR {
    type Config = WilliamsRConfig;
    type Output = Series;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute<K>(&self, series: &PriceSeries<K>) -> Series {
        let highest = rolling_max(series.high(), self.config.length);
        let lowest = rolling_min(series.low(), self.config.length);

        highest
            .iter()
            .zip(&lowest)
            .zip(series.close())
            .map(|((&hh, &ll), &close)| {
                let range = hh - ll;
                if range.is_nan() {
                    f64::NAN
                } else if range == 0.0 {
                    FLAT_RANGE_R
                } else {
                    (hh - close) / range * -100.0
                }
            })
            .collect()
    }
}

impl Display for WilliamsR {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WILLR({})", self.config.length)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{closes, hlc, leading_nan, wavy};

    fn willr(length: usize) -> WilliamsR {
        WilliamsR::new(WilliamsRConfig::new(NonZero::new(length).unwrap()))
    }

    #[test]
    fn close_at_high_is_zero() {
        let out = willr(2).compute(&hlc(&[(10.0, 5.0, 7.0), (12.0, 6.0, 12.0)]));
        assert_eq!(out[1], 0.0);
    }

    #[test]
    fn close_at_low_is_minus_100() {
        let out = willr(2).compute(&hlc(&[(10.0, 5.0, 7.0), (9.0, 4.0, 4.0)]));
        assert_eq!(out[1], -100.0);
    }

    #[test]
    fn flat_range_is_midpoint() {
        let out = willr(3).compute(&closes(&[4.0; 5]));
        assert!(out[2..].iter().all(|&v| v == -50.0));
    }

    #[test]
    fn bounded_and_warmed_up() {
        let out = willr(14).compute(&wavy(100));
        assert_eq!(leading_nan(&out), 13);
        assert!(out[13..].iter().all(|v| (-100.0..=0.0).contains(v)));
    }

    #[test]
    fn display() {
        assert_eq!(willr(14).to_string(), "WILLR(14)");
        assert_eq!(
            WilliamsRConfig::builder().build().unwrap().to_string(),
            "WilliamsRConfig(14)"
        );
    }
}
