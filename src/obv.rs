use std::fmt::Display;

use crate::{Indicator, IndicatorConfig, IndicatorConfigBuilder, PriceSeries, Result, Series};

/// Configuration for [`Obv`]. On-balance volume has no parameters.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default)]
pub struct ObvConfig;

impl IndicatorConfig for ObvConfig {
    type Builder = ObvConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        ObvConfigBuilder
    }

    #[inline]
    fn warm_up(&self) -> usize {
        0
    }
}

impl Display for ObvConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObvConfig")
    }
}

/// Builder for [`ObvConfig`].
pub struct ObvConfigBuilder;

impl IndicatorConfigBuilder<ObvConfig> for ObvConfigBuilder {
    #[inline]
    fn build(self) -> Result<ObvConfig> {
        Ok(ObvConfig)
    }
}

/// On-Balance Volume.
///
/// Starts at the first bar's volume, then adds the bar's volume when the
/// close rises, subtracts it when the close falls and carries the total
/// when the close is unchanged. Defined at every index.
#[derive(Clone, Debug)]
pub struct Obv {
    config: ObvConfig,
}

impl Indicator for Obv {
    type Config = ObvConfig;
    type Output = Series;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute<K>(&self, series: &PriceSeries<K>) -> Series {
        let close = series.close();
        let volume = series.volume();

        let mut out = Vec::with_capacity(close.len());
        let mut total = 0.0;
        for i in 0..close.len() {
            if i == 0 {
                total = volume[0];
            } else if close[i] > close[i - 1] {
                total += volume[i];
            } else if close[i] < close[i - 1] {
                total -= volume[i];
            }
            out.push(total);
        }

        out
    }
}

impl Display for Obv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OBV")
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{wavy, with_volume};

    #[test]
    fn accumulates_by_close_direction() {
        let series = with_volume(&[
            (10.0, 100.0),
            (11.0, 200.0),
            (10.0, 150.0),
            (10.0, 150.0),
            (9.0, 300.0),
        ]);
        let out = Obv::new(ObvConfig).compute(&series);
        assert_eq!(out, vec![100.0, 300.0, 150.0, 150.0, -150.0]);
    }

    #[test]
    fn defined_everywhere() {
        let out = Obv::new(ObvConfig).compute(&wavy(50));
        assert_eq!(out.len(), 50);
        assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn display() {
        assert_eq!(Obv::new(ObvConfig::builder().build().unwrap()).to_string(), "OBV");
    }
}
