use std::fmt::Display;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorError, Multiplier, Price,
    PriceSeries, Result, Series, window::undefined,
};

/// Configuration for the Parabolic SAR ([`Psar`]).
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct PsarConfig {
    step: Multiplier,
    max_step: Multiplier,
}

impl IndicatorConfig for PsarConfig {
    type Builder = PsarConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        PsarConfigBuilder {
            step: Multiplier::from_const(0.02),
            max_step: Multiplier::from_const(0.2),
        }
    }

    #[inline]
    fn warm_up(&self) -> usize {
        1
    }
}

impl PsarConfig {
    /// Acceleration factor start and increment.
    #[inline]
    #[must_use]
    pub fn step(&self) -> Multiplier {
        self.step
    }

    /// Acceleration factor cap.
    #[inline]
    #[must_use]
    pub fn max_step(&self) -> Multiplier {
        self.max_step
    }
}

impl Display for PsarConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PsarConfig({}, {})", self.step, self.max_step)
    }
}

/// Builder for [`PsarConfig`]. Defaults: step = 0.02, max step = 0.2.
pub struct PsarConfigBuilder {
    step: Multiplier,
    max_step: Multiplier,
}

impl PsarConfigBuilder {
    #[inline]
    #[must_use]
    pub fn step(mut self, step: Multiplier) -> Self {
        self.step = step;
        self
    }

    #[inline]
    #[must_use]
    pub fn max_step(mut self, max_step: Multiplier) -> Self {
        self.max_step = max_step;
        self
    }
}

impl IndicatorConfigBuilder<PsarConfig> for PsarConfigBuilder {
    fn build(self) -> Result<PsarConfig> {
        if self.step > self.max_step {
            return Err(IndicatorError::invalid(
                "psar",
                format!(
                    "step ({}) must not exceed max step ({})",
                    self.step, self.max_step
                ),
            ));
        }
        if self.max_step.value() > 1.0 {
            return Err(IndicatorError::invalid(
                "psar",
                format!("max step must be at most 1, got {}", self.max_step),
            ));
        }

        Ok(PsarConfig {
            step: self.step,
            max_step: self.max_step,
        })
    }
}

/// Wilder's Parabolic Stop and Reverse.
///
/// Each bar the SAR moves toward the extreme point (EP) by the acceleration
/// factor: `sar = sar + af × (ep − sar)`. While long, the SAR may not rise
/// above the two previous lows; while short, it may not fall below the two
/// previous highs. A bar that pierces the SAR reverses the position: the
/// SAR jumps to the old EP and the factor resets to `step`. A new extreme
/// raises the factor by `step`, up to `max_step`.
///
/// The first bar only seeds a long position (SAR at its low, EP at its
/// high) and stays undefined.
#[derive(Clone, Debug)]
pub struct Psar {
    config: PsarConfig,
}

impl Indicator for Psar {
    type Config = PsarConfig;
    type Output = Series;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute<K>(&self, series: &PriceSeries<K>) -> Series {
        let (high, low) = (series.high(), series.low());
        let mut out = undefined(series.len());
        if series.is_empty() {
            return out;
        }

        let step = self.config.step.value();
        let max_step = self.config.max_step.value();

        let mut long = true;
        let mut sar = low[0];
        let mut extreme = high[0];
        let mut af = step;

        for i in 1..series.len() {
            let mut next = af.mul_add(extreme - sar, sar);

            if long {
                next = next.min(prior_extreme(low, i, f64::min));
                if low[i] < next {
                    long = false;
                    next = extreme;
                    extreme = low[i];
                    af = step;
                } else if high[i] > extreme {
                    extreme = high[i];
                    af = (af + step).min(max_step);
                }
            } else {
                next = next.max(prior_extreme(high, i, f64::max));
                if high[i] > next {
                    long = true;
                    next = extreme;
                    extreme = high[i];
                    af = step;
                } else if low[i] < extreme {
                    extreme = low[i];
                    af = (af + step).min(max_step);
                }
            }

            sar = next;
            out[i] = sar;
        }

        out
    }
}

impl Display for Psar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PSAR({}, {})", self.config.step, self.config.max_step)
    }
}

/// Extreme of the one or two bars before `i`.
#[inline]
fn prior_extreme(values: &[Price], i: usize, pick: fn(f64, f64) -> f64) -> f64 {
    if i >= 2 {
        pick(values[i - 1], values[i - 2])
    } else {
        values[i - 1]
    }
}
