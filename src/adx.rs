use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IntoLines, NamedSeries, Price,
    PriceSeries, PriceSource, Result, Series, window::undefined,
};

/// Configuration for the Average Directional Index ([`Adx`]).
///
/// +DI and −DI are defined from index `length`; ADX needs a further
/// `length - 1` DX values and is first defined at `2 × length − 1`.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct AdxConfig {
    length: usize,
}

impl IndicatorConfig for AdxConfig {
    type Builder = AdxConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        AdxConfigBuilder { length: 14 }
    }

    #[inline]
    fn warm_up(&self) -> usize {
        self.length.saturating_mul(2) - 1
    }
}

impl AdxConfig {
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

impl Display for AdxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AdxConfig({})", self.length)
    }
}

/// Builder for [`AdxConfig`]. Defaults: length = 14.
pub struct AdxConfigBuilder {
    length: usize,
}

impl AdxConfigBuilder {
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = length.get();
        self
    }
}

impl IndicatorConfigBuilder<AdxConfig> for AdxConfigBuilder {
    #[inline]
    fn build(self) -> Result<AdxConfig> {
        Ok(AdxConfig {
            length: self.length,
        })
    }
}

/// ADX line with its directional indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct AdxOutput {
    pub adx: Series,
    pub plus_di: Series,
    pub minus_di: Series,
}

impl IntoLines for AdxOutput {
    fn into_lines(self) -> Vec<NamedSeries> {
        vec![
            NamedSeries::new("adx", self.adx),
            NamedSeries::new("plus_di", self.plus_di),
            NamedSeries::new("minus_di", self.minus_di),
        ]
    }
}

/// Average Directional Index, Wilder's directional movement system.
///
/// From bar 1 onward:
///
/// ```text
/// up   = high − prev_high        down = prev_low − low
/// +DM  = up   if up > down and up > 0,   else 0
/// −DM  = down if down > up and down > 0, else 0
/// TR   = max(high − low, |high − prev_close|, |low − prev_close|)
/// ```
///
/// TR and both DMs are smoothed with Wilder's running sum
/// (`s = s − s / length + value`), seeded by the plain sum of the first
/// `length` values. `±DI = 100 × smoothed DM / smoothed TR` (0 when the
/// smoothed TR is 0) and `DX = 100 × |+DI − −DI| / (+DI + −DI)` (0 when
/// both are 0). ADX starts from the first DX and follows
/// `adx = (adx × (length − 1) + dx) / length`.
#[derive(Clone, Debug)]
pub struct Adx {
    config: AdxConfig,
}

impl Indicator for Adx {
    type Config = AdxConfig;
    type Output = AdxOutput;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute<K>(&self, series: &PriceSeries<K>) -> AdxOutput {
        let length = self.config.length;
        let n = series.len();
        let mut out = AdxOutput {
            adx: undefined(n),
            plus_di: undefined(n),
            minus_di: undefined(n),
        };
        if n <= length {
            return out;
        }

        let (high, low) = (series.high(), series.low());
        let tr = PriceSource::TrueRange.extract(series);

        let mut plus_dm = vec![0.0; n];
        let mut minus_dm = vec![0.0; n];
        for i in 1..n {
            (plus_dm[i], minus_dm[i]) =
                directional_movement(high[i - 1], low[i - 1], high[i], low[i]);
        }

        #[allow(clippy::cast_precision_loss)]
        let length_f = length as f64;

        let mut tr_sum: f64 = tr[1..=length].iter().sum();
        let mut plus_sum: f64 = plus_dm[1..=length].iter().sum();
        let mut minus_sum: f64 = minus_dm[1..=length].iter().sum();

        let mut dx = undefined(n);
        for i in length..n {
            if i > length {
                tr_sum = tr_sum - tr_sum / length_f + tr[i];
                plus_sum = plus_sum - plus_sum / length_f + plus_dm[i];
                minus_sum = minus_sum - minus_sum / length_f + minus_dm[i];
            }

            let plus_di = directional_index(plus_sum, tr_sum);
            let minus_di = directional_index(minus_sum, tr_sum);
            out.plus_di[i] = plus_di;
            out.minus_di[i] = minus_di;
            dx[i] = directional_spread(plus_di, minus_di);
        }

        let first = self.config.warm_up();
        let mut adx = dx[length];
        for i in length..n {
            if i > length {
                adx = adx.mul_add(length_f - 1.0, dx[i]) / length_f;
            }
            if i >= first {
                out.adx[i] = adx;
            }
        }

        out
    }
}

impl Display for Adx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ADX({})", self.config.length)
    }
}

/// `(+DM, −DM)` between two consecutive bars.
#[inline]
fn directional_movement(
    prev_high: Price,
    prev_low: Price,
    high: Price,
    low: Price,
) -> (f64, f64) {
    let up = high - prev_high;
    let down = prev_low - low;

    let plus = if up > down && up > 0.0 { up } else { 0.0 };
    let minus = if down > up && down > 0.0 { down } else { 0.0 };

    (plus, minus)
}

#[inline]
fn directional_index(smoothed_dm: f64, smoothed_tr: f64) -> f64 {
    if smoothed_tr == 0.0 {
        0.0
    } else {
        100.0 * smoothed_dm / smoothed_tr
    }
}

#[inline]
fn directional_spread(plus_di: f64, minus_di: f64) -> f64 {
    let total = plus_di + minus_di;
    if total == 0.0 {
        0.0
    } else {
        100.0 * (plus_di - minus_di).abs() / total
    }
}
