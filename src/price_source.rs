use crate::{Price, PriceSeries, Series};

use std::fmt::{Debug, Display};

/// Per-bar input derived from a [`PriceSeries`] before feeding an indicator.
///
/// Indicators that work on a single price (SMA, EMA, RSI, Bollinger Bands)
/// are configured with a `PriceSource` that determines which value (or
/// derived value) they compute on.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub enum PriceSource {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Closing price.
    #[default]
    Close,
    /// Lowest price.
    Low,
    /// Median price: `(high + low) / 2`.
    HL2,
    /// Typical price: `(high + low + close) / 3`.
    HLC3,
    /// Average price: `(open + high + low + close) / 4`.
    OHLC4,
    /// Weighted close: `(high + low + close + close) / 4`.
    HLCC4,
    /// True range: `max(high - low, |high - prev_close|, |low - prev_close|)`.
    ///
    /// On the first bar (no previous close), falls back to `high - low`.
    TrueRange,
}

impl Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl PriceSource {
    /// Extracts the source value for every bar of `series`.
    #[must_use]
    pub fn extract<K>(self, series: &PriceSeries<K>) -> Series {
        match self {
            Self::Open => series.open().to_vec(),
            Self::High => series.high().to_vec(),
            Self::Close => series.close().to_vec(),
            Self::Low => series.low().to_vec(),
            _ => (0..series.len())
                .map(|i| {
                    let prev_close = i.checked_sub(1).map(|p| series.close()[p]);
                    self.at(
                        series.open()[i],
                        series.high()[i],
                        series.low()[i],
                        series.close()[i],
                        prev_close,
                    )
                })
                .collect(),
        }
    }

    #[inline]
    fn at(
        self,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        prev_close: Option<Price>,
    ) -> Price {
        match self {
            Self::Open => open,
            Self::High => high,
            Self::Close => close,
            Self::Low => low,
            Self::HL2 => f64::midpoint(high, low),
            Self::HLC3 => (high + low + close) / 3.0,
            Self::OHLC4 => (open + high + low + close) / 4.0,
            Self::HLCC4 => (high + low + close + close) / 4.0,
            Self::TrueRange => {
                let hl = high - low;

                match prev_close {
                    Some(prev_close) => {
                        let hc = (high - prev_close).abs();
                        let lc = (low - prev_close).abs();
                        hl.max(hc).max(lc)
                    }
                    None => hl,
                }
            }
        }
    }
}
