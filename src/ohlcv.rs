use serde::{Deserialize, Serialize};

/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// OHLCV bar data used as input to all indicators.
///
/// Implement this on your own kline/candle type to avoid conversion. Bars
/// carry no date of their own: the history is supplied as `(key, bar)`
/// pairs and [`PriceSeries`](crate::PriceSeries) orders them by key.
///
/// # Example
///
/// ```
/// use indicator_engine::{Ohlcv, Price};
///
/// struct MyKline {
///     o: f64, h: f64, l: f64, c: f64, v: f64,
/// }
///
/// impl Ohlcv for MyKline {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn volume(&self) -> f64 { self.v }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing price of the bar.
    fn close(&self) -> Price;

    /// Trade volume during the bar. Defaults to `0.0`.
    ///
    /// Override this for volume-dependent indicators (OBV, MFI, VWAP).
    /// Indicators that don't use volume ignore this value.
    fn volume(&self) -> f64 {
        0.0
    }
}

/// Plain OHLCV bar, as delivered by the data-fetching layer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bar {
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    #[serde(default)]
    pub volume: f64,
}

impl Bar {
    #[must_use]
    pub fn new(open: Price, high: Price, low: Price, close: Price, volume: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl Ohlcv for Bar {
    fn open(&self) -> Price {
        self.open
    }

    fn high(&self) -> Price {
        self.high
    }

    fn low(&self) -> Price {
        self.low
    }

    fn close(&self) -> Price {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }
}

impl<T: Ohlcv> Ohlcv for &T {
    fn open(&self) -> Price {
        (*self).open()
    }

    fn high(&self) -> Price {
        (*self).high()
    }

    fn low(&self) -> Price {
        (*self).low()
    }

    fn close(&self) -> Price {
        (*self).close()
    }

    fn volume(&self) -> f64 {
        (*self).volume()
    }
}
