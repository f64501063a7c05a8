use chrono::NaiveDate;

use crate::{IndicatorError, Ohlcv, Price, Result};

/// Aligned indicator output: one value per input bar, `NaN` where the
/// indicator is undefined (warm-up).
pub type Series = Vec<Price>;

/// Price history prepared for indicator computation.
///
/// Holds the sorted bar keys and one aligned array per OHLCV field. Index 0 is
/// the earliest bar. Every indicator reads from this type and returns series
/// of exactly [`len`](PriceSeries::len) values.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use indicator_engine::{Bar, PriceSeries};
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
/// let series = PriceSeries::from_bars([
///     (day(3), Bar::new(3.0, 3.0, 3.0, 3.0, 30.0)),
///     (day(1), Bar::new(1.0, 1.0, 1.0, 1.0, 10.0)),
///     (day(2), Bar::new(2.0, 2.0, 2.0, 2.0, 20.0)),
/// ])
/// .unwrap();
///
/// assert_eq!(series.dates(), &[day(1), day(2), day(3)]);
/// assert_eq!(series.close(), &[1.0, 2.0, 3.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries<K = NaiveDate> {
    dates: Vec<K>,
    open: Vec<Price>,
    high: Vec<Price>,
    low: Vec<Price>,
    close: Vec<Price>,
    volume: Vec<f64>,
}

impl<K: Ord> PriceSeries<K> {
    /// Builds a series from `(key, bar)` pairs in any order.
    ///
    /// Bars are sorted by key. When a key appears more than once the bar
    /// supplied last wins.
    ///
    /// # Errors
    ///
    /// [`IndicatorError::InsufficientData`] if no bars are supplied.
    pub fn from_bars<B, I>(bars: I) -> Result<Self>
    where
        B: Ohlcv,
        I: IntoIterator<Item = (K, B)>,
    {
        let mut keyed: Vec<(K, B)> = bars.into_iter().collect();

        if keyed.is_empty() {
            return Err(IndicatorError::InsufficientData {
                required: 1,
                available: 0,
            });
        }

        // Stable sort keeps supply order among equal keys.
        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        let mut series = Self::with_capacity(keyed.len());
        for (key, bar) in keyed {
            if series.dates.last().is_some_and(|last| *last == key) {
                series.pop();
            }
            series.push(key, &bar);
        }

        Ok(series)
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            dates: Vec::with_capacity(capacity),
            open: Vec::with_capacity(capacity),
            high: Vec::with_capacity(capacity),
            low: Vec::with_capacity(capacity),
            close: Vec::with_capacity(capacity),
            volume: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, key: K, bar: &impl Ohlcv) {
        self.dates.push(key);
        self.open.push(bar.open());
        self.high.push(bar.high());
        self.low.push(bar.low());
        self.close.push(bar.close());
        self.volume.push(bar.volume());
    }

    fn pop(&mut self) {
        self.dates.pop();
        self.open.pop();
        self.high.pop();
        self.low.pop();
        self.close.pop();
        self.volume.pop();
    }
}

impl<K> PriceSeries<K> {
    /// Number of bars.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Always `false` for a constructed series; kept for API symmetry.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Sorted bar keys.
    #[inline]
    #[must_use]
    pub fn dates(&self) -> &[K] {
        &self.dates
    }

    #[inline]
    #[must_use]
    pub fn open(&self) -> &[Price] {
        &self.open
    }

    #[inline]
    #[must_use]
    pub fn high(&self) -> &[Price] {
        &self.high
    }

    #[inline]
    #[must_use]
    pub fn low(&self) -> &[Price] {
        &self.low
    }

    #[inline]
    #[must_use]
    pub fn close(&self) -> &[Price] {
        &self.close
    }

    #[inline]
    #[must_use]
    pub fn volume(&self) -> &[f64] {
        &self.volume
    }
}
