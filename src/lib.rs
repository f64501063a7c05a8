//! Batch technical analysis indicators for Rust.
//!
//! A [`PriceSeries`] holds a whole OHLCV history, sorted by date. Indicators
//! read it and return aligned series of the same length, `NaN` until the
//! indicator's warm-up has passed.
//!
//! Each indicator type ([`Rsi`], [`Macd`], [`Bb`], ...) exposes
//! [`new`](Rsi::new), [`compute`](Rsi::compute), and [`config`](Rsi::config)
//! as inherent methods, no trait import needed. Import [`Indicator`] only for
//! generic code.
//!
//! For text-driven use, [`Selection`] parses requests such as `"macd:12,26,9"`
//! and [`Engine`] evaluates them into date-keyed, rounded [`Packaged`] output.

mod adx;
mod aroon;
mod atr;
mod bb;
mod cci;
mod donchian;
mod ema;
mod engine;
mod error;
mod ichimoku;
mod indicator;
mod macd;
mod mfi;
mod multiplier;
mod obv;
mod ohlcv;
mod output;
mod price_source;
mod psar;
mod rsi;
mod selection;
mod series;
mod settings;
mod sma;
mod stoch;
mod stoch_rsi;
mod supertrend;
mod vwap;
mod williams_r;
mod window;

pub use crate::engine::Engine;
pub use crate::error::{IndicatorError, Result};
pub use crate::indicator::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IntoLines, NamedSeries,
};
pub use crate::multiplier::Multiplier;
pub use crate::ohlcv::{Bar, Ohlcv, Price};
pub use crate::output::{DEFAULT_PRECISION, Packaged, TimeSeries, package, round_to};
pub use crate::price_source::PriceSource;
pub use crate::selection::Selection;
pub use crate::series::{PriceSeries, Series};
pub use crate::settings::Settings;

pub use crate::adx::{Adx, AdxConfig, AdxConfigBuilder, AdxOutput};
pub use crate::aroon::{Aroon, AroonConfig, AroonConfigBuilder, AroonOutput};
pub use crate::atr::{Atr, AtrConfig, AtrConfigBuilder};
pub use crate::bb::{Bb, BbConfig, BbConfigBuilder, BbOutput};
pub use crate::cci::{Cci, CciConfig, CciConfigBuilder};
pub use crate::donchian::{Donchian, DonchianConfig, DonchianConfigBuilder, DonchianOutput};
pub use crate::ema::{Ema, EmaConfig, EmaConfigBuilder};
pub use crate::ichimoku::{Ichimoku, IchimokuConfig, IchimokuConfigBuilder, IchimokuOutput};
pub use crate::macd::{Macd, MacdConfig, MacdConfigBuilder, MacdOutput};
pub use crate::mfi::{Mfi, MfiConfig, MfiConfigBuilder};
pub use crate::obv::{Obv, ObvConfig, ObvConfigBuilder};
pub use crate::psar::{Psar, PsarConfig, PsarConfigBuilder};
pub use crate::rsi::{Rsi, RsiConfig, RsiConfigBuilder};
pub use crate::sma::{Sma, SmaConfig, SmaConfigBuilder};
pub use crate::stoch::{Stochastic, StochasticConfig, StochasticConfigBuilder, StochasticOutput};
pub use crate::stoch_rsi::{StochasticRsi, StochasticRsiConfig, StochasticRsiConfigBuilder};
pub use crate::supertrend::{
    SuperTrend, SuperTrendConfig, SuperTrendConfigBuilder, SuperTrendOutput, Trend,
};
pub use crate::vwap::{Vwap, VwapConfig, VwapConfigBuilder};
pub use crate::williams_r::{WilliamsR, WilliamsRConfig, WilliamsRConfigBuilder};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            #[must_use]
            #[inline]
            pub fn compute<K>(&self, series: &PriceSeries<K>) -> $output {
                <Self as Indicator>::compute(self, series)
            }

            /// See [`Indicator::config`].
            #[must_use]
            #[inline]
            pub fn config(&self) -> &$config {
                <Self as Indicator>::config(self)
            }
        }
    };
}

impl_indicator_methods!(Sma, SmaConfig, Series);
impl_indicator_methods!(Ema, EmaConfig, Series);
impl_indicator_methods!(Rsi, RsiConfig, Series);
impl_indicator_methods!(Cci, CciConfig, Series);
impl_indicator_methods!(WilliamsR, WilliamsRConfig, Series);
impl_indicator_methods!(Mfi, MfiConfig, Series);
impl_indicator_methods!(Atr, AtrConfig, Series);
impl_indicator_methods!(Psar, PsarConfig, Series);
impl_indicator_methods!(Obv, ObvConfig, Series);
impl_indicator_methods!(Vwap, VwapConfig, Series);
impl_indicator_methods!(Stochastic, StochasticConfig, StochasticOutput);
impl_indicator_methods!(StochasticRsi, StochasticRsiConfig, StochasticOutput);
impl_indicator_methods!(Macd, MacdConfig, MacdOutput);
impl_indicator_methods!(Adx, AdxConfig, AdxOutput);
impl_indicator_methods!(Aroon, AroonConfig, AroonOutput);
impl_indicator_methods!(Bb, BbConfig, BbOutput);
impl_indicator_methods!(SuperTrend, SuperTrendConfig, SuperTrendOutput);
impl_indicator_methods!(Ichimoku, IchimokuConfig, IchimokuOutput);
impl_indicator_methods!(Donchian, DonchianConfig, DonchianOutput);

#[cfg(test)]
mod test_util;
