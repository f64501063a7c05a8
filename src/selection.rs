use std::{fmt::Display, num::NonZero, str::FromStr};

use tracing::trace;

use crate::{
    Adx, AdxConfig, Aroon, AroonConfig, Atr, AtrConfig, Bb, BbConfig, Cci, CciConfig, Donchian,
    DonchianConfig, Ema, EmaConfig, Ichimoku, IchimokuConfig, IndicatorConfig,
    IndicatorConfigBuilder, IndicatorError, IntoLines, Macd, MacdConfig, Mfi, MfiConfig,
    Multiplier, NamedSeries, Obv, ObvConfig, PriceSeries, Psar, PsarConfig, Result, Rsi,
    RsiConfig, Series, Sma, SmaConfig, Stochastic, StochasticConfig, StochasticRsi,
    StochasticRsiConfig, SuperTrend, SuperTrendConfig, Vwap, VwapConfig, WilliamsR,
    WilliamsRConfig,
};

/// A validated indicator request: which indicator, with which parameters.
///
/// Parsed from the `name` / `name:p1,p2,...` syntax used by the serving
/// layer. Names are case-insensitive and a few common aliases are accepted
/// (`bb` for `bollinger`, `stoch` for `stochastic`, `willr` for
/// `williams_r`, ...). Trailing parameters may be omitted and take the
/// indicator's defaults. [`Display`] renders the canonical form.
///
/// # Example
///
/// ```
/// use indicator_engine::Selection;
///
/// let selection: Selection = "MACD:12,26".parse().unwrap();
/// assert_eq!(selection.to_string(), "macd:12,26,9");
///
/// assert!("macd:26,12".parse::<Selection>().is_err());
/// assert!("nope".parse::<Selection>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection {
    Rsi(RsiConfig),
    StochasticRsi(StochasticRsiConfig),
    Stochastic(StochasticConfig),
    Cci(CciConfig),
    WilliamsR(WilliamsRConfig),
    Mfi(MfiConfig),
    Macd(MacdConfig),
    Adx(AdxConfig),
    Aroon(AroonConfig),
    Bollinger(BbConfig),
    SuperTrend(SuperTrendConfig),
    Ichimoku(IchimokuConfig),
    Atr(AtrConfig),
    Donchian(DonchianConfig),
    Psar(PsarConfig),
    Obv(ObvConfig),
    Vwap(VwapConfig),
    /// One line per period.
    Sma(Vec<SmaConfig>),
    /// One line per period.
    Ema(Vec<EmaConfig>),
}

impl Selection {
    /// Canonical indicator name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rsi(_) => "rsi",
            Self::StochasticRsi(_) => "stochrsi",
            Self::Stochastic(_) => "stochastic",
            Self::Cci(_) => "cci",
            Self::WilliamsR(_) => "williams_r",
            Self::Mfi(_) => "mfi",
            Self::Macd(_) => "macd",
            Self::Adx(_) => "adx",
            Self::Aroon(_) => "aroon",
            Self::Bollinger(_) => "bollinger",
            Self::SuperTrend(_) => "supertrend",
            Self::Ichimoku(_) => "ichimoku",
            Self::Atr(_) => "atr",
            Self::Donchian(_) => "donchian",
            Self::Psar(_) => "psar",
            Self::Obv(_) => "obv",
            Self::Vwap(_) => "vwap",
            Self::Sma(_) => "sma",
            Self::Ema(_) => "ema",
        }
    }

    /// Number of leading undefined entries in the slowest output line.
    #[must_use]
    pub fn warm_up(&self) -> usize {
        match self {
            Self::Rsi(c) => c.warm_up(),
            Self::StochasticRsi(c) => c.warm_up(),
            Self::Stochastic(c) => c.warm_up(),
            Self::Cci(c) => c.warm_up(),
            Self::WilliamsR(c) => c.warm_up(),
            Self::Mfi(c) => c.warm_up(),
            Self::Macd(c) => c.warm_up(),
            Self::Adx(c) => c.warm_up(),
            Self::Aroon(c) => c.warm_up(),
            Self::Bollinger(c) => c.warm_up(),
            Self::SuperTrend(c) => c.warm_up(),
            Self::Ichimoku(c) => c.warm_up(),
            Self::Atr(c) => c.warm_up(),
            Self::Donchian(c) => c.warm_up(),
            Self::Psar(c) => c.warm_up(),
            Self::Obv(c) => c.warm_up(),
            Self::Vwap(c) => c.warm_up(),
            Self::Sma(cs) => cs.iter().map(IndicatorConfig::warm_up).max().unwrap_or(0),
            Self::Ema(cs) => cs.iter().map(IndicatorConfig::warm_up).max().unwrap_or(0),
        }
    }

    /// Runs the selected indicator and names its output lines.
    #[must_use]
    pub fn compute<K>(&self, series: &PriceSeries<K>) -> Vec<NamedSeries> {
        let name = self.name();
        match self {
            Self::Rsi(c) => single(name, Rsi::new(*c).compute(series)),
            Self::StochasticRsi(c) => StochasticRsi::new(*c).compute(series).into_lines(),
            Self::Stochastic(c) => Stochastic::new(*c).compute(series).into_lines(),
            Self::Cci(c) => single(name, Cci::new(*c).compute(series)),
            Self::WilliamsR(c) => single(name, WilliamsR::new(*c).compute(series)),
            Self::Mfi(c) => single(name, Mfi::new(*c).compute(series)),
            Self::Macd(c) => Macd::new(*c).compute(series).into_lines(),
            Self::Adx(c) => Adx::new(*c).compute(series).into_lines(),
            Self::Aroon(c) => Aroon::new(*c).compute(series).into_lines(),
            Self::Bollinger(c) => Bb::new(*c).compute(series).into_lines(),
            Self::SuperTrend(c) => SuperTrend::new(*c).compute(series).into_lines(),
            Self::Ichimoku(c) => Ichimoku::new(*c).compute(series).into_lines(),
            Self::Atr(c) => single(name, Atr::new(*c).compute(series)),
            Self::Donchian(c) => Donchian::new(*c).compute(series).into_lines(),
            Self::Psar(c) => single(name, Psar::new(*c).compute(series)),
            Self::Obv(c) => single(name, Obv::new(*c).compute(series)),
            Self::Vwap(c) => single(name, Vwap::new(*c).compute(series)),
            Self::Sma(cs) => cs
                .iter()
                .map(|c| {
                    let values = Sma::new(*c).compute(series);
                    NamedSeries::new(format!("sma_{}", c.length()), values)
                })
                .collect(),
            Self::Ema(cs) => cs
                .iter()
                .map(|c| {
                    let values = Ema::new(*c).compute(series);
                    NamedSeries::new(format!("ema_{}", c.length()), values)
                })
                .collect(),
        }
    }
}

fn single(name: &str, values: Series) -> Vec<NamedSeries> {
    vec![NamedSeries::new(name, values)]
}

impl FromStr for Selection {
    type Err = IndicatorError;

    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let (name, raw_params) = match trimmed.split_once(':') {
            Some((name, params)) => (name.trim(), Some(params)),
            None => (trimmed, None),
        };
        if name.is_empty() {
            return Err(IndicatorError::malformed(input, "missing indicator name"));
        }

        let mut p = Params::parse(input, raw_params)?;
        let selection = match name.to_ascii_lowercase().as_str() {
            "rsi" => Self::Rsi(
                RsiConfig::builder()
                    .length(p.period("rsi", 14)?)
                    .build()?,
            ),
            "stochrsi" | "stoch_rsi" => Self::StochasticRsi(
                StochasticRsiConfig::builder()
                    .rsi_length(p.period("stochrsi", 14)?)
                    .stoch_length(p.period("stochrsi", 14)?)
                    .smooth(p.period("stochrsi", 3)?)
                    .signal(p.period("stochrsi", 3)?)
                    .build()?,
            ),
            "stochastic" | "stoch" => Self::Stochastic(
                StochasticConfig::builder()
                    .length(p.period("stochastic", 14)?)
                    .smooth(p.period("stochastic", 3)?)
                    .signal(p.period("stochastic", 3)?)
                    .build()?,
            ),
            "cci" => Self::Cci(CciConfig::new(p.period("cci", 20)?)),
            "williams_r" | "williams" | "willr" => {
                Self::WilliamsR(WilliamsRConfig::new(p.period("williams_r", 14)?))
            }
            "mfi" => Self::Mfi(MfiConfig::new(p.period("mfi", 14)?)),
            "macd" => Self::Macd(
                MacdConfig::builder()
                    .fast(p.period("macd", 12)?)
                    .slow(p.period("macd", 26)?)
                    .signal(p.period("macd", 9)?)
                    .build()?,
            ),
            "adx" => Self::Adx(AdxConfig::new(p.period("adx", 14)?)),
            "aroon" => Self::Aroon(AroonConfig::new(p.period("aroon", 25)?)),
            "bollinger" | "bb" | "bbands" => Self::Bollinger(
                BbConfig::builder()
                    .length(p.period("bollinger", 20)?)
                    .std_dev(p.multiplier("bollinger", 2.0)?)
                    .build()?,
            ),
            "supertrend" => Self::SuperTrend(
                SuperTrendConfig::builder()
                    .length(p.period("supertrend", 10)?)
                    .multiplier(p.multiplier("supertrend", 3.0)?)
                    .build()?,
            ),
            "ichimoku" => Self::Ichimoku(
                IchimokuConfig::builder()
                    .tenkan(p.period("ichimoku", 9)?)
                    .kijun(p.period("ichimoku", 26)?)
                    .senkou(p.period("ichimoku", 52)?)
                    .build()?,
            ),
            "atr" => Self::Atr(AtrConfig::new(p.period("atr", 14)?)),
            "donchian" => Self::Donchian(DonchianConfig::new(p.period("donchian", 20)?)),
            "psar" => Self::Psar(
                PsarConfig::builder()
                    .step(p.multiplier("psar", 0.02)?)
                    .max_step(p.multiplier("psar", 0.2)?)
                    .build()?,
            ),
            "obv" => Self::Obv(ObvConfig),
            "vwap" => Self::Vwap(if p.is_empty() {
                VwapConfig::cumulative()
            } else {
                VwapConfig::rolling(p.period("vwap", 20)?)
            }),
            "sma" => Self::Sma(
                p.periods("sma", 20)?
                    .into_iter()
                    .map(SmaConfig::close)
                    .collect(),
            ),
            "ema" => Self::Ema(
                p.periods("ema", 20)?
                    .into_iter()
                    .map(EmaConfig::close)
                    .collect(),
            ),
            other => return Err(IndicatorError::UnknownIndicator(other.to_owned())),
        };
        p.finish()?;

        trace!(input, selection = %selection, "parsed indicator selection");
        Ok(selection)
    }
}

impl Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.name();
        match self {
            Self::Rsi(c) => write!(f, "{name}:{}", c.length()),
            Self::StochasticRsi(c) => write!(
                f,
                "{name}:{},{},{},{}",
                c.rsi_length(),
                c.stoch_length(),
                c.smooth(),
                c.signal()
            ),
            Self::Stochastic(c) => {
                write!(f, "{name}:{},{},{}", c.length(), c.smooth(), c.signal())
            }
            Self::Cci(c) => write!(f, "{name}:{}", c.length()),
            Self::WilliamsR(c) => write!(f, "{name}:{}", c.length()),
            Self::Mfi(c) => write!(f, "{name}:{}", c.length()),
            Self::Macd(c) => write!(f, "{name}:{},{},{}", c.fast(), c.slow(), c.signal()),
            Self::Adx(c) => write!(f, "{name}:{}", c.length()),
            Self::Aroon(c) => write!(f, "{name}:{}", c.length()),
            Self::Bollinger(c) => write!(f, "{name}:{},{}", c.length(), c.std_dev()),
            Self::SuperTrend(c) => write!(f, "{name}:{},{}", c.length(), c.multiplier()),
            Self::Ichimoku(c) => {
                write!(f, "{name}:{},{},{}", c.tenkan(), c.kijun(), c.senkou())
            }
            Self::Atr(c) => write!(f, "{name}:{}", c.length()),
            Self::Donchian(c) => write!(f, "{name}:{}", c.length()),
            Self::Psar(c) => write!(f, "{name}:{},{}", c.step(), c.max_step()),
            Self::Obv(_) => write!(f, "{name}"),
            Self::Vwap(c) => match c.length() {
                Some(length) => write!(f, "{name}:{length}"),
                None => write!(f, "{name}"),
            },
            Self::Sma(cs) => write_periods(f, name, cs.iter().map(SmaConfig::length)),
            Self::Ema(cs) => write_periods(f, name, cs.iter().map(EmaConfig::length)),
        }
    }
}

fn write_periods(
    f: &mut std::fmt::Formatter<'_>,
    name: &str,
    periods: impl Iterator<Item = usize>,
) -> std::fmt::Result {
    write!(f, "{name}")?;
    for (i, period) in periods.enumerate() {
        write!(f, "{}{period}", if i == 0 { ':' } else { ',' })?;
    }
    Ok(())
}

/// Positional parameters of one selection, consumed in order.
struct Params<'a> {
    input: &'a str,
    values: Vec<&'a str>,
    next: usize,
}

impl<'a> Params<'a> {
    fn parse(input: &'a str, raw: Option<&'a str>) -> Result<Self> {
        let values: Vec<&str> = raw
            .map(|raw| raw.split(',').map(str::trim).collect())
            .unwrap_or_default();

        if values.iter().any(|v| v.is_empty()) {
            return Err(IndicatorError::malformed(input, "empty parameter"));
        }

        Ok(Self {
            input,
            values,
            next: 0,
        })
    }

    fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn take(&mut self) -> Option<&'a str> {
        let value = self.values.get(self.next).copied();
        self.next += 1;
        value
    }

    fn period(&mut self, indicator: &'static str, default: usize) -> Result<NonZero<usize>> {
        let value = match self.take() {
            None => default,
            Some(raw) => raw.parse::<usize>().map_err(|_| {
                IndicatorError::malformed(self.input, format!("`{raw}` is not a whole number"))
            })?,
        };

        NonZero::new(value)
            .ok_or_else(|| IndicatorError::invalid(indicator, "periods must be positive"))
    }

    fn multiplier(&mut self, indicator: &'static str, default: f64) -> Result<Multiplier> {
        let value = match self.take() {
            None => default,
            Some(raw) => raw.parse::<f64>().map_err(|_| {
                IndicatorError::malformed(self.input, format!("`{raw}` is not a number"))
            })?,
        };

        Multiplier::new(indicator, value)
    }

    /// Every remaining parameter as a period, or just `default` when none
    /// were given. Each period names its own line, so repeats are rejected.
    fn periods(&mut self, indicator: &'static str, default: usize) -> Result<Vec<NonZero<usize>>> {
        let count = self.values.len().max(1);
        let mut periods = Vec::with_capacity(count);
        for _ in 0..count {
            let period = self.period(indicator, default)?;
            if periods.contains(&period) {
                return Err(IndicatorError::malformed(
                    self.input,
                    format!("period {period} is repeated"),
                ));
            }
            periods.push(period);
        }
        Ok(periods)
    }

    fn finish(&self) -> Result<()> {
        if self.next < self.values.len() {
            return Err(IndicatorError::malformed(
                self.input,
                format!(
                    "expected at most {} parameter(s), got {}",
                    self.next,
                    self.values.len()
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::wavy;

    fn parse(input: &str) -> Selection {
        input.parse().unwrap()
    }

    mod parsing {
        use super::*;

        #[test]
        fn defaults_fill_missing_parameters() {
            assert_eq!(parse("rsi").to_string(), "rsi:14");
            assert_eq!(parse("macd").to_string(), "macd:12,26,9");
            assert_eq!(parse("macd:5,35").to_string(), "macd:5,35,9");
            assert_eq!(parse("bollinger").to_string(), "bollinger:20,2");
            assert_eq!(parse("psar").to_string(), "psar:0.02,0.2");
            assert_eq!(parse("vwap").to_string(), "vwap");
        }

        #[test]
        fn case_and_whitespace_are_ignored() {
            assert_eq!(parse("  RSI : 21 ").to_string(), "rsi:21");
            assert_eq!(parse("Sma:20, 50,200").to_string(), "sma:20,50,200");
        }

        #[test]
        fn aliases() {
            assert_eq!(parse("bb:20,2.5").name(), "bollinger");
            assert_eq!(parse("bbands").name(), "bollinger");
            assert_eq!(parse("stoch").name(), "stochastic");
            assert_eq!(parse("stoch_rsi").name(), "stochrsi");
            assert_eq!(parse("willr").name(), "williams_r");
            assert_eq!(parse("williams").name(), "williams_r");
        }

        #[test]
        fn display_parses_back() {
            for input in [
                "rsi:7",
                "stochrsi:14,10,3,3",
                "stochastic:5,3,3",
                "cci:20",
                "williams_r:14",
                "mfi:10",
                "macd:12,26,9",
                "adx:14",
                "aroon:25",
                "bollinger:20,2.5",
                "supertrend:10,3",
                "ichimoku:9,26,52",
                "atr:14",
                "donchian:20",
                "psar:0.02,0.2",
                "obv",
                "vwap:20",
                "sma:20,50,200",
                "ema:12",
            ] {
                let selection = parse(input);
                assert_eq!(selection.to_string(), input);
                assert_eq!(parse(&selection.to_string()), selection);
            }
        }
    }

    mod rejection {
        use super::*;

        fn error(input: &str) -> IndicatorError {
            input.parse::<Selection>().unwrap_err()
        }

        #[test]
        fn unknown_name() {
            assert!(matches!(
                error("foo:14"),
                IndicatorError::UnknownIndicator(name) if name == "foo"
            ));
        }

        #[test]
        fn malformed_parameters() {
            for input in ["rsi:abc", "rsi:", "sma:20,,50", "rsi:14.5", ":14", "rsi:-3"] {
                assert!(
                    matches!(error(input), IndicatorError::MalformedSelection { .. }),
                    "{input}"
                );
            }
        }

        #[test]
        fn repeated_average_periods() {
            for input in ["sma:5,5", "ema:12,26,12"] {
                assert!(
                    matches!(error(input), IndicatorError::MalformedSelection { .. }),
                    "{input}"
                );
            }
        }

        #[test]
        fn too_many_parameters() {
            assert!(matches!(error("rsi:14,3"), IndicatorError::MalformedSelection { .. }));
            assert!(matches!(error("obv:3"), IndicatorError::MalformedSelection { .. }));
        }

        #[test]
        fn invalid_parameters() {
            for input in [
                "rsi:0",
                "macd:26,12,9",
                "bollinger:1",
                "bollinger:20,-2",
                "psar:0.5,0.2",
            ] {
                assert!(
                    matches!(error(input), IndicatorError::InvalidParameter { .. }),
                    "{input}"
                );
            }
        }
    }

    mod dispatch {
        use super::*;

        fn line_names(input: &str) -> Vec<String> {
            parse(input)
                .compute(&wavy(60))
                .into_iter()
                .map(|l| l.name)
                .collect()
        }

        #[test]
        fn single_line_indicators_use_their_name() {
            assert_eq!(line_names("rsi"), ["rsi"]);
            assert_eq!(line_names("willr"), ["williams_r"]);
            assert_eq!(line_names("obv"), ["obv"]);
        }

        #[test]
        fn averages_name_each_period() {
            assert_eq!(line_names("sma:5,10"), ["sma_5", "sma_10"]);
            assert_eq!(line_names("ema"), ["ema_20"]);
        }

        #[test]
        fn composite_lines() {
            assert_eq!(line_names("macd"), ["macd", "signal", "histogram"]);
            assert_eq!(line_names("stochrsi"), ["k", "d"]);
            assert_eq!(line_names("aroon"), ["up", "down", "oscillator"]);
        }

        #[test]
        fn every_line_matches_history_length() {
            let series = wavy(60);
            for input in ["ichimoku", "supertrend", "adx", "donchian", "vwap", "psar"] {
                for line in parse(input).compute(&series) {
                    assert_eq!(line.values.len(), 60, "{input}/{}", line.name);
                }
            }
        }

        #[test]
        fn warm_up_of_slowest_line() {
            assert_eq!(parse("sma:5,20").warm_up(), 19);
            assert_eq!(parse("macd").warm_up(), 34);
            assert_eq!(parse("obv").warm_up(), 0);
        }
    }
}
