use std::collections::BTreeMap;

use serde::Serialize;

use crate::NamedSeries;

/// Decimal places kept when packaging, unless configured otherwise.
pub const DEFAULT_PRECISION: u32 = 2;

/// One indicator line keyed by date; `None` marks an undefined entry.
pub type TimeSeries<K> = BTreeMap<K, Option<f64>>;

/// Indicator result ready for the serving layer.
///
/// Serialises without a tag: a single line becomes `{date: value}`, several
/// lines become `{line: {date: value}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Packaged<K: Ord> {
    Single(TimeSeries<K>),
    Multi(BTreeMap<String, TimeSeries<K>>),
}

impl<K: Ord> Packaged<K> {
    /// The line called `name`. A single-line result answers to any name.
    #[must_use]
    pub fn line(&self, name: &str) -> Option<&TimeSeries<K>> {
        match self {
            Self::Single(values) => Some(values),
            Self::Multi(lines) => lines.get(name),
        }
    }

    /// Line names, empty for a single-line result.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Single(_) => Vec::new(),
            Self::Multi(lines) => lines.keys().map(String::as_str).collect(),
        }
    }
}

/// Zips computed lines back onto their dates.
///
/// Values are rounded half away from zero to `precision` decimals;
/// non-finite values become `None`. `dates` and every line must have the
/// same length.
#[must_use]
pub fn package<K: Ord + Clone>(
    dates: &[K],
    mut lines: Vec<NamedSeries>,
    precision: u32,
) -> Packaged<K> {
    if lines.len() == 1
        && let Some(line) = lines.pop()
    {
        return Packaged::Single(keyed(dates, &line.values, precision));
    }

    Packaged::Multi(
        lines
            .into_iter()
            .map(|line| (line.name, keyed(dates, &line.values, precision)))
            .collect(),
    )
}

/// Rounds half away from zero; `None` for `NaN` and infinities.
#[must_use]
pub fn round_to(value: f64, precision: u32) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }

    let factor = 10f64.powf(f64::from(precision));
    let rounded = (value * factor).round() / factor;

    // Precision beyond what the value can carry overflows the scaled value.
    Some(if rounded.is_finite() { rounded } else { value })
}

fn keyed<K: Ord + Clone>(dates: &[K], values: &[f64], precision: u32) -> TimeSeries<K> {
    debug_assert_eq!(dates.len(), values.len());
    dates
        .iter()
        .cloned()
        .zip(values.iter().map(|&v| round_to(v, precision)))
        .collect()
}
