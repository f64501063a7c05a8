#![allow(dead_code)]

use chrono::NaiveDate;
use indicator_engine::{NamedSeries, Ohlcv, Price, PriceSeries};
use serde::{Deserialize, de::DeserializeOwned};

/// Daily OHLCV bar parsed from the fixture CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct RefBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Ohlcv for RefBar {
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

/// Expected indicator lines: one column per line, an empty cell where the
/// line is undefined.
#[derive(Debug)]
pub struct Reference {
    pub dates: Vec<NaiveDate>,
    pub lines: Vec<NamedSeries>,
}

impl Reference {
    pub fn line(&self, name: &str) -> &[f64] {
        self.lines
            .iter()
            .find(|line| line.name == name)
            .map(|line| line.values.as_slice())
            .unwrap_or_else(|| panic!("no reference line named {name}"))
    }
}

const OHLCV_PATH: &str = "tests/fixtures/data/bars.csv";

/// Load the reference OHLCV bars.
pub fn load_reference_ohlcvs() -> Vec<RefBar> {
    load_records(OHLCV_PATH, "invalid OHLCV record")
}

/// Load the reference bars as a date-keyed series.
pub fn load_reference_series() -> PriceSeries<NaiveDate> {
    PriceSeries::from_bars(load_reference_ohlcvs().into_iter().map(|bar| (bar.date, bar)))
        .expect("reference bars are not empty")
}

/// Load expected lines from a reference CSV (`date,<line>,<line>...`).
pub fn load_reference(path: &str) -> Reference {
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    let names: Vec<String> = rdr
        .headers()
        .expect("reference header")
        .iter()
        .skip(1)
        .map(str::to_owned)
        .collect();

    let mut dates = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];
    for record in rdr.records() {
        let record = record.expect("invalid reference record");
        dates.push(record[0].parse().expect("invalid reference date"));
        for (column, cell) in columns.iter_mut().zip(record.iter().skip(1)) {
            column.push(if cell.is_empty() {
                f64::NAN
            } else {
                cell.parse().expect("invalid reference value")
            });
        }
    }

    Reference {
        dates,
        lines: names
            .into_iter()
            .zip(columns)
            .map(|(name, values)| NamedSeries::new(name, values))
            .collect(),
    }
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Assert a computed line matches the reference bar for bar, including
/// which entries are undefined.
pub fn assert_line_matches(name: &str, actual: &[f64], expected: &[f64], tolerance: f64) {
    assert_eq!(actual.len(), expected.len(), "{name}: length mismatch");

    for (i, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        match (a.is_nan(), e.is_nan()) {
            (true, true) => {}
            (false, false) => assert_near(a, e, tolerance, &format!("{name} at bar {i}")),
            _ => panic!("{name}: definedness mismatch at bar {i}: actual={a}, expected={e}"),
        }
    }
}

/// Generate a reference test for a selection: every output line must match
/// the CSV column of the same name.
///
/// Usage: `reference_test!(rsi_14, "rsi:14", "tests/fixtures/data/rsi-14.csv", 1e-6);`
#[allow(unused_macros)]
macro_rules! reference_test {
    ($name:ident, $selection:expr, $ref_path:expr, $tolerance:expr) => {
        mod $name {
            #[allow(unused_imports)]
            use super::*;
            use super::fixtures::*;
            use indicator_engine::Selection;

            #[test]
            fn matches_reference() {
                let series = load_reference_series();
                let reference = load_reference($ref_path);
                assert_eq!(series.dates(), reference.dates.as_slice());

                let selection: Selection = $selection.parse().unwrap();
                let lines = selection.compute(&series);
                assert_eq!(
                    lines.len(),
                    reference.lines.len(),
                    "{} line count",
                    stringify!($name)
                );

                for line in &lines {
                    assert_line_matches(
                        &format!("{} {}", stringify!($name), line.name),
                        &line.values,
                        reference.line(&line.name),
                        $tolerance,
                    );
                }
            }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use reference_test;

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
