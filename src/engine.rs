use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{Packaged, PriceSeries, Result, Selection, Settings, output::package};

/// Evaluates indicator selections against a price history and packages the
/// results.
///
/// The engine holds only its [`Settings`]; every call recomputes from the
/// series it is given.
///
/// # Example
///
/// ```
/// use indicator_engine::{Bar, Engine, PriceSeries, Settings};
///
/// let series = PriceSeries::from_bars(
///     (0..30).map(|i| (i, Bar::new(10.0, 11.0, 9.0, 10.0 + f64::from(i), 100.0))),
/// )
/// .unwrap();
///
/// let engine = Engine::new(Settings::default());
/// let rsi = engine.evaluate_str("rsi:14", &series).unwrap();
///
/// let values = rsi.line("rsi").unwrap();
/// assert_eq!(values[&0], None);
/// assert_eq!(values[&20], Some(100.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    settings: Settings,
}

impl Engine {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Computes one selection and packages its lines onto the series dates.
    #[must_use]
    pub fn evaluate<K: Ord + Clone>(
        &self,
        selection: &Selection,
        series: &PriceSeries<K>,
    ) -> Packaged<K> {
        debug!(indicator = %selection, bars = series.len(), "evaluating indicator");

        let warm_up = selection.warm_up();
        if series.len() <= warm_up {
            debug!(
                indicator = %selection,
                bars = series.len(),
                warm_up,
                "history shorter than warm-up, output is undefined"
            );
        }

        package(
            series.dates(),
            selection.compute(series),
            self.settings.precision,
        )
    }

    /// Parses `selection` and evaluates it.
    ///
    /// # Errors
    ///
    /// The parse errors of [`Selection`]: unknown indicator, malformed
    /// selection or invalid parameters.
    pub fn evaluate_str<K: Ord + Clone>(
        &self,
        selection: &str,
        series: &PriceSeries<K>,
    ) -> Result<Packaged<K>> {
        let selection: Selection = selection.parse()?;
        Ok(self.evaluate(&selection, series))
    }

    /// Evaluates several selections over the same series.
    ///
    /// Results keep the order of `selections`, each paired with its input
    /// text. A rejected selection does not stop the others. Selections run
    /// in parallel when [`Settings::parallel`] is set.
    pub fn evaluate_all<K, S>(
        &self,
        selections: &[S],
        series: &PriceSeries<K>,
    ) -> Vec<(String, Result<Packaged<K>>)>
    where
        K: Ord + Clone + Send + Sync,
        S: AsRef<str> + Sync,
    {
        let run = |input: &S| {
            let input = input.as_ref();
            let result = self.evaluate_str(input, series);
            if let Err(e) = &result {
                warn!(selection = input, error = %e, "rejected indicator selection");
            }
            (input.to_owned(), result)
        };

        if self.settings.parallel {
            selections.par_iter().map(run).collect()
        } else {
            selections.iter().map(run).collect()
        }
    }

    /// Evaluates the selections listed in [`Settings::indicators`].
    pub fn evaluate_defaults<K>(
        &self,
        series: &PriceSeries<K>,
    ) -> Vec<(String, Result<Packaged<K>>)>
    where
        K: Ord + Clone + Send + Sync,
    {
        self.evaluate_all(&self.settings.indicators, series)
    }
}
