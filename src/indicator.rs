use crate::{PriceSeries, Result, Series};

use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

/// Configuration for a technical [`Indicator`].
///
/// Every indicator has a corresponding config type that holds its parameters
/// (periods, multipliers, price source). Configs are value types: cheap to
/// clone, compare, and hash. A constructed config is always valid.
pub trait IndicatorConfig: Sized + Copy + PartialEq + Eq + Hash + Display + Debug {
    /// Builder type for constructing this config.
    type Builder: IndicatorConfigBuilder<Self>;

    /// Returns a new builder holding the conventional default parameters.
    fn builder() -> Self::Builder;

    /// Index of the first defined output value: the number of leading
    /// undefined entries in a long enough history.
    fn warm_up(&self) -> usize;
}

/// Builder for an [`IndicatorConfig`].
///
/// Builders start from conventional defaults (e.g. RSI 14, MACD 12/26/9), so
/// every field is optional. Parameter setters live on the concrete builders.
pub trait IndicatorConfigBuilder<Config>
where
    Config: IndicatorConfig,
{
    /// Validates the parameters and builds the config.
    ///
    /// # Errors
    ///
    /// [`IndicatorError::InvalidParameter`](crate::IndicatorError::InvalidParameter)
    /// when parameters contradict each other (e.g. MACD fast ≥ slow). Nothing
    /// is allocated for computation before validation succeeds.
    fn build(self) -> Result<Config>;
}

/// One named output line of an indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    pub name: String,
    pub values: Series,
}

impl NamedSeries {
    #[must_use]
    pub fn new(name: impl Into<String>, values: Series) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Indicator output that can be flattened into named lines for packaging.
///
/// Single-line indicators produce one line; composite indicators produce one
/// line per field, in a fixed order.
pub trait IntoLines {
    fn into_lines(self) -> Vec<NamedSeries>;
}

/// A batch technical indicator.
///
/// Indicators are stateless: [`compute`](Indicator::compute) reads the whole
/// price history and returns series of the same length, `NaN` before the
/// warm-up index. A history shorter than the warm-up yields all-`NaN`
/// output rather than an error.
///
/// # Example
///
/// ```
/// use indicator_engine::{Bar, Indicator, PriceSeries, Sma, SmaConfig};
/// use std::num::NonZero;
///
/// let series = PriceSeries::from_bars(
///     [10.0, 20.0, 30.0]
///         .into_iter()
///         .enumerate()
///         .map(|(i, p)| (i, Bar::new(p, p, p, p, 0.0))),
/// )
/// .unwrap();
///
/// let sma = Sma::new(SmaConfig::close(NonZero::new(3).unwrap()));
/// let values = sma.compute(&series);
///
/// assert!(values[0].is_nan());
/// assert!(values[1].is_nan());
/// assert_eq!(values[2], 20.0);
/// ```
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Computed output type. [`Series`] for simple indicators,
    /// a struct of named series implementing [`IntoLines`] for composite
    /// ones (e.g. MACD).
    type Output: Send + Sync + Debug;

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// The config this indicator was created with.
    fn config(&self) -> &Self::Config;

    /// Computes the indicator over the whole history.
    fn compute<K>(&self, series: &PriceSeries<K>) -> Self::Output;
}
