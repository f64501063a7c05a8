use std::{
    fmt::Display,
    hash::{Hash, Hasher},
};

use crate::{IndicatorError, Result};

/// Positive, finite `f64` parameter: Bollinger standard-deviation width,
/// SuperTrend ATR multiplier, PSAR acceleration.
///
/// Implements `Eq` and `Hash` via bit-level comparison, which is safe because
/// NaN is rejected at construction.
#[derive(Clone, Copy, Debug, PartialOrd)]
pub struct Multiplier(f64);

impl Multiplier {
    /// Creates a new multiplier.
    ///
    /// # Errors
    ///
    /// [`IndicatorError::InvalidParameter`] if `value` is zero, negative,
    /// infinite, or NaN. `indicator` names the indicator in the error.
    pub fn new(indicator: &'static str, value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(IndicatorError::invalid(
                indicator,
                format!("multiplier must be finite, got {value}"),
            ));
        }
        if value <= 0.0 {
            return Err(IndicatorError::invalid(
                indicator,
                format!("multiplier must be positive, got {value}"),
            ));
        }
        Ok(Self(value))
    }

    /// Constant constructor for compile-time defaults. Callers guarantee
    /// the value is positive and finite.
    pub(crate) const fn from_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Multiplier {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Multiplier {}

impl Hash for Multiplier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Display for Multiplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
