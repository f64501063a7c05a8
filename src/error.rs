use thiserror::Error;

/// Errors raised by the engine.
///
/// Only shape and parameter problems are errors. Degenerate numeric input
/// (flat prices, zero range, zero volume) always resolves to a documented
/// default value instead.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("insufficient data: {required} bar(s) required, {available} available")]
    InsufficientData { required: usize, available: usize },

    #[error("invalid parameter for {indicator}: {reason}")]
    InvalidParameter {
        indicator: &'static str,
        reason: String,
    },

    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("malformed indicator selection `{input}`: {reason}")]
    MalformedSelection { input: String, reason: String },

    #[error("settings error: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IndicatorError {
    pub(crate) fn invalid(indicator: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            indicator,
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedSelection {
            input: input.to_owned(),
            reason: reason.into(),
        }
    }

    /// `true` when the caller supplied bad input (selection syntax or
    /// parameters) rather than the engine failing to load its settings.
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, Self::Settings(_) | Self::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, IndicatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message() {
        let err = IndicatorError::InsufficientData {
            required: 1,
            available: 0,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: 1 bar(s) required, 0 available"
        );
    }

    #[test]
    fn invalid_parameter_message() {
        let err = IndicatorError::invalid("macd", "fast period must be below slow period");
        assert_eq!(
            err.to_string(),
            "invalid parameter for macd: fast period must be below slow period"
        );
        assert!(err.is_caller_error());
    }

    #[test]
    fn io_is_not_a_caller_error() {
        let err = IndicatorError::from(std::io::Error::other("boom"));
        assert!(!err.is_caller_error());
    }
}
