use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{Result, output::DEFAULT_PRECISION};

/// Engine-level settings, usually read from a TOML file.
///
/// Every field is optional in the file:
///
/// ```toml
/// precision = 4
/// parallel = false
/// indicators = ["rsi:14", "macd:12,26,9", "bollinger:20,2"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Decimal places kept in packaged output.
    pub precision: u32,
    /// Evaluate independent selections on the rayon thread pool.
    pub parallel: bool,
    /// Selections evaluated by [`Engine::evaluate_defaults`](crate::Engine::evaluate_defaults).
    pub indicators: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            parallel: true,
            indicators: default_indicators(),
        }
    }
}

fn default_indicators() -> Vec<String> {
    ["rsi:14", "macd:12,26,9", "bollinger:20,2"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Settings {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// [`IndicatorError::Settings`](crate::IndicatorError::Settings) when the
    /// text is not valid TOML or a field has the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// [`IndicatorError::Io`](crate::IndicatorError::Io) when the file cannot
    /// be read, [`IndicatorError::Settings`](crate::IndicatorError::Settings)
    /// when it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&text)?;

        info!(
            path = %path.display(),
            precision = settings.precision,
            parallel = settings.parallel,
            indicators = settings.indicators.len(),
            "loaded engine settings"
        );

        Ok(settings)
    }
}
