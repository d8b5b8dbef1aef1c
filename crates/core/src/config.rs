//! Calculator configuration: plugin metadata and mock data values.
//!
//! Every field has a default, so an empty JSON object is a valid config.
//!
//! ```
//! use tpi_core::CalculatorConfig;
//!
//! let config = CalculatorConfig::from_json_str(r#"{ "show_factors": true }"#).unwrap();
//! assert!(config.show_factors);
//! assert_eq!(config.plugin.author, "CropCrusaders");
//! ```

use crate::core_types::WeatherFactors;
use crate::error::{Result, TpiError};
use crate::provider::MockWeatherSource;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Metadata the host map platform registers the plugin under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginOptions {
    /// Unique plugin key
    pub key: String,
    /// Display name in the plugin list
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            key: "plugin-key".to_string(),
            name: "Thunderstorm Power Index Calculator".to_string(),
            version: "1.0.0".to_string(),
            author: "CropCrusaders".to_string(),
            description: "Calculate and rate thunderstorms using CAPE, Shear, Lightning, \
                          Updraft, and Precipitation factors."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub plugin: PluginOptions,

    /// Factors returned by the mock data source
    pub mock_factors: WeatherFactors,

    /// Append the raw factor summary to a successful result
    pub show_factors: bool,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            plugin: PluginOptions::default(),
            mock_factors: WeatherFactors::mock(),
            show_factors: false,
        }
    }
}

impl CalculatorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TpiError::Config(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading calculator config");
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TpiError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| TpiError::Config(e.to_string()))
    }

    /// Mock source serving `mock_factors`.
    pub fn mock_source(&self) -> MockWeatherSource {
        MockWeatherSource::new(self.mock_factors)
    }
}
