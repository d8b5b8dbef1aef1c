//! Error types for the TPI calculator.
//!
//! The index computation itself cannot fail. Errors only arise around it:
//! no area has been selected yet, the factor provider could not deliver
//! data, or a configuration file could not be read.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TpiError {
    /// Calculate was requested before an area was selected
    #[error("no area selected")]
    NoSelection,

    /// The weather data source failed (network, timeout, missing data)
    #[error("weather data unavailable: {0}")]
    DataUnavailable(String),

    /// Configuration could not be loaded or parsed
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TpiError {
    /// Both selection and provider failures mean no factors reached the
    /// calculator.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, TpiError::NoSelection | TpiError::DataUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, TpiError>;
