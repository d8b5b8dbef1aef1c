//! Pluggable source of severity factors for a selected area.
//!
//! The calculator never reaches for weather data itself; it asks a
//! [`WeatherDataSource`] for the factors of the current selection. Swapping
//! the mock for a live source does not touch the computation or the session.

use crate::core_types::{SelectionBounds, WeatherFactors};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Provides the five severity factors for a map selection.
///
/// Implementations may fail (network, timeout, no coverage); they report
/// that as [`TpiError::DataUnavailable`](crate::error::TpiError::DataUnavailable).
/// Failures are never retried by the caller.
pub trait WeatherDataSource {
    fn fetch_factors(&self, bounds: &SelectionBounds) -> Result<WeatherFactors>;
}

impl<T: WeatherDataSource + ?Sized> WeatherDataSource for &T {
    fn fetch_factors(&self, bounds: &SelectionBounds) -> Result<WeatherFactors> {
        (**self).fetch_factors(bounds)
    }
}

impl<T: WeatherDataSource + ?Sized> WeatherDataSource for Box<T> {
    fn fetch_factors(&self, bounds: &SelectionBounds) -> Result<WeatherFactors> {
        (**self).fetch_factors(bounds)
    }
}

/// Returns the same factors for every selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MockWeatherSource {
    factors: WeatherFactors,
}

impl MockWeatherSource {
    pub fn new(factors: WeatherFactors) -> Self {
        Self { factors }
    }

    pub fn factors(&self) -> &WeatherFactors {
        &self.factors
    }
}

impl Default for MockWeatherSource {
    fn default() -> Self {
        Self::new(WeatherFactors::mock())
    }
}

impl WeatherDataSource for MockWeatherSource {
    fn fetch_factors(&self, bounds: &SelectionBounds) -> Result<WeatherFactors> {
        debug!(%bounds, "serving mock weather factors");
        Ok(self.factors)
    }
}
