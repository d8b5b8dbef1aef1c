//! Thunderstorm Power Index Core Library
//!
//! Rates thunderstorm potential for a user-selected map area. Five severity
//! factors (CAPE, shear, lightning, updraft, precipitation) are summed into the
//! Thunderstorm Power Index (TPI) and the sum is mapped to one of four storm
//! potential categories.
//!
//! ## Layout
//!
//! - [`index`]: the pure computation and its threshold table
//! - [`provider`]: pluggable source of factors for a selection
//! - [`session`]: selection slot, action state and result text of the plugin
//! - [`config`]: plugin metadata and mock data values
//!
//! Map rendering, drawing tools and live weather data belong to the host
//! platform and are not part of this crate.

// Core types and utilities
pub mod core_types;

pub mod config;
pub mod error;
pub mod index;
pub mod provider;
pub mod session;

pub use config::{CalculatorConfig, PluginOptions};
pub use core_types::{FactorKind, SelectionBounds, WeatherFactors};
pub use error::TpiError;
pub use index::{calculate_index, tpi_ranges, IndexResult, StormPotential};
pub use provider::{MockWeatherSource, WeatherDataSource};
pub use session::{Calculation, CalculatorSession, Status};
