//! Core types and utilities

pub mod bounds;
pub mod factors;

pub use bounds::SelectionBounds;
pub use factors::{FactorKind, WeatherFactors};
