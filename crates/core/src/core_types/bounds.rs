//! Rectangular map selection used as a lookup key for factor data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic rectangle drawn by the user, in decimal degrees.
///
/// The index computation never reads these coordinates. They are handed to a
/// [`WeatherDataSource`](crate::provider::WeatherDataSource) which decides
/// what to do with them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl SelectionBounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Build from `(lat, lng)` south-west and north-east corners, the shape
    /// drawing tools hand back.
    pub fn from_corners(south_west: (f64, f64), north_east: (f64, f64)) -> Self {
        Self::new(south_west.0, south_west.1, north_east.0, north_east.1)
    }
}

impl fmt::Display for SelectionBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] - [{}, {}]",
            self.south, self.west, self.north, self.east
        )
    }
}
