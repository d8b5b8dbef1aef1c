//! Severity factors feeding the Thunderstorm Power Index.
//!
//! Each factor is an opaque severity rating. Meaningful inputs are small
//! non-negative integers (the mock source reports 3 for every factor), but
//! no range is enforced: any real number is accepted and summed as-is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five inputs to the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactorKind {
    /// Convective Available Potential Energy rating
    Cape,
    /// Vertical wind shear rating
    Shear,
    /// Lightning activity rating
    Lightning,
    /// Updraft strength rating
    Updraft,
    /// Precipitation rating
    Precip,
}

impl FactorKind {
    /// All factors in display order.
    pub const ALL: [FactorKind; 5] = [
        FactorKind::Cape,
        FactorKind::Shear,
        FactorKind::Lightning,
        FactorKind::Updraft,
        FactorKind::Precip,
    ];

    /// Short label used when the raw factors are shown next to a result.
    pub fn label(self) -> &'static str {
        match self {
            FactorKind::Cape => "CAPE",
            FactorKind::Shear => "Shear",
            FactorKind::Lightning => "Lightning",
            FactorKind::Updraft => "Updraft",
            FactorKind::Precip => "Precip",
        }
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The five severity ratings for a selected area.
///
/// # Example
/// ```
/// use tpi_core::{FactorKind, WeatherFactors};
///
/// let factors = WeatherFactors::uniform(3.0).with(FactorKind::Cape, 5.0);
/// assert_eq!(factors.get(FactorKind::Cape), 5.0);
/// assert_eq!(factors.total(), 17.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherFactors {
    pub cape: f64,
    pub shear: f64,
    pub lightning: f64,
    pub updraft: f64,
    pub precip: f64,
}

impl WeatherFactors {
    /// Rating reported for every factor by the mock data source.
    pub const MOCK_RATING: f64 = 3.0;

    pub fn new(cape: f64, shear: f64, lightning: f64, updraft: f64, precip: f64) -> Self {
        Self {
            cape,
            shear,
            lightning,
            updraft,
            precip,
        }
    }

    /// Same rating for all five factors.
    pub fn uniform(rating: f64) -> Self {
        Self::new(rating, rating, rating, rating, rating)
    }

    /// Constant factors served by the mock source.
    pub fn mock() -> Self {
        Self::uniform(Self::MOCK_RATING)
    }

    pub fn get(&self, kind: FactorKind) -> f64 {
        match kind {
            FactorKind::Cape => self.cape,
            FactorKind::Shear => self.shear,
            FactorKind::Lightning => self.lightning,
            FactorKind::Updraft => self.updraft,
            FactorKind::Precip => self.precip,
        }
    }

    /// Copy with a single factor replaced.
    pub fn with(mut self, kind: FactorKind, rating: f64) -> Self {
        let slot = match kind {
            FactorKind::Cape => &mut self.cape,
            FactorKind::Shear => &mut self.shear,
            FactorKind::Lightning => &mut self.lightning,
            FactorKind::Updraft => &mut self.updraft,
            FactorKind::Precip => &mut self.precip,
        };
        *slot = rating;
        self
    }

    /// Plain unweighted sum of the five ratings.
    pub fn total(&self) -> f64 {
        self.cape + self.shear + self.lightning + self.updraft + self.precip
    }

    /// Iterate `(kind, rating)` pairs in display order.
    pub fn ratings(&self) -> impl Iterator<Item = (FactorKind, f64)> + '_ {
        FactorKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

/// Renders `(CAPE: 3, Shear: 3, Lightning: 3, Updraft: 3, Precip: 3)`.
impl fmt::Display for WeatherFactors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, (kind, rating)) in self.ratings().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{kind}: {rating}")?;
        }
        f.write_str(")")
    }
}
