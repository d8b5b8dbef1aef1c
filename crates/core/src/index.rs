//! Thunderstorm Power Index computation and classification.
//!
//! The index is the unweighted sum of the five severity factors. The sum is
//! placed into one of four storm potential categories by comparing against
//! fixed inclusive upper bounds, lowest first.
//!
//! ```text
//! value <= 10         Weak to Moderate
//! 10 < value <= 15    Strong
//! 15 < value <= 20    Severe
//! value > 20          Extreme
//! ```

use crate::core_types::WeatherFactors;
use serde::{Deserialize, Serialize};
use std::fmt;

/// TPI threshold constants.
///
/// Each constant is the **inclusive upper bound** of its category; a value
/// belongs to the first category whose bound it does not exceed. Anything
/// above [`SEVERE_MAX`] is Extreme.
pub mod tpi_ranges {
    /// Upper bound of "Weak to Moderate" `(-∞, 10.0]`
    pub const WEAK_TO_MODERATE_MAX: f64 = 10.0;

    /// Upper bound of "Strong" `(10.0, 15.0]`
    pub const STRONG_MAX: f64 = 15.0;

    /// Upper bound of "Severe" `(15.0, 20.0]`
    pub const SEVERE_MAX: f64 = 20.0;
}

/// Qualitative storm potential, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StormPotential {
    WeakToModerate,
    Strong,
    Severe,
    Extreme,
}

impl StormPotential {
    /// All categories, weakest first.
    pub const ALL: [StormPotential; 4] = [
        StormPotential::WeakToModerate,
        StormPotential::Strong,
        StormPotential::Severe,
        StormPotential::Extreme,
    ];

    /// Classify an index value.
    ///
    /// NaN fails every bound comparison and lands in `Extreme`.
    pub fn from_value(value: f64) -> Self {
        match value {
            v if v <= tpi_ranges::WEAK_TO_MODERATE_MAX => StormPotential::WeakToModerate,
            v if v <= tpi_ranges::STRONG_MAX => StormPotential::Strong,
            v if v <= tpi_ranges::SEVERE_MAX => StormPotential::Severe,
            _ => StormPotential::Extreme,
        }
    }

    /// Fixed interpretation text for this category.
    pub fn interpretation(self) -> &'static str {
        match self {
            StormPotential::WeakToModerate => "Weak to Moderate Thunderstorm Potential",
            StormPotential::Strong => "Strong Storm Potential (could be locally severe)",
            StormPotential::Severe => {
                "Severe Storm Potential (large hail, damaging winds, maybe tornadoes)"
            }
            StormPotential::Extreme => "Extreme Storm Potential (significant severe threat)",
        }
    }
}

impl fmt::Display for StormPotential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.interpretation())
    }
}

/// Outcome of one index calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexResult {
    /// Sum of the five factors
    pub value: f64,
    pub potential: StormPotential,
}

impl IndexResult {
    pub fn interpretation(&self) -> &'static str {
        self.potential.interpretation()
    }
}

/// Compute the Thunderstorm Power Index.
///
/// Total over all numeric input; no validation, clamping or weighting.
///
/// # Example
/// ```
/// use tpi_core::{calculate_index, StormPotential, WeatherFactors};
///
/// let result = calculate_index(&WeatherFactors::uniform(3.0));
/// assert_eq!(result.value, 15.0);
/// assert_eq!(result.potential, StormPotential::Strong);
/// assert_eq!(
///     result.interpretation(),
///     "Strong Storm Potential (could be locally severe)"
/// );
/// ```
#[must_use]
pub fn calculate_index(factors: &WeatherFactors) -> IndexResult {
    let value = factors.total();
    IndexResult {
        value,
        potential: StormPotential::from_value(value),
    }
}

impl WeatherFactors {
    /// Shorthand for [`calculate_index`].
    #[must_use]
    pub fn thunderstorm_power_index(&self) -> IndexResult {
        calculate_index(self)
    }
}
