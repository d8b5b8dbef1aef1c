//! Validation of the Thunderstorm Power Index against its threshold table
//!
//! Covers the documented scenarios, every category boundary, the plain-sum
//! property and monotonicity in each individual factor.

use approx::assert_relative_eq;
use tpi_core::{calculate_index, tpi_ranges, FactorKind, StormPotential, WeatherFactors};

const WEAK: &str = "Weak to Moderate Thunderstorm Potential";
const STRONG: &str = "Strong Storm Potential (could be locally severe)";
const SEVERE: &str = "Severe Storm Potential (large hail, damaging winds, maybe tornadoes)";
const EXTREME: &str = "Extreme Storm Potential (significant severe threat)";

#[test]
fn test_documented_scenarios() {
    let scenarios = [
        (WeatherFactors::uniform(3.0), 15.0, STRONG),
        (WeatherFactors::uniform(0.0), 0.0, WEAK),
        (WeatherFactors::uniform(5.0), 25.0, EXTREME),
        (WeatherFactors::uniform(2.0), 10.0, WEAK),
    ];

    for (factors, value, interpretation) in scenarios {
        let result = calculate_index(&factors);
        assert_eq!(result.value, value, "sum for {factors}");
        assert_eq!(result.interpretation(), interpretation, "label for {factors}");
    }
}

#[test]
fn test_boundaries_are_inclusive_on_the_low_side() {
    // Spread the total over two factors so the sum, not a single input, hits the bound
    let at = |value: f64| WeatherFactors::new(value - 1.0, 1.0, 0.0, 0.0, 0.0);

    assert_eq!(calculate_index(&at(10.0)).interpretation(), WEAK);
    assert_eq!(calculate_index(&at(11.0)).interpretation(), STRONG);
    assert_eq!(calculate_index(&at(15.0)).interpretation(), STRONG);
    assert_eq!(calculate_index(&at(16.0)).interpretation(), SEVERE);
    assert_eq!(calculate_index(&at(20.0)).interpretation(), SEVERE);
    assert_eq!(calculate_index(&at(21.0)).interpretation(), EXTREME);
}

#[test]
fn test_threshold_constants_match_labels() {
    assert_eq!(
        StormPotential::from_value(tpi_ranges::WEAK_TO_MODERATE_MAX),
        StormPotential::WeakToModerate
    );
    assert_eq!(StormPotential::from_value(tpi_ranges::STRONG_MAX), StormPotential::Strong);
    assert_eq!(StormPotential::from_value(tpi_ranges::SEVERE_MAX), StormPotential::Severe);
}

#[test]
fn test_value_is_plain_sum_of_integer_ratings() {
    for a in 0..=5 {
        for b in 0..=5 {
            for c in 0..=5 {
                let factors = WeatherFactors::new(
                    f64::from(a),
                    f64::from(b),
                    f64::from(c),
                    f64::from(a + 1),
                    f64::from(b + c),
                );
                let expected = f64::from(a + b + c + (a + 1) + (b + c));
                assert_eq!(calculate_index(&factors).value, expected);
            }
        }
    }
}

#[test]
fn test_fractional_and_negative_inputs_are_accepted() {
    let factors = WeatherFactors::new(0.1, 0.2, 0.3, 0.4, 0.5);
    assert_relative_eq!(calculate_index(&factors).value, 1.5, epsilon = 1e-12);

    let negative = WeatherFactors::new(-10.0, 3.0, 3.0, 3.0, 3.0);
    let result = calculate_index(&negative);
    assert_eq!(result.value, 2.0);
    assert_eq!(result.interpretation(), WEAK);

    let huge = WeatherFactors::uniform(1.0e6);
    assert_eq!(calculate_index(&huge).interpretation(), EXTREME);
}

#[test]
fn test_raising_any_factor_never_weakens_the_result() {
    let base = WeatherFactors::uniform(1.0);

    for kind in FactorKind::ALL {
        let mut previous = calculate_index(&base);
        for step in 1..=25 {
            let factors = base.with(kind, 1.0 + f64::from(step));
            let current = calculate_index(&factors);

            assert!(
                current.value >= previous.value,
                "{kind}: value dropped from {} to {}",
                previous.value,
                current.value
            );
            assert!(
                current.potential >= previous.potential,
                "{kind}: category dropped from {:?} to {:?}",
                previous.potential,
                current.potential
            );
            previous = current;
        }
        assert_eq!(previous.potential, StormPotential::Extreme);
    }
}

#[test]
fn test_repeated_calls_give_identical_results() {
    let factors = WeatherFactors::new(4.0, 2.0, 5.0, 1.0, 3.0);
    let first = calculate_index(&factors);
    let second = calculate_index(&factors);
    assert_eq!(first, second);
}
