//! Deterministic rule-based classification.
//!
//! Fixed priority ladder, first match wins. This variant backs every
//! deployment: the learned model is optional, the ladder is not.

use crate::domain::{Condition, ModelTag, RiskAssessment, WeatherSnapshot};

use super::RiskClassifier;

/// Rule ladder thresholds (km/h, %, mm)
const HURRICANE_WIND: f64 = 150.0;
const FLOOD_RAINFALL: f64 = 75.0;
const STORM_WIND: f64 = 60.0;
const STORM_HUMIDITY: f64 = 80.0;
const RAIN_RAINFALL: f64 = 20.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleClassifier;

impl RuleClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Walk the ladder top-down on an already-sanitized snapshot
    fn classify(snapshot: &WeatherSnapshot) -> (Condition, f64) {
        if snapshot.wind_speed > HURRICANE_WIND {
            (Condition::Hurricane, 0.95)
        } else if snapshot.rainfall > FLOOD_RAINFALL {
            (Condition::FloodRisk, 0.90)
        } else if snapshot.wind_speed > STORM_WIND && snapshot.humidity > STORM_HUMIDITY {
            (Condition::Stormy, 0.85)
        } else if snapshot.rainfall > RAIN_RAINFALL {
            (Condition::Rainy, 0.80)
        } else {
            (Condition::Normal, 0.90)
        }
    }
}

impl RiskClassifier for RuleClassifier {
    fn assess(&self, snapshot: &WeatherSnapshot) -> RiskAssessment {
        let clean = snapshot.sanitized();
        let (condition, confidence) = Self::classify(&clean);
        RiskAssessment::new(clean.region, condition, confidence, ModelTag::RuleBased)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assess(humidity: f64, wind: f64, rain: f64) -> RiskAssessment {
        let snapshot = WeatherSnapshot::new("test_region", 20.0, humidity, wind, rain, 1010.0, "simulated");
        RuleClassifier::new().assess(&snapshot)
    }

    #[test]
    fn test_extreme_wind_is_hurricane() {
        let a = assess(30.0, 160.0, 5.0);
        assert_eq!(a.condition, Condition::Hurricane);
        assert_eq!(a.score, 10);
        assert_eq!(a.confidence, 0.95);
    }

    #[test]
    fn test_heavy_rain_is_flood_risk() {
        let a = assess(60.0, 10.0, 100.0);
        assert_eq!(a.condition, Condition::FloodRisk);
        assert_eq!(a.score, 7);
        assert_eq!(a.confidence, 0.90);
    }

    #[test]
    fn test_wind_and_humidity_beat_rainfall_rule() {
        // Rainfall 50 alone would be RAINY, but the storm rule sits higher
        // in the ladder.
        let a = assess(85.0, 65.0, 50.0);
        assert_eq!(a.condition, Condition::Stormy);
        assert_eq!(a.score, 5);
        assert_eq!(a.confidence, 0.85);
    }

    #[test]
    fn test_moderate_rain_is_rainy() {
        let a = assess(70.0, 25.0, 30.0);
        assert_eq!(a.condition, Condition::Rainy);
        assert_eq!(a.score, 2);
        assert_eq!(a.confidence, 0.80);
    }

    #[test]
    fn test_calm_weather_is_normal() {
        let a = assess(60.0, 15.0, 5.0);
        assert_eq!(a.condition, Condition::Normal);
        assert_eq!(a.score, 0);
        assert_eq!(a.confidence, 0.90);
    }

    #[test]
    fn test_hurricane_short_circuits_later_rules() {
        // Rainfall above the flood threshold too; wind rule still wins.
        let a = assess(90.0, 200.0, 120.0);
        assert_eq!(a.condition, Condition::Hurricane);
        assert_eq!(a.score, 10);
    }

    #[test]
    fn test_invalid_fields_are_clamped_not_fatal() {
        // NaN wind collapses to 0, humidity above range clamps to 100.
        let a = assess(150.0, f64::NAN, 5.0);
        assert_eq!(a.condition, Condition::Normal);

        // Negative rainfall clamps to 0 rather than matching the rain rule.
        let b = assess(50.0, 10.0, -40.0);
        assert_eq!(b.condition, Condition::Normal);
    }

    #[test]
    fn test_deterministic_for_same_snapshot() {
        let snapshot = WeatherSnapshot::new("test_region", 22.0, 70.0, 25.0, 30.0, 1005.0, "simulated");
        let classifier = RuleClassifier::new();

        let first = classifier.assess(&snapshot);
        let second = classifier.assess(&snapshot);
        assert_eq!(first.condition, second.condition);
        assert_eq!(first.score, second.score);
        assert_eq!(first.confidence, second.confidence);
    }
}
