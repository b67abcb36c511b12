use serde::{Deserialize, Serialize};

/// Classified weather-risk category for a region.
///
/// Variant order is severity order; the derived `Ord` follows it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
    Normal,
    Rainy,
    Stormy,
    FloodRisk,
    Hurricane,
}

impl Condition {
    /// Fixed severity score for this condition. Score is implied solely
    /// by condition, never stored independently.
    pub fn risk_score(&self) -> u8 {
        match self {
            Condition::Normal => 0,
            Condition::Rainy => 2,
            Condition::Stormy => 5,
            Condition::FloodRisk => 7,
            Condition::Hurricane => 10,
        }
    }

    /// Map a model class index (0..=4, severity order) to a condition
    pub fn from_class_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Condition::Normal),
            1 => Some(Condition::Rainy),
            2 => Some(Condition::Stormy),
            3 => Some(Condition::FloodRisk),
            4 => Some(Condition::Hurricane),
            _ => None,
        }
    }

    /// Conditions severe enough to trigger a peer assistance request
    pub fn requires_assistance(&self) -> bool {
        matches!(self, Condition::Hurricane | Condition::FloodRisk)
    }

    /// Anything other than NORMAL counts as an active alert
    pub fn is_alert(&self) -> bool {
        !matches!(self, Condition::Normal)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Normal => "NORMAL",
            Condition::Rainy => "RAINY",
            Condition::Stormy => "STORMY",
            Condition::FloodRisk => "FLOOD_RISK",
            Condition::Hurricane => "HURRICANE",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
