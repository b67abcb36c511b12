use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Condition;

/// Which classifier variant produced an assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTag {
    RuleBased,
    MlModel,
}

impl ModelTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTag::RuleBased => "rule_based",
            ModelTag::MlModel => "ml_model",
        }
    }
}

impl std::fmt::Display for ModelTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of classifying one snapshot, immutable once produced.
///
/// `score` is always derived from `condition` through the fixed severity
/// table; construct through [`RiskAssessment::new`] to keep it that way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub region: String,
    pub condition: Condition,
    pub score: u8,
    pub confidence: f64,
    pub model_used: ModelTag,
    pub timestamp: DateTime<Utc>,
}

impl RiskAssessment {
    pub fn new(
        region: impl Into<String>,
        condition: Condition,
        confidence: f64,
        model_used: ModelTag,
    ) -> Self {
        Self {
            region: region.into(),
            condition,
            score: condition.risk_score(),
            confidence,
            model_used,
            timestamp: Utc::now(),
        }
    }
}

/// What one agent reports back to the coordinator after a full cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringResult {
    pub agent_id: String,
    pub region: String,
    pub condition: Condition,
    pub score: u8,
    pub confidence: f64,
    pub action_count: usize,
    pub timestamp: DateTime<Utc>,
}

impl MonitoringResult {
    pub fn from_assessment(agent_id: impl Into<String>, assessment: &RiskAssessment, action_count: usize) -> Self {
        Self {
            agent_id: agent_id.into(),
            region: assessment.region.clone(),
            condition: assessment.condition,
            score: assessment.score,
            confidence: assessment.confidence,
            action_count,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_follows_condition() {
        let a = RiskAssessment::new("coastal_city", Condition::FloodRisk, 0.9, ModelTag::RuleBased);
        assert_eq!(a.score, 7);

        let b = RiskAssessment::new("coastal_city", Condition::Hurricane, 0.95, ModelTag::MlModel);
        assert_eq!(b.score, 10);
    }

    #[test]
    fn test_model_tag_wire_format() {
        assert_eq!(serde_json::to_string(&ModelTag::RuleBased).unwrap(), "\"rule_based\"");
        assert_eq!(serde_json::to_string(&ModelTag::MlModel).unwrap(), "\"ml_model\"");
    }

    #[test]
    fn test_result_carries_assessment_fields() {
        let assessment = RiskAssessment::new("inland_valley", Condition::Rainy, 0.8, ModelTag::RuleBased);
        let result = MonitoringResult::from_assessment("AGENT_3_INLAND_VALLEY", &assessment, 4);
        assert_eq!(result.region, "inland_valley");
        assert_eq!(result.condition, Condition::Rainy);
        assert_eq!(result.score, 2);
        assert_eq!(result.action_count, 4);
    }
}
