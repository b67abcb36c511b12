//! Learned-model classification with silent rule fallback.
//!
//! Wraps a [`DenseNetwork`] trained offline. The feature vector is
//! [temperature, humidity, wind_speed, rainfall]; the output head must
//! carry one logit per condition class. Any inference problem downgrades
//! that single assessment to the rule ladder.

use tracing::warn;

use crate::domain::{Condition, ModelTag, RiskAssessment, WeatherSnapshot};
use crate::error::{Result, StormError};
use crate::ml::DenseNetwork;

use super::rules::RuleClassifier;
use super::RiskClassifier;

/// One logit per Condition variant
const CONDITION_CLASSES: usize = 5;
/// [temperature, humidity, wind_speed, rainfall]
const FEATURE_DIM: usize = 4;

#[derive(Debug)]
pub struct NeuralClassifier {
    network: DenseNetwork,
    fallback: RuleClassifier,
}

impl NeuralClassifier {
    /// Load and shape-check a model file.
    ///
    /// The network must accept the four-feature input vector and emit
    /// exactly one logit per condition class.
    pub fn from_file(path: &str) -> Result<Self> {
        let network = DenseNetwork::from_file(path)?;
        Self::new(network)
    }

    pub fn new(network: DenseNetwork) -> Result<Self> {
        if network.input_dim != FEATURE_DIM {
            return Err(StormError::InvalidModelFile(format!(
                "expected input_dim {FEATURE_DIM}, model has {}",
                network.input_dim
            )));
        }
        if network.output_dim() != CONDITION_CLASSES {
            return Err(StormError::InvalidModelFile(format!(
                "expected output_dim {CONDITION_CLASSES}, model has {}",
                network.output_dim()
            )));
        }
        Ok(Self {
            network,
            fallback: RuleClassifier::new(),
        })
    }

    fn infer(&self, snapshot: &WeatherSnapshot) -> Result<RiskAssessment> {
        let features = [
            snapshot.temperature,
            snapshot.humidity,
            snapshot.wind_speed,
            snapshot.rainfall,
        ];
        let (class_index, posterior) = self.network.predict_class(&features)?;
        let condition = Condition::from_class_index(class_index).ok_or_else(|| {
            StormError::Internal(format!("model produced unknown class index {class_index}"))
        })?;

        Ok(RiskAssessment::new(
            snapshot.region.clone(),
            condition,
            posterior,
            ModelTag::MlModel,
        ))
    }
}

impl RiskClassifier for NeuralClassifier {
    fn assess(&self, snapshot: &WeatherSnapshot) -> RiskAssessment {
        let clean = snapshot.sanitized();
        match self.infer(&clean) {
            Ok(assessment) => assessment,
            Err(e) => {
                warn!(
                    region = %clean.region,
                    error = %e,
                    "Model inference failed, falling back to rule-based assessment"
                );
                self.fallback.assess(&clean)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::{Activation, DenseLayer};

    /// Network whose logits come straight from one weighted layer
    fn network_with(weights: Vec<Vec<f64>>) -> DenseNetwork {
        DenseNetwork {
            input_dim: FEATURE_DIM,
            input_mean: None,
            input_std: None,
            layers: vec![DenseLayer {
                weights,
                bias: vec![0.0; CONDITION_CLASSES],
                activation: Activation::Linear,
            }],
            metadata: serde_json::json!({}),
        }
    }

    /// Weights that put all mass on the wind feature for the hurricane
    /// logit and nothing anywhere else
    fn wind_dominant_network() -> DenseNetwork {
        let mut weights = vec![vec![0.0; FEATURE_DIM]; CONDITION_CLASSES];
        weights[4][2] = 1.0;
        weights[0][2] = -1.0;
        network_with(weights)
    }

    #[test]
    fn test_model_prediction_is_tagged_ml() {
        let classifier = NeuralClassifier::new(wind_dominant_network()).unwrap();
        let snapshot = WeatherSnapshot::new("coastal_city", 28.0, 90.0, 160.0, 120.0, 1000.0, "simulated");

        let assessment = classifier.assess(&snapshot);
        assert_eq!(assessment.model_used, ModelTag::MlModel);
        assert_eq!(assessment.condition, Condition::Hurricane);
        assert_eq!(assessment.score, 10);
        assert!(assessment.confidence > 0.5);
    }

    #[test]
    fn test_rejects_wrong_output_head() {
        let bad = DenseNetwork {
            input_dim: FEATURE_DIM,
            input_mean: None,
            input_std: None,
            layers: vec![DenseLayer {
                weights: vec![vec![0.0; FEATURE_DIM]; 3],
                bias: vec![0.0; 3],
                activation: Activation::Linear,
            }],
            metadata: serde_json::json!({}),
        };
        assert!(NeuralClassifier::new(bad).is_err());
    }

    #[test]
    fn test_rejects_wrong_feature_dim() {
        let bad = DenseNetwork {
            input_dim: 6,
            input_mean: None,
            input_std: None,
            layers: vec![DenseLayer {
                weights: vec![vec![0.0; 6]; CONDITION_CLASSES],
                bias: vec![0.0; CONDITION_CLASSES],
                activation: Activation::Linear,
            }],
            metadata: serde_json::json!({}),
        };
        assert!(NeuralClassifier::new(bad).is_err());
    }

    #[test]
    fn test_score_table_holds_for_model_output() {
        let classifier = NeuralClassifier::new(wind_dominant_network()).unwrap();
        let snapshot = WeatherSnapshot::new("coastal_city", 28.0, 90.0, 200.0, 0.0, 1000.0, "simulated");

        let assessment = classifier.assess(&snapshot);
        assert_eq!(assessment.score, assessment.condition.risk_score());
    }

    #[test]
    fn test_sanitizes_before_inference() {
        let classifier = NeuralClassifier::new(wind_dominant_network()).unwrap();
        let snapshot = WeatherSnapshot::new("coastal_city", 28.0, 90.0, f64::NAN, 0.0, 1000.0, "simulated");

        // NaN wind clamps to 0 before the forward pass, so inference
        // succeeds and stays on the model path.
        let assessment = classifier.assess(&snapshot);
        assert_eq!(assessment.model_used, ModelTag::MlModel);
        assert_eq!(assessment.condition, Condition::Normal);
    }
}
