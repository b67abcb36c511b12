//! Risk classification: snapshot in, assessment out.
//!
//! Two variants behind one trait: the deterministic rule ladder (always
//! available) and a learned model loaded from a JSON file. Selection
//! happens once at construction; the learned variant silently degrades to
//! the rule ladder when the model is missing or misbehaves, and the
//! substitution is visible only through `RiskAssessment::model_used`.

pub mod model;
pub mod rules;

pub use model::NeuralClassifier;
pub use rules::RuleClassifier;

use tracing::{info, warn};

use crate::config::ClassifierConfig;
use crate::domain::{RiskAssessment, WeatherSnapshot};
use crate::error::{Result, StormError};

/// Classification capability. Implementations clamp invalid snapshot
/// fields before applying any rule and never fail.
pub trait RiskClassifier: Send + Sync {
    fn assess(&self, snapshot: &WeatherSnapshot) -> RiskAssessment;
}

/// Load the configured model file as a learned classifier.
///
/// Any load or shape problem comes back as
/// [`StormError::ModelUnavailable`] naming the offending path.
pub fn load_model(config: &ClassifierConfig) -> Result<NeuralClassifier> {
    NeuralClassifier::from_file(&config.model_path)
        .map_err(|e| StormError::ModelUnavailable(format!("{}: {e}", config.model_path)))
}

/// Build the classifier selected by configuration.
///
/// An unavailable model is not fatal here: the rule-based variant takes
/// over and a warning records the substitution.
pub fn from_config(config: &ClassifierConfig) -> Box<dyn RiskClassifier> {
    if !config.use_model {
        return Box::new(RuleClassifier::new());
    }

    match load_model(config) {
        Ok(classifier) => {
            info!(model_path = %config.model_path, "Loaded learned risk model");
            Box::new(classifier)
        }
        Err(e) => {
            warn!(error = %e, "Using rule-based classifier");
            Box::new(RuleClassifier::new())
        }
    }
}
