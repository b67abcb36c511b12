//! Round state: the envelope one monitoring round produces, shared
//! read-only with the API.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{Condition, MonitoringResult};

/// Score at or above which a region counts as high-risk
pub const HIGH_RISK_SCORE: u8 = 5;

/// System-wide severity picture, replaced wholesale each round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStatus {
    /// Regions whose latest score reached [`HIGH_RISK_SCORE`]
    pub high_risk_regions: BTreeSet<String>,
    /// Distinct non-NORMAL conditions seen this round
    pub active_alerts: BTreeSet<Condition>,
}

impl GlobalStatus {
    /// Pure reduction over one round's results. Never consults any
    /// previous round.
    pub fn aggregate(results: &[MonitoringResult]) -> Self {
        let mut status = Self::default();
        for result in results {
            if result.score >= HIGH_RISK_SCORE {
                status.high_risk_regions.insert(result.region.clone());
            }
            if result.condition.is_alert() {
                status.active_alerts.insert(result.condition);
            }
        }
        status
    }

    pub fn is_calm(&self) -> bool {
        self.high_risk_regions.is_empty() && self.active_alerts.is_empty()
    }
}

/// One agent's cycle failure, recorded instead of its result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentFailure {
    pub agent_id: String,
    pub region: String,
    pub reason: String,
}

/// Everything one monitoring round produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundReport {
    pub round_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub results: Vec<MonitoringResult>,
    pub failures: Vec<AgentFailure>,
    pub global: GlobalStatus,
}

impl RoundReport {
    pub fn new(results: Vec<MonitoringResult>, failures: Vec<AgentFailure>) -> Self {
        let global = GlobalStatus::aggregate(&results);
        Self {
            round_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            results,
            failures,
            global,
        }
    }
}

/// Latest completed round, shared between the watch loop and the API
pub type SharedRound = Arc<RwLock<Option<RoundReport>>>;

pub fn shared_round() -> SharedRound {
    Arc::new(RwLock::new(None))
}
