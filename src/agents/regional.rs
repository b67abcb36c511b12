//! RegionalAgent: one region's perceive/reason/act cycle.
//!
//! Composes the classifier and planner with the external provider,
//! store and assistance log. Storage problems degrade to warnings; the
//! cycle itself only surfaces an error when a collaborator breaks its
//! contract outright.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::assistance::{AssistanceLog, AssistanceRequest};
use crate::classifier::RiskClassifier;
use crate::domain::{MonitoringResult, RiskAssessment, WeatherSnapshot};
use crate::error::Result;
use crate::persistence::RecordStore;
use crate::planner;
use crate::provider::WeatherProvider;

use super::traits::{AgentRecord, MonitorAgent};

/// Default capability tags for a regional agent
const DEFAULT_CAPABILITIES: [&str; 3] =
    ["weather_monitoring", "risk_assessment", "action_planning"];

/// Assistance kind requested on severe conditions
const EMERGENCY_KIND: &str = "emergency_response";

/// Where the agent currently sits in its cycle. Every `monitor()` call
/// walks Idle → Perceiving → Reasoning → Acting → Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Perceiving,
    Reasoning,
    Acting,
}

pub struct RegionalAgent {
    id: String,
    region: String,
    capabilities: Vec<String>,
    phase: CyclePhase,
    last_assessment: Option<RiskAssessment>,
    peers: Vec<String>,
    provider: Arc<dyn WeatherProvider>,
    classifier: Arc<dyn RiskClassifier>,
    store: Arc<dyn RecordStore>,
    assistance: Arc<dyn AssistanceLog>,
}

impl RegionalAgent {
    pub fn new(
        id: impl Into<String>,
        region: impl Into<String>,
        provider: Arc<dyn WeatherProvider>,
        classifier: Arc<dyn RiskClassifier>,
        store: Arc<dyn RecordStore>,
        assistance: Arc<dyn AssistanceLog>,
    ) -> Self {
        Self {
            id: id.into(),
            region: region.into(),
            capabilities: DEFAULT_CAPABILITIES.iter().map(|c| c.to_string()).collect(),
            phase: CyclePhase::Idle,
            last_assessment: None,
            peers: Vec::new(),
            provider,
            classifier,
            store,
            assistance,
        }
    }

    pub fn with_capabilities(mut self, capabilities: Vec<String>) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn last_assessment(&self) -> Option<&RiskAssessment> {
        self.last_assessment.as_ref()
    }

    /// PERCEIVE: pull one snapshot for this region. The provider is
    /// fallback-capable, so this phase cannot fail.
    async fn perceive(&mut self) -> WeatherSnapshot {
        self.phase = CyclePhase::Perceiving;
        let snapshot = self.provider.obtain(&self.region).await;

        debug!(
            agent_id = self.id,
            region = self.region,
            temperature = snapshot.temperature,
            humidity = snapshot.humidity,
            wind_speed = snapshot.wind_speed,
            rainfall = snapshot.rainfall,
            source = snapshot.source,
            "Snapshot obtained"
        );

        if let Err(e) = self.store.save_snapshot(&snapshot).await {
            warn!(agent_id = self.id, error = %e, "Failed to store snapshot");
        }

        snapshot
    }

    /// REASON: classify the snapshot and replace the last assessment
    async fn reason(&mut self, snapshot: &WeatherSnapshot) -> RiskAssessment {
        self.phase = CyclePhase::Reasoning;
        let assessment = self.classifier.assess(snapshot);

        info!(
            agent_id = self.id,
            region = self.region,
            condition = %assessment.condition,
            score = assessment.score,
            confidence = assessment.confidence,
            model = %assessment.model_used,
            "Risk assessed"
        );

        if let Err(e) = self.store.save_assessment(&assessment).await {
            warn!(agent_id = self.id, error = %e, "Failed to store assessment");
        }

        self.last_assessment = Some(assessment.clone());
        assessment
    }

    /// ACT: derive the plan, log it, and on severe conditions notify
    /// peers through the assistance log
    async fn act(&mut self, assessment: &RiskAssessment, snapshot: &WeatherSnapshot) -> usize {
        self.phase = CyclePhase::Acting;
        let actions = planner::plan(assessment.condition, snapshot);

        debug!(
            agent_id = self.id,
            region = self.region,
            action_count = actions.len(),
            "Response plan ready"
        );

        if let Err(e) = self.store.save_actions(&self.id, &self.region, &actions).await {
            warn!(agent_id = self.id, error = %e, "Failed to store actions");
        }

        if assessment.condition.requires_assistance() {
            self.request_assistance(EMERGENCY_KIND).await;
        }

        actions.len()
    }

    /// Fire-and-forget help notification, one record per peer.
    ///
    /// Returns true iff at least one peer (other than this agent)
    /// received a record. No reply is awaited or processed.
    pub async fn request_assistance(&self, kind: &str) -> bool {
        let condition = match &self.last_assessment {
            Some(assessment) => assessment.condition,
            None => return false,
        };

        let mut notified = 0usize;
        for peer in &self.peers {
            if peer == &self.id {
                continue;
            }
            let message = AssistanceRequest::emergency_message(&self.region, condition, kind);
            self.assistance
                .record(AssistanceRequest::new(&self.id, peer, message, kind))
                .await;
            notified += 1;
        }

        if notified > 0 {
            info!(
                agent_id = self.id,
                region = self.region,
                peers = notified,
                kind = kind,
                "Assistance requested"
            );
        } else {
            debug!(agent_id = self.id, "No peers available for assistance request");
        }

        notified > 0
    }
}

#[async_trait]
impl MonitorAgent for RegionalAgent {
    fn id(&self) -> &str {
        &self.id
    }

    fn region(&self) -> &str {
        &self.region
    }

    fn set_peers(&mut self, peers: Vec<String>) {
        self.peers = peers;
    }

    fn describe(&self) -> AgentRecord {
        AgentRecord {
            id: self.id.clone(),
            region: self.region.clone(),
            capabilities: self.capabilities.clone(),
            last_assessment: self.last_assessment.clone(),
            peers: self.peers.clone(),
        }
    }

    async fn monitor(&mut self) -> Result<MonitoringResult> {
        debug!(agent_id = self.id, region = self.region, "Cycle starting");

        let snapshot = self.perceive().await;
        let assessment = self.reason(&snapshot).await;
        let action_count = self.act(&assessment, &snapshot).await;

        self.phase = CyclePhase::Idle;
        Ok(MonitoringResult::from_assessment(&self.id, &assessment, action_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::RuleClassifier;
    use crate::domain::Condition;
    use crate::persistence::MemoryStore;
    use crate::provider::SimulatedProvider;

    fn agent_for(region: &str, store: Arc<MemoryStore>) -> RegionalAgent {
        RegionalAgent::new(
            format!("AGENT_{}", region.to_uppercase()),
            region,
            Arc::new(SimulatedProvider::steady()),
            Arc::new(RuleClassifier::new()),
            store.clone(),
            store,
        )
    }

    #[tokio::test]
    async fn test_cycle_produces_result_and_returns_to_idle() {
        let store = Arc::new(MemoryStore::new());
        let mut agent = agent_for("coastal_city", store.clone());
        assert_eq!(agent.phase(), CyclePhase::Idle);

        let result = agent.monitor().await.unwrap();

        assert_eq!(agent.phase(), CyclePhase::Idle);
        assert_eq!(result.region, "coastal_city");
        assert_eq!(result.condition, Condition::Stormy);
        assert_eq!(result.score, 5);
        assert!(result.action_count >= 4);
        assert_eq!(agent.last_assessment().unwrap().condition, Condition::Stormy);
    }

    #[tokio::test]
    async fn test_cycle_writes_audit_records() {
        let store = Arc::new(MemoryStore::new());
        let mut agent = agent_for("inland_valley", store.clone());

        agent.monitor().await.unwrap();

        assert_eq!(store.assessments().await.len(), 1);
        assert_eq!(store.region_history("inland_valley", 1).await.unwrap().len(), 1);
        // NORMAL condition never asks for help.
        assert!(store.assistance().await.is_empty());
    }

    #[tokio::test]
    async fn test_severe_condition_notifies_each_peer_once() {
        let store = Arc::new(MemoryStore::new());
        // Mountain scenario rains far above the flood threshold.
        let mut agent = agent_for("mountain_region", store.clone());
        agent.set_peers(vec![
            "AGENT_MOUNTAIN_REGION".to_string(),
            "AGENT_COASTAL_CITY".to_string(),
            "AGENT_INLAND_VALLEY".to_string(),
        ]);

        let result = agent.monitor().await.unwrap();
        assert_eq!(result.condition, Condition::FloodRisk);

        let requests = store.assistance().await;
        assert_eq!(requests.len(), 2, "self must be excluded");
        assert!(requests.iter().all(|r| r.from_agent == "AGENT_MOUNTAIN_REGION"));
        assert!(requests.iter().all(|r| r.to_agent != "AGENT_MOUNTAIN_REGION"));
        assert!(requests.iter().all(|r| r.kind == "emergency_response"));
        assert!(requests[0].message.contains("FLOOD_RISK"));
    }

    #[tokio::test]
    async fn test_assistance_without_peers_is_a_noop() {
        let store = Arc::new(MemoryStore::new());
        let mut agent = agent_for("mountain_region", store.clone());

        agent.monitor().await.unwrap();

        assert!(store.assistance().await.is_empty());
        assert!(!agent.request_assistance("emergency_response").await);
    }

    #[tokio::test]
    async fn test_assistance_before_any_cycle_is_false() {
        let store = Arc::new(MemoryStore::new());
        let agent = agent_for("coastal_city", store.clone());

        assert!(!agent.request_assistance("emergency_response").await);
        assert!(store.assistance().await.is_empty());
    }

    #[tokio::test]
    async fn test_last_assessment_is_replaced_each_cycle() {
        let store = Arc::new(MemoryStore::new());
        let mut agent = agent_for("london", store.clone());

        agent.monitor().await.unwrap();
        let first = agent.last_assessment().unwrap().timestamp;

        agent.monitor().await.unwrap();
        let second = agent.last_assessment().unwrap().timestamp;

        assert!(second >= first);
        assert_eq!(store.assessments().await.len(), 2);
    }
}
