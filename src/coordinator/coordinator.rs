//! Coordinator: central orchestrator for the regional agents
//!
//! The Coordinator owns the agent registry and drives monitoring rounds:
//!   - Rebuilds the full-mesh peer view before every round
//!   - Runs each agent's cycle sequentially in registration order
//!   - Records per-agent failures without aborting the round
//!   - Reduces the collected results into a fresh GlobalStatus

use std::collections::HashSet;

use tracing::{debug, error, info};

use crate::agents::{AgentRecord, MonitorAgent};
use crate::error::{Result, StormError};

use super::state::{AgentFailure, RoundReport};

pub struct Coordinator {
    /// Registration order is round order
    agents: Vec<Box<dyn MonitorAgent>>,
    ids: HashSet<String>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self {
            agents: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// Register an agent under its unique id.
    ///
    /// A duplicate id is rejected and the already-registered agent is
    /// left untouched.
    pub fn register(&mut self, agent: Box<dyn MonitorAgent>) -> Result<()> {
        let agent_id = agent.id().to_string();
        if !self.ids.insert(agent_id.clone()) {
            return Err(StormError::AgentAlreadyRegistered { agent_id });
        }

        info!(agent_id = agent_id, region = agent.region(), "Agent registered");
        self.agents.push(agent);
        Ok(())
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn regions(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.region().to_string()).collect()
    }

    /// Registry view for reports and the API
    pub fn agent_records(&self) -> Vec<AgentRecord> {
        self.agents.iter().map(|a| a.describe()).collect()
    }

    /// Run one monitoring round across every registered agent.
    ///
    /// Always returns a report: a failing agent costs the round its own
    /// result slot and nothing else, and the global status is reduced
    /// purely from this round's surviving results.
    pub async fn coordinate_round(&mut self) -> RoundReport {
        let peer_ids: Vec<String> = self.agents.iter().map(|a| a.id().to_string()).collect();
        debug!(agents = peer_ids.len(), "Round starting");

        for agent in &mut self.agents {
            agent.set_peers(peer_ids.clone());
        }

        let mut results = Vec::with_capacity(self.agents.len());
        let mut failures = Vec::new();

        for agent in &mut self.agents {
            match agent.monitor().await {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!(
                        agent_id = agent.id(),
                        region = agent.region(),
                        error = %e,
                        "Agent cycle failed"
                    );
                    failures.push(AgentFailure {
                        agent_id: agent.id().to_string(),
                        region: agent.region().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let report = RoundReport::new(results, failures);
        info!(
            round_id = %report.round_id,
            results = report.results.len(),
            failures = report.failures.len(),
            high_risk = report.global.high_risk_regions.len(),
            alerts = report.global.active_alerts.len(),
            "Round complete"
        );
        report
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::domain::{Condition, MonitoringResult};

    /// Hand-rolled agent that reports a fixed condition, or fails
    struct ScriptedAgent {
        id: String,
        region: String,
        condition: Condition,
        fail: bool,
        peers_seen: Arc<Mutex<Vec<String>>>,
        call_log: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedAgent {
        fn new(
            id: &str,
            region: &str,
            condition: Condition,
            call_log: Arc<Mutex<Vec<String>>>,
        ) -> Self {
            Self {
                id: id.to_string(),
                region: region.to_string(),
                condition,
                fail: false,
                peers_seen: Arc::new(Mutex::new(Vec::new())),
                call_log,
            }
        }

        fn failing(mut self) -> Self {
            self.fail = true;
            self
        }
    }

    #[async_trait]
    impl MonitorAgent for ScriptedAgent {
        fn id(&self) -> &str {
            &self.id
        }

        fn region(&self) -> &str {
            &self.region
        }

        fn set_peers(&mut self, peers: Vec<String>) {
            *self.peers_seen.lock().unwrap() = peers;
        }

        fn describe(&self) -> AgentRecord {
            AgentRecord {
                id: self.id.clone(),
                region: self.region.clone(),
                capabilities: vec!["weather_monitoring".to_string()],
                last_assessment: None,
                peers: self.peers_seen.lock().unwrap().clone(),
            }
        }

        async fn monitor(&mut self) -> Result<MonitoringResult> {
            self.call_log.lock().unwrap().push(self.id.clone());
            if self.fail {
                return Err(StormError::ComponentFailure {
                    component: "provider".to_string(),
                    reason: "scripted outage".to_string(),
                });
            }
            Ok(MonitoringResult {
                agent_id: self.id.clone(),
                region: self.region.clone(),
                condition: self.condition,
                score: self.condition.risk_score(),
                confidence: 0.9,
                action_count: 2,
                timestamp: Utc::now(),
            })
        }
    }

    fn coordinator_with(agents: Vec<ScriptedAgent>) -> Coordinator {
        let mut coordinator = Coordinator::new();
        for agent in agents {
            coordinator.register(Box::new(agent)).unwrap();
        }
        coordinator
    }

    #[tokio::test]
    async fn test_empty_round_is_calm() {
        let mut coordinator = Coordinator::new();
        let report = coordinator.coordinate_round().await;

        assert!(report.results.is_empty());
        assert!(report.failures.is_empty());
        assert!(report.global.is_calm());
    }

    #[test]
    fn test_duplicate_id_rejected_and_original_kept() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut coordinator = Coordinator::new();
        coordinator
            .register(Box::new(ScriptedAgent::new(
                "AGENT_1",
                "coastal_city",
                Condition::Stormy,
                log.clone(),
            )))
            .unwrap();

        let err = coordinator
            .register(Box::new(ScriptedAgent::new(
                "AGENT_1",
                "london",
                Condition::Normal,
                log,
            )))
            .unwrap_err();

        assert!(matches!(err, StormError::AgentAlreadyRegistered { .. }));
        assert_eq!(coordinator.agent_count(), 1);
        assert_eq!(coordinator.regions(), vec!["coastal_city".to_string()]);
    }

    #[tokio::test]
    async fn test_round_runs_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut coordinator = coordinator_with(vec![
            ScriptedAgent::new("AGENT_B", "coastal_city", Condition::Normal, log.clone()),
            ScriptedAgent::new("AGENT_A", "london", Condition::Normal, log.clone()),
            ScriptedAgent::new("AGENT_C", "mountain_region", Condition::Normal, log.clone()),
        ]);

        coordinator.coordinate_round().await;

        assert_eq!(*log.lock().unwrap(), vec!["AGENT_B", "AGENT_A", "AGENT_C"]);
    }

    #[tokio::test]
    async fn test_full_mesh_peers_assigned_before_round() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut coordinator = coordinator_with(vec![
            ScriptedAgent::new("AGENT_1", "coastal_city", Condition::Normal, log.clone()),
            ScriptedAgent::new("AGENT_2", "london", Condition::Normal, log.clone()),
        ]);

        coordinator.coordinate_round().await;

        for record in coordinator.agent_records() {
            assert_eq!(record.peers, vec!["AGENT_1".to_string(), "AGENT_2".to_string()]);
        }
    }

    #[tokio::test]
    async fn test_failing_agent_does_not_abort_round() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut coordinator = coordinator_with(vec![
            ScriptedAgent::new("AGENT_1", "coastal_city", Condition::Stormy, log.clone()),
            ScriptedAgent::new("AGENT_2", "mountain_region", Condition::FloodRisk, log.clone())
                .failing(),
            ScriptedAgent::new("AGENT_3", "inland_valley", Condition::Normal, log.clone()),
        ]);

        let report = coordinator.coordinate_round().await;

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].agent_id, "AGENT_2");
        // The failed agent contributes nothing to the aggregation.
        assert!(!report.global.high_risk_regions.contains("mountain_region"));
        assert!(report.global.high_risk_regions.contains("coastal_city"));
        // All three ran regardless of the middle failure.
        assert_eq!(log.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_aggregation_reads_only_current_round() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut coordinator = coordinator_with(vec![ScriptedAgent::new(
            "AGENT_1",
            "coastal_city",
            Condition::Hurricane,
            log.clone(),
        )]);

        let first = coordinator.coordinate_round().await;
        assert!(first.global.active_alerts.contains(&Condition::Hurricane));

        // Re-register a calm agent set by rebuilding the coordinator; the
        // next round's status must not inherit the hurricane.
        let mut calm = coordinator_with(vec![ScriptedAgent::new(
            "AGENT_1",
            "coastal_city",
            Condition::Normal,
            log,
        )]);
        let second = calm.coordinate_round().await;
        assert!(second.global.is_calm());
        assert_ne!(first.round_id, second.round_id);
    }
}
