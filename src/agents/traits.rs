//! MonitorAgent trait, the round-driven agent interface
//!
//! Agents do not own a loop: the coordinator calls `monitor()` once per
//! round, after assigning the round's peer view. One `monitor()` call is
//! one full perceive/reason/act cycle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{MonitoringResult, RiskAssessment};
use crate::error::Result;

/// Registry-facing description of an agent, served read-only to
/// presentation consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: String,
    pub region: String,
    pub capabilities: Vec<String>,
    pub last_assessment: Option<RiskAssessment>,
    /// Round-scoped peer ids, rebuilt by the coordinator every round
    pub peers: Vec<String>,
}

/// Round-driven monitoring agent.
///
/// `monitor()` always comes back with a result or an error within the
/// collaborators' own timeouts; a failing agent only ever costs the
/// round its own slot.
#[async_trait]
pub trait MonitorAgent: Send + Sync {
    /// Unique identifier for this agent instance
    fn id(&self) -> &str;

    /// Region this agent monitors
    fn region(&self) -> &str;

    /// Replace the peer view for the upcoming round
    fn set_peers(&mut self, peers: Vec<String>);

    /// Read-only registry description
    fn describe(&self) -> AgentRecord;

    /// Run one full perceive/reason/act cycle
    async fn monitor(&mut self) -> Result<MonitoringResult>;
}
