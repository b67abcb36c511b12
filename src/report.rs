//! Summary report: one serializable view across agents and the latest
//! round, plus the table rendering used by the status command.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::{Table, Tabled};
use uuid::Uuid;

use crate::agents::AgentRecord;
use crate::coordinator::{GlobalStatus, RoundReport};
use crate::domain::{Condition, ModelTag};

/// One agent's line in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSummary {
    pub id: String,
    pub region: String,
    pub capabilities: Vec<String>,
    pub condition: Option<Condition>,
    pub score: Option<u8>,
    pub confidence: Option<f64>,
    pub model_used: Option<ModelTag>,
    pub assessed_at: Option<DateTime<Utc>>,
}

impl AgentSummary {
    fn from_record(record: &AgentRecord) -> Self {
        let assessment = record.last_assessment.as_ref();
        Self {
            id: record.id.clone(),
            region: record.region.clone(),
            capabilities: record.capabilities.clone(),
            condition: assessment.map(|a| a.condition),
            score: assessment.map(|a| a.score),
            confidence: assessment.map(|a| a.confidence),
            model_used: assessment.map(|a| a.model_used),
            assessed_at: assessment.map(|a| a.timestamp),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub generated_at: DateTime<Utc>,
    /// Round the global status came from, absent before the first round
    pub round_id: Option<Uuid>,
    pub global: GlobalStatus,
    pub agents: Vec<AgentSummary>,
    /// Assistance requests recorded in the report window
    pub assistance_requests: usize,
}

impl SummaryReport {
    /// Pure assembly over the registry view and the latest round.
    /// The global status is taken from the round envelope, never
    /// recomputed from stale agent state.
    pub fn build(
        records: &[AgentRecord],
        round: Option<&RoundReport>,
        assistance_requests: usize,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            round_id: round.map(|r| r.round_id),
            global: round.map(|r| r.global.clone()).unwrap_or_default(),
            agents: records.iter().map(AgentSummary::from_record).collect(),
            assistance_requests,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct StatusRow {
    agent: String,
    region: String,
    condition: String,
    score: String,
    confidence: String,
    model: String,
}

impl StatusRow {
    fn from_summary(summary: &AgentSummary) -> Self {
        Self {
            agent: summary.id.clone(),
            region: summary.region.clone(),
            condition: summary
                .condition
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
            score: summary
                .score
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            confidence: summary
                .confidence
                .map(|c| format!("{c:.2}"))
                .unwrap_or_else(|| "-".to_string()),
            model: summary
                .model_used
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Render the per-agent table for the status command
pub fn status_table(report: &SummaryReport) -> String {
    let rows: Vec<StatusRow> = report.agents.iter().map(StatusRow::from_summary).collect();
    if rows.is_empty() {
        return "(no agents)".to_string();
    }
    Table::new(rows).to_string()
}
