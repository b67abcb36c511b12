//! In-memory store, used when the database is disabled and in tests.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::assistance::{AssistanceLog, AssistanceRequest};
use crate::domain::{ActionItem, RiskAssessment, WeatherSnapshot};
use crate::error::Result;

use super::store::{window_start, ActionRecord, RecordStore};

#[derive(Default)]
pub struct MemoryStore {
    snapshots: Mutex<Vec<WeatherSnapshot>>,
    assessments: Mutex<Vec<RiskAssessment>>,
    actions: Mutex<Vec<ActionRecord>>,
    assistance: Mutex<Vec<AssistanceRequest>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored assessments, oldest first. Test and report helper.
    pub async fn assessments(&self) -> Vec<RiskAssessment> {
        self.assessments.lock().await.clone()
    }

    /// All stored assistance requests, oldest first
    pub async fn assistance(&self) -> Vec<AssistanceRequest> {
        self.assistance.lock().await.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn save_snapshot(&self, snapshot: &WeatherSnapshot) -> Result<()> {
        self.snapshots.lock().await.push(snapshot.clone());
        Ok(())
    }

    async fn save_assessment(&self, assessment: &RiskAssessment) -> Result<()> {
        self.assessments.lock().await.push(assessment.clone());
        Ok(())
    }

    async fn save_actions(&self, agent_id: &str, region: &str, actions: &[ActionItem]) -> Result<()> {
        let mut log = self.actions.lock().await;
        for item in actions {
            log.push(ActionRecord::from_item(agent_id, region, item));
        }
        Ok(())
    }

    async fn save_assistance(&self, request: &AssistanceRequest) -> Result<()> {
        self.assistance.lock().await.push(request.clone());
        Ok(())
    }

    async fn region_history(&self, region: &str, hours: i64) -> Result<Vec<WeatherSnapshot>> {
        let cutoff = window_start(hours);
        let mut rows: Vec<WeatherSnapshot> = self
            .snapshots
            .lock()
            .await
            .iter()
            .filter(|s| s.region == region && s.timestamp > cutoff)
            .cloned()
            .collect();
        rows.sort_by_key(|s| std::cmp::Reverse(s.timestamp));
        Ok(rows)
    }

    async fn recent_alerts(&self, hours: i64) -> Result<Vec<ActionRecord>> {
        let cutoff = window_start(hours);
        let mut rows: Vec<ActionRecord> = self
            .actions
            .lock()
            .await
            .iter()
            .filter(|a| a.timestamp > cutoff)
            .cloned()
            .collect();
        rows.sort_by_key(|a| std::cmp::Reverse(a.timestamp));
        Ok(rows)
    }

    async fn recent_assistance(&self, hours: i64) -> Result<Vec<AssistanceRequest>> {
        let cutoff = window_start(hours);
        let mut rows: Vec<AssistanceRequest> = self
            .assistance
            .lock()
            .await
            .iter()
            .filter(|r| r.timestamp > cutoff)
            .cloned()
            .collect();
        rows.sort_by_key(|r| std::cmp::Reverse(r.timestamp));
        Ok(rows)
    }
}

#[async_trait]
impl AssistanceLog for MemoryStore {
    async fn record(&self, request: AssistanceRequest) {
        self.assistance.lock().await.push(request);
    }
}
