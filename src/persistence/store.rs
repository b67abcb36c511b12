//! Storage contract shared by the PostgreSQL and in-memory backends.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::assistance::AssistanceRequest;
use crate::domain::{ActionItem, RiskAssessment, WeatherSnapshot};
use crate::error::Result;

/// One logged plan step, as stored and served by the alerts query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub agent_id: String,
    pub region: String,
    pub action: String,
    pub priority: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl ActionRecord {
    pub fn from_item(agent_id: &str, region: &str, item: &ActionItem) -> Self {
        Self {
            agent_id: agent_id.to_string(),
            region: region.to_string(),
            action: item.description.clone(),
            priority: item.priority.as_str().to_string(),
            status: "pending".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Start of an `hours` lookback window.
///
/// Windows too wide for the time types saturate to the earliest
/// representable instant, so the query covers everything on record
/// instead of overflowing.
pub(crate) fn window_start(hours: i64) -> DateTime<Utc> {
    Duration::try_hours(hours)
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Durable audit-trail contract.
///
/// Save calls are write-after-produce; nothing in the monitoring core
/// reads its own writes back. The range queries serve the API and report
/// surfaces, newest rows first.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn save_snapshot(&self, snapshot: &WeatherSnapshot) -> Result<()>;

    async fn save_assessment(&self, assessment: &RiskAssessment) -> Result<()>;

    async fn save_actions(&self, agent_id: &str, region: &str, actions: &[ActionItem]) -> Result<()>;

    async fn save_assistance(&self, request: &AssistanceRequest) -> Result<()>;

    /// Snapshots for one region inside the last `hours`
    async fn region_history(&self, region: &str, hours: i64) -> Result<Vec<WeatherSnapshot>>;

    /// Logged actions across all regions inside the last `hours`
    async fn recent_alerts(&self, hours: i64) -> Result<Vec<ActionRecord>>;

    /// Assistance requests inside the last `hours`
    async fn recent_assistance(&self, hours: i64) -> Result<Vec<AssistanceRequest>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ActionPriority;

    #[test]
    fn test_action_record_starts_pending() {
        let item = ActionItem::new("Close vulnerable roads", ActionPriority::High, 5);
        let record = ActionRecord::from_item("AGENT_1_COASTAL_CITY", "coastal_city", &item);

        assert_eq!(record.status, "pending");
        assert_eq!(record.priority, "HIGH");
        assert_eq!(record.action, "Close vulnerable roads");
    }

    #[test]
    fn test_window_start_saturates_instead_of_overflowing() {
        assert_eq!(window_start(i64::MAX), DateTime::<Utc>::MIN_UTC);
        assert_eq!(window_start(10_000_000_000_000), DateTime::<Utc>::MIN_UTC);

        let day_ago = window_start(24);
        assert!(day_ago < Utc::now());
        assert!(day_ago > DateTime::<Utc>::MIN_UTC);
    }
}
