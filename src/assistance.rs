//! Inter-agent assistance messaging.
//!
//! A request is an append-only audit record, one per peer, written when a
//! region hits a severe condition. At-most-once semantics: no delivery,
//! no acknowledgement, no retry, and agents never read the log back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Condition;

/// One outgoing help notification from an agent to a single peer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistanceRequest {
    pub id: Uuid,
    pub from_agent: String,
    pub to_agent: String,
    pub message: String,
    pub kind: String,
    pub timestamp: DateTime<Utc>,
}

impl AssistanceRequest {
    pub fn new(
        from_agent: impl Into<String>,
        to_agent: impl Into<String>,
        message: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_agent: from_agent.into(),
            to_agent: to_agent.into(),
            message: message.into(),
            kind: kind.into(),
            timestamp: Utc::now(),
        }
    }

    /// Standard message body for a condition-triggered request
    pub fn emergency_message(region: &str, condition: Condition, kind: &str) -> String {
        format!("{region} experiencing {condition}, need {kind}")
    }
}

/// Append-only assistance record sink.
///
/// Implementations swallow their own write failures; a lost audit record
/// must never fail the requesting agent's cycle.
#[async_trait]
pub trait AssistanceLog: Send + Sync {
    async fn record(&self, request: AssistanceRequest);
}
