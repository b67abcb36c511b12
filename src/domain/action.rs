use serde::{Deserialize, Serialize};

/// Urgency level of a planned response action.
///
/// Variant order is ascending urgency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl ActionPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionPriority::Low => "LOW",
            ActionPriority::Medium => "MEDIUM",
            ActionPriority::High => "HIGH",
            ActionPriority::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for ActionPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One step of a response plan. Plans are ordered sequences; the planner
/// controls position, delay does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub description: String,
    pub priority: ActionPriority,
    pub delay_seconds: u64,
}

impl ActionItem {
    pub fn new(description: impl Into<String>, priority: ActionPriority, delay_seconds: u64) -> Self {
        Self {
            description: description.into(),
            priority,
            delay_seconds,
        }
    }
}
