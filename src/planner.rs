//! Escalation-aware response planning.
//!
//! Pure and deterministic: (condition, snapshot) in, ordered plan out.
//! Base plans are static per condition; two escalation rules adjust the
//! plan using local snapshot factors. The STORMY escalation deliberately
//! lands at position two with a 2 second delay, ahead of base items that
//! carry larger delays. Keep that slot as is.

use crate::domain::{ActionItem, ActionPriority, Condition, WeatherSnapshot};

/// Humidity above this keeps rain likely after a flood warning
const FLOOD_SHELTER_HUMIDITY: f64 = 85.0;
/// Wind above this makes unsecured objects an immediate hazard
const STORM_SECURE_WIND: f64 = 80.0;

/// Build the ordered response plan for a classified condition.
///
/// Never fails and never returns an empty plan. Snapshot fields are
/// sanitized before any escalation rule reads them.
pub fn plan(condition: Condition, snapshot: &WeatherSnapshot) -> Vec<ActionItem> {
    let clean = snapshot.sanitized();
    let mut actions = base_plan(condition);

    match condition {
        Condition::FloodRisk if clean.humidity > FLOOD_SHELTER_HUMIDITY => {
            actions.push(ActionItem::new(
                "Open temporary shelters for displaced persons",
                ActionPriority::High,
                20,
            ));
        }
        Condition::Stormy if clean.wind_speed > STORM_SECURE_WIND => {
            actions.insert(
                1,
                ActionItem::new(
                    "Emergency: secure exposed property and loose objects",
                    ActionPriority::High,
                    2,
                ),
            );
        }
        _ => {}
    }

    actions
}

fn base_plan(condition: Condition) -> Vec<ActionItem> {
    match condition {
        Condition::Hurricane => vec![
            ActionItem::new("Activate all emergency protocols", ActionPriority::Critical, 0),
            ActionItem::new("Mandatory evacuation for coastal areas", ActionPriority::Critical, 0),
            ActionItem::new("Deploy all emergency services", ActionPriority::Critical, 5),
            ActionItem::new("Set up emergency command center", ActionPriority::High, 10),
            ActionItem::new("Activate disaster relief coordination", ActionPriority::High, 15),
        ],
        Condition::FloodRisk => vec![
            ActionItem::new("Activate flood warning system", ActionPriority::Critical, 0),
            ActionItem::new("Close vulnerable roads", ActionPriority::High, 5),
            ActionItem::new("Pre-position rescue equipment", ActionPriority::High, 10),
            ActionItem::new("Implement evacuation plan", ActionPriority::High, 15),
        ],
        Condition::Stormy => vec![
            ActionItem::new("Issue storm warning", ActionPriority::High, 0),
            ActionItem::new("Activate emergency shelters", ActionPriority::High, 5),
            ActionItem::new("Deploy emergency response teams", ActionPriority::Medium, 10),
            ActionItem::new("Issue evacuation advisory for exposed areas", ActionPriority::Medium, 15),
        ],
        Condition::Rainy => vec![
            ActionItem::new("Issue rain advisory", ActionPriority::Medium, 0),
            ActionItem::new("Advise residents to stay indoors", ActionPriority::Medium, 5),
            ActionItem::new("Prepare drainage systems", ActionPriority::Low, 10),
            ActionItem::new("Monitor for potential flooding", ActionPriority::Medium, 15),
        ],
        Condition::Normal => vec![
            ActionItem::new("Continue normal operations", ActionPriority::Low, 0),
            ActionItem::new("Maintain routine monitoring", ActionPriority::Low, 30),
        ],
    }
}
