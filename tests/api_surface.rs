use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use stormwatch::api::{create_router, ApiState};
use stormwatch::coordinator::{shared_round, RoundReport};
use stormwatch::domain::{ActionItem, ActionPriority, Condition, MonitoringResult, WeatherSnapshot};
use stormwatch::persistence::{MemoryStore, RecordStore};

fn result(region: &str, condition: Condition) -> MonitoringResult {
    MonitoringResult {
        agent_id: format!("AGENT_1_{}", region.to_uppercase()),
        region: region.to_string(),
        condition,
        score: condition.risk_score(),
        confidence: 0.9,
        action_count: 4,
        timestamp: Utc::now(),
    }
}

fn api_fixture() -> (ApiState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = ApiState::new(shared_round(), store.clone());
    (state, store)
}

async fn get(state: &ApiState, uri: &str) -> (StatusCode, Value) {
    let response = create_router(state.clone())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, json)
}

#[tokio::test]
async fn health_degraded_before_first_round() {
    let (state, _) = api_fixture();

    let (status, body) = get(&state, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["components"][0]["name"], "rounds");
}

#[tokio::test]
async fn health_recovers_after_a_round() {
    let (state, _) = api_fixture();
    *state.latest_round.write().await =
        Some(RoundReport::new(vec![result("london", Condition::Normal)], vec![]));

    let (status, body) = get(&state, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn status_not_found_before_first_round() {
    let (state, _) = api_fixture();

    let (status, _) = get(&state, "/api/status").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_serves_latest_round_envelope() {
    let (state, _) = api_fixture();
    let round = RoundReport::new(vec![result("coastal_city", Condition::Stormy)], vec![]);
    let round_id = round.round_id.to_string();
    *state.latest_round.write().await = Some(round);

    let (status, body) = get(&state, "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["round_id"], round_id.as_str());
    assert_eq!(body["results"][0]["condition"], "STORMY");
    assert_eq!(body["global"]["high_risk_regions"][0], "coastal_city");
}

#[tokio::test]
async fn region_history_reads_the_store() {
    let (state, store) = api_fixture();
    let snapshot = WeatherSnapshot::new("coastal_city", 28.0, 85.0, 65.0, 50.0, 1000.0, "simulated");
    store.save_snapshot(&snapshot).await.unwrap();

    let (status, body) = get(&state, "/api/regions/coastal_city/history?hours=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["region"], "coastal_city");

    let (status, body) = get(&state, "/api/regions/elsewhere/history").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn alerts_window_lists_planned_actions() {
    let (state, store) = api_fixture();
    let actions = vec![
        ActionItem::new("Evacuate low-lying areas", ActionPriority::Critical, 0),
        ActionItem::new("Deploy flood barriers", ActionPriority::High, 5),
    ];
    store
        .save_actions("AGENT_2_MOUNTAIN_REGION", "mountain_region", &actions)
        .await
        .unwrap();

    let (status, body) = get(&state, "/api/alerts?hours=1").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["region"], "mountain_region");
    assert_eq!(rows[0]["status"], "pending");
}

#[tokio::test]
async fn window_endpoints_survive_oversized_hours() {
    let (state, store) = api_fixture();
    let warning = ActionItem::new("Issue storm warning", ActionPriority::High, 0);
    store
        .save_actions("AGENT_1_COASTAL_CITY", "coastal_city", &[warning])
        .await
        .unwrap();

    // Values this large once overflowed the window math inside the
    // store; the handler clamps them to the maximum window instead.
    let (status, body) = get(&state, "/api/alerts?hours=10000000000000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) =
        get(&state, "/api/regions/coastal_city/history?hours=10000000000000").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn report_includes_assistance_window_count() {
    let (state, store) = api_fixture();
    use stormwatch::assistance::{AssistanceLog, AssistanceRequest};

    store
        .record(AssistanceRequest::new(
            "AGENT_2_MOUNTAIN_REGION",
            "AGENT_1_COASTAL_CITY",
            "mountain_region experiencing FLOOD_RISK, need emergency_response",
            "emergency_response",
        ))
        .await;

    let (status, body) = get(&state, "/api/report").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assistance_requests"], 1);
    assert!(body["round_id"].is_null());
    assert!(body["agents"].as_array().unwrap().is_empty());
}
