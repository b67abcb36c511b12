//! Read-only HTTP API over the monitoring rounds
//!
//! Serves immutable snapshots only: the latest round envelope published
//! by the watch loop, store-backed history/alert windows, and the
//! summary report. Nothing here mutates agent or coordinator state.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::agents::AgentRecord;
use crate::coordinator::SharedRound;
use crate::error::{Result, StormError};
use crate::persistence::RecordStore;
use crate::report::SummaryReport;

const DEFAULT_WINDOW_HOURS: i64 = 24;
/// Largest accepted `?hours=` window (one year)
const MAX_WINDOW_HOURS: i64 = 24 * 365;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Latest completed round, written by the watch loop
    pub latest_round: SharedRound,
    /// Registry view refreshed after every round
    pub agents: Arc<RwLock<Vec<AgentRecord>>>,
    /// Persistence collaborator for history and alert windows
    pub store: Arc<dyn RecordStore>,
    /// Process start time
    pub started_at: DateTime<Utc>,
}

impl ApiState {
    pub fn new(latest_round: SharedRound, store: Arc<dyn RecordStore>) -> Self {
        Self {
            latest_round,
            agents: Arc::new(RwLock::new(Vec::new())),
            store,
            started_at: Utc::now(),
        }
    }

    /// Replace the registry view after a round
    pub async fn publish_agents(&self, records: Vec<AgentRecord>) {
        *self.agents.write().await = records;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub components: Vec<ComponentHealth>,
}

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub hours: Option<i64>,
}

impl WindowQuery {
    fn hours(&self) -> i64 {
        self.hours
            .unwrap_or(DEFAULT_WINDOW_HOURS)
            .clamp(1, MAX_WINDOW_HOURS)
    }
}

pub fn create_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/status", get(status_handler))
        .route("/api/regions/:region/history", get(region_history_handler))
        .route("/api/alerts", get(alerts_handler))
        .route("/api/report", get(report_handler))
        .with_state(state)
        .layer(cors)
}

/// Bind and serve the API until the task is dropped or the listener fails
pub async fn serve(state: ApiState, bind: &str, port: u16) -> Result<()> {
    let ip = bind
        .parse::<std::net::IpAddr>()
        .map_err(|e| StormError::Internal(format!("invalid API bind address {bind}: {e}")))?;
    let addr = SocketAddr::from((ip, port));
    let app = create_router(state);

    info!(addr = %addr, "Starting API server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| StormError::Internal(format!("API server error: {e}")))?;

    Ok(())
}

/// GET /health
async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let round = state.latest_round.read().await;
    let rounds_status = if round.is_some() {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    let components = vec![ComponentHealth {
        name: "rounds".to_string(),
        status: rounds_status,
        message: match round.as_ref() {
            Some(report) => Some(format!("last round at {}", report.timestamp.to_rfc3339())),
            None => Some("no round completed yet".to_string()),
        },
    }];

    let uptime = (Utc::now() - state.started_at).num_seconds().max(0) as u64;
    Json(HealthResponse {
        status: rounds_status,
        timestamp: Utc::now(),
        uptime_seconds: uptime,
        components,
    })
}

/// GET /api/status, the latest round envelope
async fn status_handler(
    State(state): State<ApiState>,
) -> std::result::Result<impl IntoResponse, (StatusCode, String)> {
    let round = state.latest_round.read().await;
    match round.as_ref() {
        Some(report) => Ok(Json(report.clone())),
        None => Err((StatusCode::NOT_FOUND, "no completed round yet".to_string())),
    }
}

/// GET /api/regions/:region/history?hours=
async fn region_history_handler(
    State(state): State<ApiState>,
    Path(region): Path<String>,
    Query(window): Query<WindowQuery>,
) -> std::result::Result<impl IntoResponse, (StatusCode, String)> {
    let snapshots = state
        .store
        .region_history(&region, window.hours())
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(snapshots))
}

/// GET /api/alerts?hours=, recent planned actions across all regions
async fn alerts_handler(
    State(state): State<ApiState>,
    Query(window): Query<WindowQuery>,
) -> std::result::Result<impl IntoResponse, (StatusCode, String)> {
    let alerts = state
        .store
        .recent_alerts(window.hours())
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(alerts))
}

/// GET /api/report, the summary over agents and the assistance window
async fn report_handler(
    State(state): State<ApiState>,
) -> std::result::Result<impl IntoResponse, (StatusCode, String)> {
    let assistance = state
        .store
        .recent_assistance(DEFAULT_WINDOW_HOURS)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let agents = state.agents.read().await;
    let round = state.latest_round.read().await;
    let report = SummaryReport::build(&agents, round.as_ref(), assistance.len());
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::{shared_round, RoundReport};
    use crate::domain::{Condition, MonitoringResult};
    use crate::persistence::MemoryStore;

    fn state_with_store() -> (ApiState, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (ApiState::new(shared_round(), store.clone()), store)
    }

    #[tokio::test]
    async fn test_status_before_first_round_is_not_found() {
        let (state, _) = state_with_store();
        let round = state.latest_round.read().await;
        assert!(round.is_none());
    }

    #[tokio::test]
    async fn test_publish_round_makes_status_available() {
        let (state, _) = state_with_store();
        let report = RoundReport::new(
            vec![MonitoringResult {
                agent_id: "AGENT_1_COASTAL_CITY".to_string(),
                region: "coastal_city".to_string(),
                condition: Condition::Stormy,
                score: 5,
                confidence: 0.85,
                action_count: 5,
                timestamp: Utc::now(),
            }],
            vec![],
        );

        *state.latest_round.write().await = Some(report.clone());

        let stored = state.latest_round.read().await;
        let stored = stored.as_ref().unwrap();
        assert_eq!(stored.round_id, report.round_id);
        assert!(stored.global.high_risk_regions.contains("coastal_city"));
    }

    #[tokio::test]
    async fn test_window_query_defaults_to_a_day() {
        let q = WindowQuery { hours: None };
        assert_eq!(q.hours(), 24);
        let q = WindowQuery { hours: Some(0) };
        assert_eq!(q.hours(), 1);
        let q = WindowQuery { hours: Some(6) };
        assert_eq!(q.hours(), 6);
    }

    #[test]
    fn test_window_query_clamps_oversized_hours() {
        // Unclamped, a value this large overflows the chrono window math.
        let q = WindowQuery { hours: Some(10_000_000_000_000) };
        assert_eq!(q.hours(), MAX_WINDOW_HOURS);
        let q = WindowQuery { hours: Some(i64::MAX) };
        assert_eq!(q.hours(), MAX_WINDOW_HOURS);
        let q = WindowQuery { hours: Some(-5) };
        assert_eq!(q.hours(), 1);
    }
}
