//! PostgreSQL storage adapter.
//!
//! Schema is ensured on connect with idempotent CREATE TABLE statements;
//! there is no separate migration step to run before first start.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use tracing::{info, instrument, warn};

use crate::assistance::{AssistanceLog, AssistanceRequest};
use crate::config::DatabaseConfig;
use crate::domain::{ActionItem, RiskAssessment, WeatherSnapshot};
use crate::error::Result;

use super::store::{window_start, ActionRecord, RecordStore};

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and ensure the audit tables exist
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        info!("Connected to PostgreSQL");

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS weather_snapshots (
                id BIGSERIAL PRIMARY KEY,
                region TEXT NOT NULL,
                temperature DOUBLE PRECISION NOT NULL,
                humidity DOUBLE PRECISION NOT NULL,
                wind_speed DOUBLE PRECISION NOT NULL,
                rainfall DOUBLE PRECISION NOT NULL,
                pressure DOUBLE PRECISION NOT NULL,
                source TEXT NOT NULL,
                recorded_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS risk_assessments (
                id BIGSERIAL PRIMARY KEY,
                region TEXT NOT NULL,
                condition TEXT NOT NULL,
                risk_score INTEGER NOT NULL,
                confidence DOUBLE PRECISION NOT NULL,
                model_used TEXT NOT NULL,
                recorded_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS planned_actions (
                id BIGSERIAL PRIMARY KEY,
                agent_id TEXT NOT NULL,
                region TEXT NOT NULL,
                action TEXT NOT NULL,
                priority TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                recorded_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS assistance_requests (
                id BIGSERIAL PRIMARY KEY,
                request_id UUID NOT NULL,
                from_agent TEXT NOT NULL,
                to_agent TEXT NOT NULL,
                message TEXT NOT NULL,
                kind TEXT NOT NULL,
                recorded_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Audit schema ready");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PostgresStore {
    #[instrument(skip(self, snapshot))]
    async fn save_snapshot(&self, snapshot: &WeatherSnapshot) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO weather_snapshots
                (region, temperature, humidity, wind_speed, rainfall, pressure, source, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&snapshot.region)
        .bind(snapshot.temperature)
        .bind(snapshot.humidity)
        .bind(snapshot.wind_speed)
        .bind(snapshot.rainfall)
        .bind(snapshot.pressure)
        .bind(&snapshot.source)
        .bind(snapshot.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self, assessment))]
    async fn save_assessment(&self, assessment: &RiskAssessment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO risk_assessments
                (region, condition, risk_score, confidence, model_used, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&assessment.region)
        .bind(assessment.condition.as_str())
        .bind(assessment.score as i32)
        .bind(assessment.confidence)
        .bind(assessment.model_used.as_str())
        .bind(assessment.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self, actions))]
    async fn save_actions(&self, agent_id: &str, region: &str, actions: &[ActionItem]) -> Result<()> {
        for item in actions {
            sqlx::query(
                r#"
                INSERT INTO planned_actions (agent_id, region, action, priority, status, recorded_at)
                VALUES ($1, $2, $3, $4, 'pending', $5)
                "#,
            )
            .bind(agent_id)
            .bind(region)
            .bind(&item.description)
            .bind(item.priority.as_str())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    #[instrument(skip(self, request))]
    async fn save_assistance(&self, request: &AssistanceRequest) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO assistance_requests
                (request_id, from_agent, to_agent, message, kind, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(request.id)
        .bind(&request.from_agent)
        .bind(&request.to_agent)
        .bind(&request.message)
        .bind(&request.kind)
        .bind(request.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn region_history(&self, region: &str, hours: i64) -> Result<Vec<WeatherSnapshot>> {
        let cutoff = window_start(hours);
        let rows = sqlx::query(
            r#"
            SELECT region, temperature, humidity, wind_speed, rainfall, pressure, source, recorded_at
            FROM weather_snapshots
            WHERE region = $1 AND recorded_at > $2
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(region)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        let snapshots = rows
            .iter()
            .map(|row| WeatherSnapshot {
                region: row.get("region"),
                temperature: row.get("temperature"),
                humidity: row.get("humidity"),
                wind_speed: row.get("wind_speed"),
                rainfall: row.get("rainfall"),
                pressure: row.get("pressure"),
                source: row.get("source"),
                timestamp: row.get("recorded_at"),
            })
            .collect();

        Ok(snapshots)
    }

    async fn recent_alerts(&self, hours: i64) -> Result<Vec<ActionRecord>> {
        let cutoff = window_start(hours);
        let rows = sqlx::query(
            r#"
            SELECT agent_id, region, action, priority, status, recorded_at
            FROM planned_actions
            WHERE recorded_at > $1
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        let records = rows
            .iter()
            .map(|row| ActionRecord {
                agent_id: row.get("agent_id"),
                region: row.get("region"),
                action: row.get("action"),
                priority: row.get("priority"),
                status: row.get("status"),
                timestamp: row.get("recorded_at"),
            })
            .collect();

        Ok(records)
    }

    async fn recent_assistance(&self, hours: i64) -> Result<Vec<AssistanceRequest>> {
        let cutoff = window_start(hours);
        let rows = sqlx::query(
            r#"
            SELECT request_id, from_agent, to_agent, message, kind, recorded_at
            FROM assistance_requests
            WHERE recorded_at > $1
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        let requests = rows
            .iter()
            .map(|row| AssistanceRequest {
                id: row.get("request_id"),
                from_agent: row.get("from_agent"),
                to_agent: row.get("to_agent"),
                message: row.get("message"),
                kind: row.get("kind"),
                timestamp: row.get("recorded_at"),
            })
            .collect();

        Ok(requests)
    }
}

#[async_trait]
impl AssistanceLog for PostgresStore {
    async fn record(&self, request: AssistanceRequest) {
        // Fire-and-forget: a failed audit write must not fail the cycle.
        if let Err(e) = self.save_assistance(&request).await {
            warn!(
                from_agent = %request.from_agent,
                to_agent = %request.to_agent,
                error = %e,
                "Failed to persist assistance request"
            );
        }
    }
}
