use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tokio::time::{interval, Duration};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use stormwatch::agents::RegionalAgent;
use stormwatch::api::{self, ApiState};
use stormwatch::assistance::AssistanceLog;
use stormwatch::classifier::{self, RiskClassifier};
use stormwatch::cli::{Cli, Commands};
use stormwatch::config::{AppConfig, LoggingConfig};
use stormwatch::coordinator::{shared_round, Coordinator};
use stormwatch::error::{Result, StormError};
use stormwatch::persistence::{MemoryStore, PostgresStore, RecordStore};
use stormwatch::provider::{self, WeatherProvider};
use stormwatch::report::{self, SummaryReport};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Round { pretty }) => {
            let config = load_config(&cli.config)?;
            init_logging(&config.logging);
            run_round(config, pretty).await?;
        }
        Some(Commands::Watch { interval }) => {
            let config = load_config(&cli.config)?;
            init_logging(&config.logging);
            run_watch(config, interval).await?;
        }
        Some(Commands::Status) => {
            init_logging_simple();
            let config = load_config(&cli.config)?;
            run_status(config).await?;
        }
        Some(Commands::Report) => {
            init_logging_simple();
            let config = load_config(&cli.config)?;
            run_report(config).await?;
        }
        None => {
            let config = load_config(&cli.config)?;
            init_logging(&config.logging);
            run_watch(config, None).await?;
        }
    }

    Ok(())
}

fn load_config(config_dir: &str) -> Result<AppConfig> {
    let config = AppConfig::load_from(config_dir)?;
    config
        .validate()
        .map_err(|problems| StormError::Validation(problems.join("; ")))?;
    Ok(config)
}

/// Postgres when enabled and reachable, in-memory otherwise. The same
/// store serves as the assistance log.
async fn connect_store(config: &AppConfig) -> (Arc<dyn RecordStore>, Arc<dyn AssistanceLog>) {
    if config.database.enabled {
        match PostgresStore::connect(&config.database).await {
            Ok(store) => {
                info!("Connected to PostgreSQL store");
                let store = Arc::new(store);
                return (
                    store.clone() as Arc<dyn RecordStore>,
                    store as Arc<dyn AssistanceLog>,
                );
            }
            Err(e) => {
                warn!(error = %e, "Database unavailable, using in-memory store");
            }
        }
    }
    let store = Arc::new(MemoryStore::new());
    (
        store.clone() as Arc<dyn RecordStore>,
        store as Arc<dyn AssistanceLog>,
    )
}

/// One agent per configured region, registered in config order
fn build_coordinator(
    config: &AppConfig,
    store: Arc<dyn RecordStore>,
    assistance: Arc<dyn AssistanceLog>,
) -> Result<Coordinator> {
    let provider: Arc<dyn WeatherProvider> =
        Arc::from(provider::from_config(&config.provider, config.weather_api_key())?);
    let classifier: Arc<dyn RiskClassifier> =
        Arc::from(classifier::from_config(&config.classifier));

    let mut coordinator = Coordinator::new();
    for (i, region) in config.coordinator.regions.iter().enumerate() {
        let agent_id = format!("AGENT_{}_{}", i + 1, region.to_uppercase());
        let agent = RegionalAgent::new(
            agent_id,
            region.as_str(),
            provider.clone(),
            classifier.clone(),
            store.clone(),
            assistance.clone(),
        );
        coordinator.register(Box::new(agent))?;
    }

    info!(agents = coordinator.agent_count(), "Coordinator ready");
    Ok(coordinator)
}

async fn run_round(config: AppConfig, pretty: bool) -> Result<()> {
    let (store, assistance) = connect_store(&config).await;
    let mut coordinator = build_coordinator(&config, store, assistance)?;

    let round = coordinator.coordinate_round().await;
    let json = if pretty {
        serde_json::to_string_pretty(&round)?
    } else {
        serde_json::to_string(&round)?
    };
    println!("{json}");
    Ok(())
}

async fn run_status(config: AppConfig) -> Result<()> {
    let (store, assistance) = connect_store(&config).await;
    let mut coordinator = build_coordinator(&config, store.clone(), assistance)?;

    let round = coordinator.coordinate_round().await;
    let assistance_count = store.recent_assistance(24).await.map(|r| r.len()).unwrap_or(0);
    let summary = SummaryReport::build(&coordinator.agent_records(), Some(&round), assistance_count);

    println!("{}", report::status_table(&summary));
    if !summary.global.is_calm() {
        let regions: Vec<String> = summary.global.high_risk_regions.iter().cloned().collect();
        let alerts: Vec<String> = summary
            .global
            .active_alerts
            .iter()
            .map(|c| c.to_string())
            .collect();
        println!();
        println!("High-risk regions: {}", regions.join(", "));
        println!("Active alerts: {}", alerts.join(", "));
    }
    Ok(())
}

async fn run_report(config: AppConfig) -> Result<()> {
    let (store, assistance) = connect_store(&config).await;
    let mut coordinator = build_coordinator(&config, store.clone(), assistance)?;

    let round = coordinator.coordinate_round().await;
    let assistance_count = store.recent_assistance(24).await.map(|r| r.len()).unwrap_or(0);
    let summary = SummaryReport::build(&coordinator.agent_records(), Some(&round), assistance_count);

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn run_watch(config: AppConfig, interval_override: Option<u64>) -> Result<()> {
    let (store, assistance) = connect_store(&config).await;
    let mut coordinator = build_coordinator(&config, store.clone(), assistance)?;

    let latest_round = shared_round();
    let api_state = ApiState::new(latest_round.clone(), store.clone());

    let api_handle = if config.api.enabled {
        let state = api_state.clone();
        let bind = config.api.bind.clone();
        let port = config.api.port;
        Some(tokio::spawn(async move {
            if let Err(e) = api::serve(state, &bind, port).await {
                error!(error = %e, "API server stopped");
            }
        }))
    } else {
        None
    };

    let interval_secs = interval_override
        .unwrap_or(config.coordinator.round_interval_secs)
        .max(1);
    let mut ticker = interval(Duration::from_secs(interval_secs));

    info!(
        interval_secs = interval_secs,
        api_enabled = config.api.enabled,
        "Watch loop running. Press Ctrl+C to stop."
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let round = coordinator.coordinate_round().await;
                api_state.publish_agents(coordinator.agent_records()).await;
                *latest_round.write().await = Some(round);
            }
            _ = shutdown_signal() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    if let Some(handle) = api_handle {
        handle.abort();
    }

    info!("Shutdown complete");
    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("info,stormwatch={},sqlx=warn", config.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn init_logging_simple() {
    // Minimal logging so table and JSON output stay clean
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .try_init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
