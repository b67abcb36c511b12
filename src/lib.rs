pub mod agents;
pub mod api;
pub mod assistance;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod error;
pub mod ml;
pub mod persistence;
pub mod planner;
pub mod provider;
pub mod report;

pub use agents::{AgentRecord, CyclePhase, MonitorAgent, RegionalAgent};
pub use assistance::{AssistanceLog, AssistanceRequest};
pub use classifier::{NeuralClassifier, RiskClassifier, RuleClassifier};
pub use config::AppConfig;
pub use coordinator::{Coordinator, GlobalStatus, RoundReport};
pub use domain::{
    ActionItem, ActionPriority, Condition, ModelTag, MonitoringResult, RiskAssessment,
    WeatherSnapshot,
};
pub use error::{Result, StormError};
pub use persistence::{MemoryStore, PostgresStore, RecordStore};
pub use provider::{OpenWeatherProvider, SimulatedProvider, WeatherProvider};
pub use report::SummaryReport;
