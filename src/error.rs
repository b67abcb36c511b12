use thiserror::Error;

/// Main error type for the monitoring service
#[derive(Error, Debug)]
pub enum StormError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Classifier model errors
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Invalid model file: {0}")]
    InvalidModelFile(String),

    // Registry errors
    #[error("Agent already registered: {agent_id}")]
    AgentAlreadyRegistered { agent_id: String },

    // Per-agent cycle errors
    #[error("Component failure: {component} - {reason}")]
    ComponentFailure { component: String, reason: String },

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for StormError
pub type Result<T> = std::result::Result<T, StormError>;
