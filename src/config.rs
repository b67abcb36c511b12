use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub coordinator: CoordinatorConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoordinatorConfig {
    /// Regions to monitor, one agent per region
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,
    /// Seconds between rounds in watch mode
    #[serde(default = "default_round_interval")]
    pub round_interval_secs: u64,
}

fn default_regions() -> Vec<String> {
    vec![
        "coastal_city".to_string(),
        "mountain_region".to_string(),
        "inland_valley".to_string(),
    ]
}

fn default_round_interval() -> u64 {
    300
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            regions: default_regions(),
            round_interval_secs: default_round_interval(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Enable the learned model variant (falls back to rules when the
    /// model file is missing or invalid)
    #[serde(default)]
    pub use_model: bool,
    /// Path to the JSON model file
    #[serde(default = "default_model_path")]
    pub model_path: String,
}

fn default_model_path() -> String {
    "models/risk_classifier.json".to_string()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            use_model: false,
            model_path: default_model_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// OpenWeatherMap API key; when unset the simulated provider is used.
    /// Also read from the OPENWEATHER_API_KEY environment variable.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Current-weather endpoint
    #[serde(default = "default_weather_url")]
    pub base_url: String,
    /// HTTP request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

fn default_weather_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_provider_timeout() -> u64 {
    5
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_url(),
            timeout_secs: default_provider_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Enable PostgreSQL persistence; disabled runs fully in memory
    #[serde(default)]
    pub enabled: bool,
    /// PostgreSQL connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url() -> String {
    "postgres://localhost/stormwatch".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Serve the read-only HTTP API in watch mode
    #[serde(default = "default_api_enabled")]
    pub enabled: bool,
    /// Bind address
    #[serde(default = "default_api_bind")]
    pub bind: String,
    /// Listen port
    #[serde(default = "default_api_port")]
    pub port: u16,
}

fn default_api_enabled() -> bool {
    true
}

fn default_api_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    8080
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: default_api_enabled(),
            bind: default_api_bind(),
            port: default_api_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("coordinator.round_interval_secs", 300)?
            .set_default("database.max_connections", 5)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("STORMWATCH_ENV")
                        .unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (STORMWATCH_DATABASE__URL, etc.)
            .add_source(
                Environment::with_prefix("STORMWATCH")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Resolved OpenWeatherMap key: config value first, then the
    /// conventional environment variable
    pub fn weather_api_key(&self) -> Option<String> {
        self.provider
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("OPENWEATHER_API_KEY").ok().filter(|k| !k.is_empty()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.coordinator.regions.is_empty() {
            errors.push("coordinator.regions must not be empty".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        for region in &self.coordinator.regions {
            if region.trim().is_empty() {
                errors.push("coordinator.regions contains an empty region name".to_string());
            }
            if !seen.insert(region.as_str()) {
                errors.push(format!("coordinator.regions contains duplicate region: {region}"));
            }
        }

        if self.coordinator.round_interval_secs == 0 {
            errors.push("coordinator.round_interval_secs must be positive".to_string());
        }

        if self.classifier.use_model && self.classifier.model_path.trim().is_empty() {
            errors.push("classifier.model_path must be set when use_model is enabled".to_string());
        }

        if self.provider.timeout_secs == 0 {
            errors.push("provider.timeout_secs must be positive".to_string());
        }

        if self.database.enabled && self.database.url.trim().is_empty() {
            errors.push("database.url must be set when database is enabled".to_string());
        }

        if self.database.max_connections == 0 {
            errors.push("database.max_connections must be positive".to_string());
        }

        if self.api.enabled && self.api.port == 0 {
            errors.push("api.port must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
