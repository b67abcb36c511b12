//! Weather data acquisition.
//!
//! Providers sit outside the monitoring core behind one contract:
//! `obtain(region)` always hands back a snapshot. The live OpenWeatherMap
//! client degrades to the simulated scenarios on any failure, so agents
//! never see a provider error.

pub mod openweather;
pub mod simulated;

pub use openweather::OpenWeatherProvider;
pub use simulated::SimulatedProvider;

use async_trait::async_trait;
use tracing::info;

use crate::config::ProviderConfig;
use crate::domain::WeatherSnapshot;
use crate::error::Result;

/// Snapshot acquisition contract. Infallible: on internal failure an
/// implementation returns a best-effort synthetic snapshot tagged with
/// its origin.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn obtain(&self, region: &str) -> WeatherSnapshot;
}

/// Build the provider selected by configuration: live OpenWeatherMap when
/// an API key is available, simulated scenarios otherwise.
pub fn from_config(config: &ProviderConfig, api_key: Option<String>) -> Result<Box<dyn WeatherProvider>> {
    match api_key {
        Some(key) => {
            info!(base_url = %config.base_url, "Using OpenWeatherMap provider");
            Ok(Box::new(OpenWeatherProvider::new(config, key)?))
        }
        None => {
            info!("No weather API key configured, using simulated provider");
            Ok(Box::new(SimulatedProvider::new()))
        }
    }
}
