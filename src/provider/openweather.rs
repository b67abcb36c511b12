//! OpenWeatherMap client.
//!
//! Current-weather endpoint, metric units, bounded request timeout. Wind
//! arrives in m/s and is converted to km/h; rainfall uses the one-hour
//! accumulation field when the response carries one. Every failure path
//! ends in the simulated scenario for the region, never in an error.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::domain::WeatherSnapshot;
use crate::error::Result;

use super::simulated::SimulatedProvider;
use super::WeatherProvider;

const MPS_TO_KMH: f64 = 3.6;

pub struct OpenWeatherProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    fallback: SimulatedProvider,
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: OwmMain,
    #[serde(default)]
    wind: OwmWind,
    #[serde(default)]
    rain: OwmRain,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwmWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwmRain {
    #[serde(rename = "1h", default)]
    one_hour: f64,
}

impl OpenWeatherProvider {
    pub fn new(config: &ProviderConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key,
            fallback: SimulatedProvider::new(),
        })
    }

    async fn fetch(&self, region: &str) -> Result<WeatherSnapshot> {
        debug!(region = %region, "Fetching current weather");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", region), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?
            .error_for_status()?;

        let data: OwmResponse = response.json().await?;

        Ok(WeatherSnapshot::new(
            region,
            data.main.temp,
            data.main.humidity,
            data.wind.speed * MPS_TO_KMH,
            data.rain.one_hour,
            data.main.pressure,
            "openweathermap",
        ))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn obtain(&self, region: &str) -> WeatherSnapshot {
        match self.fetch(region).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    region = %region,
                    error = %e,
                    "Weather API request failed, using simulated reading"
                );
                self.fallback.obtain(region).await
            }
        }
    }
}
