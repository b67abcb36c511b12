use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Physical bounds used when sanitizing raw readings.
/// NaN collapses to the lower bound, infinities clamp like any
/// out-of-range value.
const TEMPERATURE_RANGE: (f64, f64) = (-90.0, 60.0);
const HUMIDITY_RANGE: (f64, f64) = (0.0, 100.0);
const WIND_SPEED_RANGE: (f64, f64) = (0.0, 500.0);
const RAINFALL_RANGE: (f64, f64) = (0.0, 1000.0);
const PRESSURE_RANGE: (f64, f64) = (850.0, 1100.0);

/// One environmental reading for a region, immutable once produced.
///
/// Units: temperature in degrees Celsius, humidity in percent, wind speed
/// in km/h, rainfall in mm, pressure in hPa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub region: String,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub rainfall: f64,
    pub pressure: f64,
    pub timestamp: DateTime<Utc>,
    /// Origin of the reading ("openweathermap" or "simulated")
    pub source: String,
}

impl WeatherSnapshot {
    pub fn new(
        region: impl Into<String>,
        temperature: f64,
        humidity: f64,
        wind_speed: f64,
        rainfall: f64,
        pressure: f64,
        source: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            temperature,
            humidity,
            wind_speed,
            rainfall,
            pressure,
            timestamp: Utc::now(),
            source: source.into(),
        }
    }

    /// Copy with every field forced into its physical range.
    ///
    /// Classifiers call this before applying rules so that NaN or
    /// out-of-range readings can never surface as an error.
    pub fn sanitized(&self) -> Self {
        Self {
            region: self.region.clone(),
            temperature: clamp_field(self.temperature, TEMPERATURE_RANGE),
            humidity: clamp_field(self.humidity, HUMIDITY_RANGE),
            wind_speed: clamp_field(self.wind_speed, WIND_SPEED_RANGE),
            rainfall: clamp_field(self.rainfall, RAINFALL_RANGE),
            pressure: clamp_field(self.pressure, PRESSURE_RANGE),
            timestamp: self.timestamp,
            source: self.source.clone(),
        }
    }

    /// True when every field already sits inside its physical range
    pub fn is_sane(&self) -> bool {
        in_range(self.temperature, TEMPERATURE_RANGE)
            && in_range(self.humidity, HUMIDITY_RANGE)
            && in_range(self.wind_speed, WIND_SPEED_RANGE)
            && in_range(self.rainfall, RAINFALL_RANGE)
            && in_range(self.pressure, PRESSURE_RANGE)
    }
}

fn clamp_field(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if value.is_nan() {
        lo
    } else {
        value.clamp(lo, hi)
    }
}

fn in_range(value: f64, (lo, hi): (f64, f64)) -> bool {
    value.is_finite() && value >= lo && value <= hi
}
