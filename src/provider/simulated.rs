//! Synthetic weather scenarios.
//!
//! Region-keyed baselines with a little uniform jitter, so repeated
//! rounds look like live readings while each region keeps a stable risk
//! profile. Unknown regions borrow the quiet inland-valley baseline.

use async_trait::async_trait;
use rand::Rng;

use crate::domain::WeatherSnapshot;

use super::WeatherProvider;

/// (temperature, humidity, wind_speed, rainfall, pressure)
type Baseline = (f64, f64, f64, f64, f64);

const COASTAL_CITY: Baseline = (28.0, 85.0, 65.0, 50.0, 1000.0);
const MOUNTAIN_REGION: Baseline = (15.0, 70.0, 45.0, 100.0, 950.0);
const INLAND_VALLEY: Baseline = (25.0, 60.0, 15.0, 5.0, 1010.0);
const NEW_YORK: Baseline = (10.0, 65.0, 20.0, 15.0, 1015.0);
const LONDON: Baseline = (8.0, 70.0, 25.0, 10.0, 1012.0);

/// Jitter amplitudes, small enough that no scenario crosses a
/// classification threshold
const TEMP_JITTER: f64 = 1.0;
const HUMIDITY_JITTER: f64 = 2.0;
const WIND_JITTER: f64 = 2.0;
const RAIN_JITTER: f64 = 2.0;
const PRESSURE_JITTER: f64 = 3.0;

#[derive(Debug, Clone, Copy)]
pub struct SimulatedProvider {
    jitter: bool,
}

impl SimulatedProvider {
    pub fn new() -> Self {
        Self { jitter: true }
    }

    /// Exact baselines, no jitter. Useful where tests compare fields.
    pub fn steady() -> Self {
        Self { jitter: false }
    }

    fn baseline(region: &str) -> Baseline {
        match region.to_lowercase().as_str() {
            "coastal_city" => COASTAL_CITY,
            "mountain_region" => MOUNTAIN_REGION,
            "inland_valley" => INLAND_VALLEY,
            "new_york" | "new york" => NEW_YORK,
            "london" => LONDON,
            _ => INLAND_VALLEY,
        }
    }

    fn reading(&self, region: &str) -> WeatherSnapshot {
        let (temp, humidity, wind, rain, pressure) = Self::baseline(region);

        if !self.jitter {
            return WeatherSnapshot::new(region, temp, humidity, wind, rain, pressure, "simulated");
        }

        let mut rng = rand::thread_rng();
        WeatherSnapshot::new(
            region,
            temp + rng.gen_range(-TEMP_JITTER..=TEMP_JITTER),
            (humidity + rng.gen_range(-HUMIDITY_JITTER..=HUMIDITY_JITTER)).clamp(0.0, 100.0),
            (wind + rng.gen_range(-WIND_JITTER..=WIND_JITTER)).max(0.0),
            (rain + rng.gen_range(-RAIN_JITTER..=RAIN_JITTER)).max(0.0),
            pressure + rng.gen_range(-PRESSURE_JITTER..=PRESSURE_JITTER),
            "simulated",
        )
    }
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherProvider for SimulatedProvider {
    async fn obtain(&self, region: &str) -> WeatherSnapshot {
        self.reading(region)
    }
}
