//! Seasonal signal providers
//!
//! The seasonal rule keys off an external weather-like signal. Providers
//! are pluggable so the engine never hard-codes one and tests can force
//! each branch deterministically.

use async_trait::async_trait;

use crate::utils::{AppError, AppResult};

/// The enumerated signal the seasonal rule understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherKind {
    Hot,
    Cold,
    Rainy,
    Other,
}

#[async_trait]
pub trait SeasonalSignal: Send + Sync {
    async fn current_condition(&self) -> AppResult<WeatherKind>;
}

// ========== Random placeholder ==========

/// Placeholder provider: picks a condition at random.
///
/// Default wiring when no weather API is configured.
pub struct RandomSignal;

fn pick_random() -> WeatherKind {
    use rand::seq::SliceRandom;

    const ALL: [WeatherKind; 4] = [
        WeatherKind::Hot,
        WeatherKind::Cold,
        WeatherKind::Rainy,
        WeatherKind::Other,
    ];
    ALL.choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(WeatherKind::Other)
}

#[async_trait]
impl SeasonalSignal for RandomSignal {
    async fn current_condition(&self) -> AppResult<WeatherKind> {
        Ok(pick_random())
    }
}

// ========== Fixed ==========

/// Always reports the same condition. Used by tests and by the
/// `WEATHER_PROVIDER=hot|cold|rainy|other` configuration.
pub struct FixedSignal(pub WeatherKind);

#[async_trait]
impl SeasonalSignal for FixedSignal {
    async fn current_condition(&self) -> AppResult<WeatherKind> {
        Ok(self.0)
    }
}

// ========== OpenWeather ==========

/// Live provider backed by the OpenWeather current-conditions API
pub struct OpenWeatherSignal {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    city: String,
}

#[derive(Debug, serde::Deserialize)]
struct WeatherResponse {
    main: WeatherMain,
    #[serde(default)]
    weather: Vec<WeatherCondition>,
}

#[derive(Debug, serde::Deserialize)]
struct WeatherMain {
    temp: f64,
}

#[derive(Debug, serde::Deserialize)]
struct WeatherCondition {
    main: String,
}

impl OpenWeatherSignal {
    pub fn new(api_key: impl Into<String>, city: impl Into<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("HTTP client builder failed ({e}), using defaults");
                reqwest::Client::new()
            });
        Self {
            client,
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            api_key: api_key.into(),
            city: city.into(),
        }
    }
}

/// Map a metric temperature and condition group onto the signal set
fn classify(temp_celsius: f64, condition: &str) -> WeatherKind {
    if matches!(condition, "Rain" | "Drizzle" | "Thunderstorm") {
        WeatherKind::Rainy
    } else if temp_celsius >= 30.0 {
        WeatherKind::Hot
    } else if temp_celsius <= 15.0 {
        WeatherKind::Cold
    } else {
        WeatherKind::Other
    }
}

#[async_trait]
impl SeasonalSignal for OpenWeatherSignal {
    async fn current_condition(&self) -> AppResult<WeatherKind> {
        let url = format!(
            "{}/weather?q={}&appid={}&units=metric",
            self.base_url, self.city, self.api_key
        );
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::remote(format!(
                "Weather API returned {}",
                response.status()
            )));
        }

        let body: WeatherResponse = response
            .json()
            .await
            .map_err(|e| AppError::remote(format!("Weather response parse failed: {}", e)))?;
        let condition = body.weather.first().map(|c| c.main.as_str()).unwrap_or("");
        Ok(classify(body.main.temp, condition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_maps_temperature_bands() {
        assert_eq!(classify(35.0, "Clear"), WeatherKind::Hot);
        assert_eq!(classify(30.0, "Clear"), WeatherKind::Hot);
        assert_eq!(classify(10.0, "Clouds"), WeatherKind::Cold);
        assert_eq!(classify(22.0, "Clear"), WeatherKind::Other);
    }

    #[test]
    fn precipitation_wins_over_temperature() {
        assert_eq!(classify(35.0, "Rain"), WeatherKind::Rainy);
        assert_eq!(classify(5.0, "Thunderstorm"), WeatherKind::Rainy);
    }

    #[tokio::test]
    async fn fixed_signal_is_deterministic() {
        let signal = FixedSignal(WeatherKind::Cold);
        assert_eq!(signal.current_condition().await.unwrap(), WeatherKind::Cold);
    }
}
