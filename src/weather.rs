//! Weather adapter
//!
//! Fetches current conditions (imperial units) for a coordinate pair and
//! renders the one-sentence summary the chatbot replies with. Any failure
//! collapses to a single generic sentence; causes are not distinguished.

use crate::geo::Coordinates;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/3.0/onecall";

/// Wind speeds strictly above this (mph) are reported as windy
const WINDY_THRESHOLD: f64 = 10.0;

/// Reply used for any weather lookup failure
pub const FAILURE_SENTENCE: &str =
    "Sorry, I couldn't find the weather for the provided coordinates.";

/// Current conditions at a location
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub temp_f: f64,
    pub description: String,
    pub wind_speed: f64,
}

impl Observation {
    pub fn is_windy(&self) -> bool {
        self.wind_speed > WINDY_THRESHOLD
    }

    /// Human-readable summary sentence
    pub fn to_sentence(&self) -> String {
        let windy_status = if self.is_windy() {
            "It's windy"
        } else {
            "It's not windy"
        };
        format!(
            "The current temperature is {}°F with {}. {}.",
            self.temp_f, self.description, windy_status
        )
    }
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather service returned HTTP {0}")]
    Status(StatusCode),
    #[error("weather request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Coordinates to current-conditions lookup
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, coords: Coordinates) -> Result<Observation, WeatherError>;
}

/// Provider backed by the OpenWeather one-call API
pub struct OpenWeatherProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: Option<&str>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).to_string(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, coords: Coordinates) -> Result<Observation, WeatherError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", coords.lat.to_string()),
                ("lon", coords.lon.to_string()),
                ("units", "imperial".to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status));
        }

        let body: OneCallResponse = response.json().await?;

        let description = body
            .current
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .unwrap_or_default();

        Ok(Observation {
            temp_f: body.current.temp,
            description,
            wind_speed: body.current.wind_speed,
        })
    }
}

// One-call API wire types

#[derive(Debug, Deserialize)]
struct OneCallResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temp: f64,
    wind_speed: f64,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}
