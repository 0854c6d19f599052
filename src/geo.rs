//! Geocoding adapter
//!
//! Resolves a free-text city name to coordinates through the Maps geocode
//! JSON API. Any non-OK status collapses to an error the dispatcher renders
//! as "couldn't find the coordinates"; there are no retries.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Resolved location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Error)]
pub enum GeoError {
    /// The service answered with a status other than "OK"
    #[error("geocoding service returned status {0}")]
    Status(String),
    #[error("geocoding response contained no results")]
    NoResults,
    #[error("geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// City-name to coordinates resolution
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, city: &str) -> Result<Coordinates, GeoError>;
}

/// Geocoder backed by the Google Maps geocode API
pub struct GoogleGeocoder {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleGeocoder {
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
impl Geocoder for GoogleGeocoder {
    async fn resolve(&self, city: &str) -> Result<Coordinates, GeoError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("address", city), ("key", &self.api_key)])
            .send()
            .await?;

        let body: GeocodeResponse = response.json().await?;

        if body.status != "OK" {
            return Err(GeoError::Status(body.status));
        }

        let location = body
            .results
            .into_iter()
            .next()
            .ok_or(GeoError::NoResults)?
            .geometry
            .location;

        Ok(Coordinates {
            lat: location.lat,
            lon: location.lng,
        })
    }
}

// Maps geocode API wire types

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}
