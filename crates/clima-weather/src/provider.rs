//! Weatherbit current-conditions client.

use async_trait::async_trait;
use clima_core::{ReqwestErrorExt, WeatherConfig};
use reqwest::Client;
use serde::Deserialize;

use crate::types::{Coordinates, Observation, ProviderFailure};

/// Source of current weather conditions for a coordinate pair.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetch the current observation at `coordinates`.
    async fn current(&self, coordinates: Coordinates) -> Result<Observation, ProviderFailure>;
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    data: Vec<CurrentObservation>,
}

#[derive(Debug, Deserialize)]
struct CurrentObservation {
    temp: f64,
    rh: f64,
    weather: ConditionBlock,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    description: String,
}

/// HTTP client for `GET /current` of the Weatherbit v2.0 API.
#[derive(Debug, Clone)]
pub struct WeatherbitProvider {
    client: Client,
    base_url: String,
    api_key: String,
    units: String,
    lang: String,
}

impl WeatherbitProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, ProviderFailure> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| e.into_provider_failure())?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            units: config.units.clone(),
            lang: config.lang.clone(),
        })
    }

    fn current_url(&self) -> String {
        format!("{}/current", self.base_url)
    }

    fn parse_current(body: &[u8]) -> Result<Observation, ProviderFailure> {
        let response: CurrentResponse = serde_json::from_slice(body)
            .map_err(|e| ProviderFailure::Malformed(e.to_string()))?;

        let first = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ProviderFailure::Malformed("No observations in response".to_string()))?;

        Ok(Observation {
            temperature: first.temp,
            relative_humidity: first.rh,
            description: first.weather.description,
        })
    }
}

#[async_trait]
impl WeatherSource for WeatherbitProvider {
    async fn current(&self, coordinates: Coordinates) -> Result<Observation, ProviderFailure> {
        tracing::info!(
            "Requesting Weatherbit conditions for {}, {}",
            coordinates.latitude,
            coordinates.longitude
        );

        let response = self
            .client
            .get(self.current_url())
            .query(&[
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("key", self.api_key.clone()),
                ("units", self.units.clone()),
                ("lang", self.lang.clone()),
            ])
            .send()
            .await
            .map_err(|e| e.into_provider_failure())?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Weatherbit returned status {}: {}", status, body);
            return Err(ProviderFailure::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| e.into_provider_failure())?;

        let observation = Self::parse_current(&body)?;
        tracing::debug!("Weatherbit observation: {:?}", observation);
        Ok(observation)
    }
}
