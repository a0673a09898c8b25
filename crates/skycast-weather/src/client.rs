//! OpenWeatherMap HTTP client.

use std::time::Duration;

use serde::Deserialize;
use tracing::instrument;

use skycast_core::Units;

use crate::types::{
    CurrentConditions, CurrentPayload, ForecastPayload, ForecastResponse, WeatherError,
};

const API_BASE: &str = "https://api.openweathermap.org/data/2.5";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Error body OpenWeatherMap attaches to non-success responses.
#[derive(Debug, Deserialize)]
struct ProviderError {
    message: Option<String>,
}

/// Client for the two provider endpoints the server uses.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    api_key: String,
    units: Units,
    base_url: String,
}

impl WeatherClient {
    /// Create a client against the production API.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::Network`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(api_key: impl Into<String>, units: Units) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, units, API_BASE)
    }

    /// Create a client against an alternate base URL (used by tests to point
    /// at a mock server).
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::Network`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn with_base_url(
        api_key: impl Into<String>,
        units: Units,
        base_url: impl Into<String>,
    ) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            units,
            base_url: base_url.into(),
        })
    }

    /// Fetch current conditions for a location.
    ///
    /// # Errors
    ///
    /// `LocationNotFound` for a 404, `Api` for any other non-success status,
    /// `Network` for transport failures, `Parse` for malformed bodies.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_current(&self, location: &str) -> Result<CurrentConditions, WeatherError> {
        let body = self.get("weather", location).await?;
        let payload: CurrentPayload =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;
        payload.try_into()
    }

    /// Fetch the 3-hour-interval forecast for a location.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`WeatherClient::fetch_current`].
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(&self, location: &str) -> Result<ForecastResponse, WeatherError> {
        let body = self.get("forecast", location).await?;
        let payload: ForecastPayload =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;
        payload.try_into()
    }

    /// Issue one GET and map the status before handing back the body text.
    async fn get(&self, endpoint: &str, location: &str) -> Result<String, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(WeatherError::LocationNotFound(location.to_string()));
        }

        if !status.is_success() {
            let message = serde_json::from_str::<ProviderError>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| body.clone());
            tracing::warn!(status = status.as_u16(), %message, "provider request failed");
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}
