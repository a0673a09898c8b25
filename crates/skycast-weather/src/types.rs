//! Provider data model.
//!
//! The OpenWeatherMap wire shapes are deserialized into the `*Payload`
//! structs and immediately converted into the tidier domain types below.
//! Conversion fails with [`WeatherError::Parse`] when a payload is missing
//! the pieces we need (for example an empty `weather` array), so malformed
//! responses are rejected at the fetch boundary instead of surfacing later
//! as formatting failures.

use serde::Deserialize;
use thiserror::Error;

/// Weather provider errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("location not found: {0}")]
    LocationNotFound(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed provider response: {0}")]
    Parse(String),

    #[error("provider error: {status} - {message}")]
    Api { status: u16, message: String },
}

// ---------------------------------------------------------------------------
// Wire shapes (OpenWeatherMap JSON)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ConditionPayload {
    pub id: u32,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct WindPayload {
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
pub struct RainPayload {
    #[serde(rename = "3h")]
    pub volume_3h: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CurrentMainPayload {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
}

/// `/data/2.5/weather` response.
#[derive(Debug, Deserialize)]
pub struct CurrentPayload {
    pub name: String,
    pub main: CurrentMainPayload,
    pub wind: WindPayload,
    pub weather: Vec<ConditionPayload>,
}

#[derive(Debug, Deserialize)]
pub struct SampleMainPayload {
    pub temp_min: f64,
    pub temp_max: f64,
}

/// One 3-hour forecast entry.
#[derive(Debug, Deserialize)]
pub struct SamplePayload {
    pub dt: i64,
    pub main: SampleMainPayload,
    pub weather: Vec<ConditionPayload>,
    pub wind: WindPayload,
    pub rain: Option<RainPayload>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastCityPayload {
    pub name: String,
}

/// `/data/2.5/forecast` response.
#[derive(Debug, Deserialize)]
pub struct ForecastPayload {
    pub city: ForecastCityPayload,
    pub list: Vec<SamplePayload>,
}

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

/// Current conditions for one city.
#[derive(Debug, Clone)]
pub struct CurrentConditions {
    pub city: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub condition_code: u32,
    pub condition_text: String,
}

impl TryFrom<CurrentPayload> for CurrentConditions {
    type Error = WeatherError;

    fn try_from(payload: CurrentPayload) -> Result<Self, Self::Error> {
        let condition = payload
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Parse("current weather has no condition".to_string()))?;

        Ok(Self {
            city: payload.name,
            temperature: payload.main.temp,
            feels_like: payload.main.feels_like,
            humidity: payload.main.humidity,
            wind_speed: payload.wind.speed,
            condition_code: condition.id,
            condition_text: condition.description,
        })
    }
}

/// One provider-reported 3-hour observation, immutable once parsed.
#[derive(Debug, Clone)]
pub struct RawSample {
    /// Observation time, unix seconds UTC.
    pub timestamp: i64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub condition_code: u32,
    pub condition_text: String,
    pub wind_speed: f64,
    /// Precipitation volume over the 3-hour window, when reported.
    pub rain_3h: Option<f64>,
}

impl TryFrom<SamplePayload> for RawSample {
    type Error = WeatherError;

    fn try_from(payload: SamplePayload) -> Result<Self, Self::Error> {
        let condition = payload
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Parse("forecast sample has no condition".to_string()))?;

        Ok(Self {
            timestamp: payload.dt,
            temp_min: payload.main.temp_min,
            temp_max: payload.main.temp_max,
            condition_code: condition.id,
            condition_text: condition.description,
            wind_speed: payload.wind.speed,
            rain_3h: payload.rain.and_then(|r| r.volume_3h),
        })
    }
}

/// Forecast samples for one city, in the provider's chronological order.
#[derive(Debug, Clone)]
pub struct ForecastResponse {
    pub city: String,
    pub samples: Vec<RawSample>,
}

impl TryFrom<ForecastPayload> for ForecastResponse {
    type Error = WeatherError;

    fn try_from(payload: ForecastPayload) -> Result<Self, Self::Error> {
        let samples = payload
            .list
            .into_iter()
            .map(RawSample::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            city: payload.city.name,
            samples,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn current_payload_converts() {
        let json = serde_json::json!({
            "name": "London",
            "main": {"temp": 15.4, "feels_like": 14.8, "humidity": 72},
            "wind": {"speed": 4.1},
            "weather": [{"id": 803, "description": "broken clouds"}]
        });
        let payload: CurrentPayload = serde_json::from_value(json).unwrap();
        let current = CurrentConditions::try_from(payload).unwrap();

        assert_eq!(current.city, "London");
        assert_eq!(current.condition_code, 803);
        assert_eq!(current.condition_text, "broken clouds");
        assert_eq!(current.humidity, 72);
    }

    #[test]
    fn empty_condition_array_is_a_parse_error() {
        let json = serde_json::json!({
            "name": "London",
            "main": {"temp": 15.4, "feels_like": 14.8, "humidity": 72},
            "wind": {"speed": 4.1},
            "weather": []
        });
        let payload: CurrentPayload = serde_json::from_value(json).unwrap();
        let err = CurrentConditions::try_from(payload).unwrap_err();
        assert!(matches!(err, WeatherError::Parse(_)));
    }

    #[test]
    fn forecast_sample_keeps_optional_rain() {
        let json = serde_json::json!({
            "city": {"name": "Bergen"},
            "list": [
                {
                    "dt": 1756450800,
                    "main": {"temp_min": 10.0, "temp_max": 13.0},
                    "weather": [{"id": 500, "description": "light rain"}],
                    "wind": {"speed": 5.0},
                    "rain": {"3h": 1.2}
                },
                {
                    "dt": 1756461600,
                    "main": {"temp_min": 9.0, "temp_max": 14.0},
                    "weather": [{"id": 803, "description": "broken clouds"}],
                    "wind": {"speed": 3.0}
                }
            ]
        });
        let payload: ForecastPayload = serde_json::from_value(json).unwrap();
        let forecast = ForecastResponse::try_from(payload).unwrap();

        assert_eq!(forecast.city, "Bergen");
        assert_eq!(forecast.samples.len(), 2);
        assert_eq!(forecast.samples[0].rain_3h, Some(1.2));
        assert_eq!(forecast.samples[1].rain_3h, None);
    }
}
