//! Tool and resource catalog.

use serde_json::{json, Value};

pub const GET_CURRENT_WEATHER: &str = "get_current_weather";
pub const GET_WEATHER_FORECAST: &str = "get_weather_forecast";

/// URI of the static setup/usage document.
pub const DOCS_URI: &str = "weather://docs/setup";

pub const DEFAULT_FORECAST_DAYS: i64 = 3;
pub const MIN_FORECAST_DAYS: i64 = 1;
pub const MAX_FORECAST_DAYS: i64 = 5;

/// Tool descriptors for `tools/list`.
pub fn tool_catalog() -> Value {
    json!([
        {
            "name": GET_CURRENT_WEATHER,
            "description": "Get current weather conditions for a location",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "City name, e.g. \"London\" or \"London,UK\""
                    }
                },
                "required": ["location"]
            }
        },
        {
            "name": GET_WEATHER_FORECAST,
            "description": "Get a daily weather forecast for a location",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "City name, e.g. \"London\" or \"London,UK\""
                    },
                    "days": {
                        "type": "number",
                        "description": "Number of days (1-5, default 3)"
                    }
                },
                "required": ["location"]
            }
        }
    ])
}

/// Resource descriptors for `resources/list`.
pub fn resource_catalog() -> Value {
    json!([
        {
            "uri": DOCS_URI,
            "name": "Setup and usage",
            "description": "How to configure and query the weather server",
            "mimeType": "text/markdown"
        }
    ])
}

/// Static documentation served for [`DOCS_URI`]. Generated per call, never
/// cached.
pub fn docs_markdown() -> String {
    format!(
        r#"# Skycast Weather Server

Weather lookups backed by OpenWeatherMap.

## Configuration

Set these environment variables before starting the server:

- `OPENWEATHER_API_KEY` (required): your OpenWeatherMap API key.
- `OPENWEATHER_UNITS` (optional): `metric` (default), `imperial`, or `standard`.

## Tools

- `{GET_CURRENT_WEATHER}(location)`: current conditions for a city.
- `{GET_WEATHER_FORECAST}(location, days)`: daily forecast, `days` between
  {MIN_FORECAST_DAYS} and {MAX_FORECAST_DAYS} (default {DEFAULT_FORECAST_DAYS}).

Results are cached in memory: current conditions for 30 minutes, forecasts
for 60 minutes.
"#
    )
}
