//! Request dispatch.
//!
//! One [`Handlers`] instance owns the weather client and the process-wide
//! response cache; it is constructed at startup and handed to the server
//! loop. Requests are processed one at a time, so the cache sees no
//! concurrent read-modify-write.

use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{json, Value};
use tracing::{debug, info};

use skycast_core::Units;
use skycast_weather::{aggregate_daily, TtlCache, WeatherClient, WeatherError};

use crate::protocol::{error_codes, methods, Request, RequestId, Response, PROTOCOL_VERSION};
use crate::render;
use crate::tools::{
    self, DEFAULT_FORECAST_DAYS, DOCS_URI, GET_CURRENT_WEATHER, GET_WEATHER_FORECAST,
    MAX_FORECAST_DAYS, MIN_FORECAST_DAYS,
};

/// Cached current-conditions entries live for 30 minutes.
const CURRENT_TTL: Duration = Duration::from_secs(1800);
/// Cached forecast entries live for 60 minutes.
const FORECAST_TTL: Duration = Duration::from_secs(3600);

pub struct Handlers {
    client: WeatherClient,
    units: Units,
    cache: Mutex<TtlCache<String>>,
}

impl Handlers {
    pub fn new(client: WeatherClient, units: Units) -> Self {
        Self {
            client,
            units,
            cache: Mutex::new(TtlCache::new()),
        }
    }

    /// Dispatch one request. Returns `None` for notifications, which get no
    /// response line.
    pub async fn dispatch(&self, request: Request) -> Option<Response> {
        let id = request.id.clone();
        debug!(method = %request.method, "dispatching request");

        if request.method.starts_with("notifications/") {
            return None;
        }

        let response = match request.method.as_str() {
            methods::INITIALIZE => self.handle_initialize(id),
            methods::PING => Response::success(id, json!({})),
            methods::TOOLS_LIST => Response::success(id, json!({ "tools": tools::tool_catalog() })),
            methods::TOOLS_CALL => self.handle_tool_call(id, request.params).await,
            methods::RESOURCES_LIST => {
                Response::success(id, json!({ "resources": tools::resource_catalog() }))
            }
            methods::RESOURCES_READ => Self::handle_resource_read(id, request.params),
            other => Response::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Unknown method: {other}"),
            ),
        };

        Some(response)
    }

    fn handle_initialize(&self, id: Option<RequestId>) -> Response {
        info!("initialize handshake");
        Response::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {},
                    "resources": {}
                },
                "serverInfo": {
                    "name": "skycast",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    fn handle_resource_read(id: Option<RequestId>, params: Option<Value>) -> Response {
        let uri = params
            .as_ref()
            .and_then(|p| p.get("uri"))
            .and_then(Value::as_str)
            .unwrap_or_default();

        if uri == DOCS_URI {
            Response::success(
                id,
                json!({
                    "contents": [{
                        "uri": DOCS_URI,
                        "mimeType": "text/markdown",
                        "text": tools::docs_markdown()
                    }]
                }),
            )
        } else {
            Response::error(
                id,
                error_codes::RESOURCE_NOT_FOUND,
                format!("Resource not found: {uri}"),
            )
        }
    }

    async fn handle_tool_call(&self, id: Option<RequestId>, params: Option<Value>) -> Response {
        let params = params.unwrap_or_else(|| json!({}));

        // Tool name is checked before any parameter validation.
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return Response::error(
                id,
                error_codes::INVALID_PARAMS,
                "tools/call requires a tool name",
            );
        };
        if name != GET_CURRENT_WEATHER && name != GET_WEATHER_FORECAST {
            return Response::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Unknown tool: {name}"),
            );
        }

        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        // The location must be a non-empty string after trimming; the key
        // and the provider query still use it exactly as supplied.
        let location = match arguments.get("location").and_then(Value::as_str) {
            Some(loc) if !loc.trim().is_empty() => loc.to_string(),
            _ => {
                return Response::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "location must be a non-empty string",
                );
            }
        };

        let outcome = if name == GET_CURRENT_WEATHER {
            self.current_weather(&location).await
        } else {
            let days = clamp_days(parse_days(arguments.get("days")));
            self.weather_forecast(&location, days).await
        };

        match outcome {
            Ok(text) => Response::success(
                id,
                json!({ "content": [{ "type": "text", "text": text }] }),
            ),
            Err(WeatherError::LocationNotFound(loc)) => Response::error(
                id,
                error_codes::INVALID_PARAMS,
                format!("Location not found: {loc}"),
            ),
            // Any other provider failure is surfaced as tool error content,
            // not a protocol error and never a crash.
            Err(err) => Response::success(
                id,
                json!({
                    "content": [{ "type": "text", "text": err.to_string() }],
                    "isError": true
                }),
            ),
        }
    }

    async fn current_weather(&self, location: &str) -> Result<String, WeatherError> {
        let key = format!("current:{location}");
        if let Some(text) = self.cache.lock().get(&key) {
            debug!(%key, "cache hit");
            return Ok(text);
        }

        let current = self.client.fetch_current(location).await?;
        let text = render::current_weather(&current, self.units);
        self.cache.lock().insert(key, text.clone(), CURRENT_TTL);
        Ok(text)
    }

    async fn weather_forecast(&self, location: &str, days: i64) -> Result<String, WeatherError> {
        let key = format!("forecast:{location}:{days}");
        if let Some(text) = self.cache.lock().get(&key) {
            debug!(%key, "cache hit");
            return Ok(text);
        }

        let forecast = self.client.fetch_forecast(location).await?;
        let summaries = aggregate_daily(&forecast.samples, days as usize);
        let text = render::forecast(&forecast.city, &summaries, self.units);
        self.cache.lock().insert(key, text.clone(), FORECAST_TTL);
        Ok(text)
    }
}

/// Read the `days` argument: JSON numbers and numeric strings are accepted,
/// anything else falls back to the default.
fn parse_days(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(DEFAULT_FORECAST_DAYS),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(DEFAULT_FORECAST_DAYS),
        _ => DEFAULT_FORECAST_DAYS,
    }
}

/// Out-of-range day counts are clamped silently, never rejected.
fn clamp_days(days: i64) -> i64 {
    days.clamp(MIN_FORECAST_DAYS, MAX_FORECAST_DAYS)
}
