//! Integration tests for the dispatch layer against a mocked provider.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skycast_core::Units;
use skycast_mcp::protocol::{error_codes, Request, Response};
use skycast_mcp::Handlers;
use skycast_weather::WeatherClient;

/// 2025-08-29 00:00:00 UTC.
const DAY1: i64 = 1_756_425_600;

fn handlers(server: &MockServer) -> Handlers {
    let client = WeatherClient::with_base_url("test-key", Units::Metric, server.uri()).unwrap();
    Handlers::new(client, Units::Metric)
}

fn rpc(method: &str, params: Value) -> Request {
    serde_json::from_value(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params
    }))
    .unwrap()
}

fn tool_call(name: &str, arguments: Value) -> Request {
    rpc("tools/call", json!({ "name": name, "arguments": arguments }))
}

fn result_text(response: &Response) -> String {
    response.result.as_ref().unwrap()["content"][0]["text"]
        .as_str()
        .unwrap()
        .to_string()
}

fn current_body(city: &str) -> Value {
    json!({
        "name": city,
        "main": {"temp": 15.4, "feels_like": 14.8, "humidity": 72},
        "wind": {"speed": 4.1},
        "weather": [{"id": 803, "description": "broken clouds"}]
    })
}

/// Forecast body spanning `days` calendar days, two samples per day.
fn forecast_body(city: &str, days: i64) -> Value {
    let mut list = Vec::new();
    for day in 0..days {
        for hour in [9, 15] {
            list.push(json!({
                "dt": DAY1 + day * 86_400 + hour * 3_600,
                "main": {"temp_min": 9.0 + day as f64, "temp_max": 14.0 + day as f64},
                "weather": [{"id": 500, "description": "light rain"}],
                "wind": {"speed": 5.0},
                "rain": {"3h": 1.2}
            }));
        }
    }
    json!({ "city": {"name": city}, "list": list })
}

#[tokio::test]
async fn initialize_reports_tools_and_resources() {
    let server = MockServer::start().await;
    let response = handlers(&server)
        .dispatch(rpc("initialize", json!({})))
        .await
        .unwrap();

    let result = response.result.unwrap();
    assert_eq!(result["serverInfo"]["name"], "skycast");
    assert!(result["capabilities"].get("tools").is_some());
    assert!(result["capabilities"].get("resources").is_some());
}

#[tokio::test]
async fn tools_list_advertises_both_tools() {
    let server = MockServer::start().await;
    let response = handlers(&server)
        .dispatch(rpc("tools/list", json!({})))
        .await
        .unwrap();

    let tools = response.result.unwrap()["tools"].as_array().unwrap().len();
    assert_eq!(tools, 2);
}

#[tokio::test]
async fn current_weather_renders_markdown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London")))
        .mount(&server)
        .await;

    let response = handlers(&server)
        .dispatch(tool_call("get_current_weather", json!({"location": "London"})))
        .await
        .unwrap();

    let text = result_text(&response);
    assert!(text.contains("# Current Weather in London"));
    assert!(text.contains("broken clouds"));
    assert!(text.contains("15°C"));
}

#[tokio::test]
async fn repeated_current_call_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London")))
        .expect(1)
        .mount(&server)
        .await;

    let handlers = handlers(&server);
    let args = json!({"location": "London"});

    let first = handlers
        .dispatch(tool_call("get_current_weather", args.clone()))
        .await
        .unwrap();
    let second = handlers
        .dispatch(tool_call("get_current_weather", args))
        .await
        .unwrap();

    assert_eq!(result_text(&first), result_text(&second));
    // The mock's expect(1) verifies on drop that only one fetch happened.
}

#[tokio::test]
async fn repeated_forecast_call_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("Bergen", 5)))
        .expect(1)
        .mount(&server)
        .await;

    let handlers = handlers(&server);
    let args = json!({"location": "Bergen", "days": 3});

    let first = handlers
        .dispatch(tool_call("get_weather_forecast", args.clone()))
        .await
        .unwrap();
    let second = handlers
        .dispatch(tool_call("get_weather_forecast", args))
        .await
        .unwrap();

    assert_eq!(result_text(&first), result_text(&second));
}

#[tokio::test]
async fn cache_keys_preserve_location_case() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London")))
        .expect(2)
        .mount(&server)
        .await;

    let handlers = handlers(&server);
    handlers
        .dispatch(tool_call("get_current_weather", json!({"location": "London"})))
        .await
        .unwrap();
    // Different case, different cache key, second provider fetch.
    handlers
        .dispatch(tool_call("get_current_weather", json!({"location": "london"})))
        .await
        .unwrap();
}

#[tokio::test]
async fn forecast_days_are_clamped_high() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("Bergen", 5)))
        .mount(&server)
        .await;

    let response = handlers(&server)
        .dispatch(tool_call(
            "get_weather_forecast",
            json!({"location": "Bergen", "days": 10}),
        ))
        .await
        .unwrap();

    let text = result_text(&response);
    assert!(text.contains("# 5-Day Forecast for Bergen"));
}

#[tokio::test]
async fn forecast_days_are_clamped_low() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("Bergen", 5)))
        .mount(&server)
        .await;

    let response = handlers(&server)
        .dispatch(tool_call(
            "get_weather_forecast",
            json!({"location": "Bergen", "days": 0}),
        ))
        .await
        .unwrap();

    let text = result_text(&response);
    assert!(text.contains("# 1-Day Forecast for Bergen"));
}

#[tokio::test]
async fn forecast_days_default_to_three() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("Bergen", 5)))
        .mount(&server)
        .await;

    let handlers = handlers(&server);
    for args in [
        json!({"location": "Bergen"}),
        json!({"location": "Bergen", "days": "abc"}),
    ] {
        let response = handlers
            .dispatch(tool_call("get_weather_forecast", args))
            .await
            .unwrap();
        assert!(result_text(&response).contains("# 3-Day Forecast for Bergen"));
    }
}

#[tokio::test]
async fn empty_location_fails_without_touching_the_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let handlers = handlers(&server);
    for args in [
        json!({}),
        json!({"location": ""}),
        json!({"location": "   "}),
        json!({"location": 42}),
    ] {
        let response = handlers
            .dispatch(tool_call("get_current_weather", args))
            .await
            .unwrap();
        assert_eq!(
            response.error.unwrap().code,
            error_codes::INVALID_PARAMS
        );
    }
}

#[tokio::test]
async fn unknown_tool_is_method_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = handlers(&server)
        .dispatch(tool_call("foo", json!({"location": "London"})))
        .await
        .unwrap();

    let error = response.error.unwrap();
    assert_eq!(error.code, error_codes::METHOD_NOT_FOUND);
    assert!(error.message.contains("foo"));
}

#[tokio::test]
async fn unknown_method_is_method_not_found() {
    let server = MockServer::start().await;
    let response = handlers(&server)
        .dispatch(rpc("tools/destroy", json!({})))
        .await
        .unwrap();

    assert_eq!(
        response.error.unwrap().code,
        error_codes::METHOD_NOT_FOUND
    );
}

#[tokio::test]
async fn unknown_location_is_invalid_params_with_the_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "cod": "404", "message": "city not found"
        })))
        .mount(&server)
        .await;

    let response = handlers(&server)
        .dispatch(tool_call("get_current_weather", json!({"location": "Atlantis"})))
        .await
        .unwrap();

    let error = response.error.unwrap();
    assert_eq!(error.code, error_codes::INVALID_PARAMS);
    assert!(error.message.contains("Atlantis"));
}

#[tokio::test]
async fn provider_failure_becomes_tool_error_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "cod": "500", "message": "internal error"
        })))
        .mount(&server)
        .await;

    let response = handlers(&server)
        .dispatch(tool_call("get_current_weather", json!({"location": "London"})))
        .await
        .unwrap();

    let result = response.result.unwrap();
    assert_eq!(result["isError"], json!(true));
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("internal error"));
}

#[tokio::test]
async fn failed_fetches_are_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "cod": "500", "message": "internal error"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let handlers = handlers(&server);
    for _ in 0..2 {
        let response = handlers
            .dispatch(tool_call("get_current_weather", json!({"location": "London"})))
            .await
            .unwrap();
        assert_eq!(response.result.unwrap()["isError"], json!(true));
    }
}

#[tokio::test]
async fn resources_list_and_read_docs() {
    let server = MockServer::start().await;
    let handlers = handlers(&server);

    let listing = handlers
        .dispatch(rpc("resources/list", json!({})))
        .await
        .unwrap();
    let resources = listing.result.unwrap()["resources"].clone();
    assert_eq!(resources.as_array().unwrap().len(), 1);
    let uri = resources[0]["uri"].as_str().unwrap().to_string();

    let read = handlers
        .dispatch(rpc("resources/read", json!({"uri": uri})))
        .await
        .unwrap();
    let text = read.result.unwrap()["contents"][0]["text"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(text.contains("OPENWEATHER_API_KEY"));
}

#[tokio::test]
async fn unknown_resource_uri_is_resource_not_found() {
    let server = MockServer::start().await;
    let response = handlers(&server)
        .dispatch(rpc("resources/read", json!({"uri": "weather://docs/other"})))
        .await
        .unwrap();

    assert_eq!(
        response.error.unwrap().code,
        error_codes::RESOURCE_NOT_FOUND
    );
}

#[tokio::test]
async fn forecast_aggregates_the_mocked_days() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Bergen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("Bergen", 2)))
        .mount(&server)
        .await;

    let response = handlers(&server)
        .dispatch(tool_call(
            "get_weather_forecast",
            json!({"location": "Bergen", "days": 2}),
        ))
        .await
        .unwrap();

    let text = result_text(&response);
    assert!(text.contains("# 2-Day Forecast for Bergen"));
    assert!(text.contains("## Friday, 2025-08-29"));
    assert!(text.contains("## Saturday, 2025-08-30"));
    assert!(text.contains("light rain"));
    // Two 1.2mm samples per day.
    assert!(text.contains("**Precipitation**: 2.40 mm"));
}
