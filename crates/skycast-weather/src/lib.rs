//! OpenWeatherMap client, response model, TTL cache, and forecast
//! aggregation for Skycast.

pub mod cache;
pub mod client;
pub mod forecast;
pub mod types;

pub use cache::TtlCache;
pub use client::WeatherClient;
pub use forecast::{aggregate_daily, DaySummary};
pub use types::{CurrentConditions, ForecastResponse, RawSample, WeatherError};
