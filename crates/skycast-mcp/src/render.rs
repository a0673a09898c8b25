//! Markdown rendering of weather results.
//!
//! Temperatures are carried at full precision through fetching and
//! aggregation and rounded to whole degrees only here.

use std::fmt::Write as _;

use skycast_core::Units;
use skycast_weather::{CurrentConditions, DaySummary};

fn degrees(value: f64) -> i64 {
    value.round() as i64
}

/// Render current conditions as a markdown block.
pub fn current_weather(current: &CurrentConditions, units: Units) -> String {
    let temp = units.temperature_suffix();
    let wind = units.wind_suffix();

    format!(
        "# Current Weather in {city}\n\n\
         **Conditions**: {conditions}\n\
         **Temperature**: {temperature}{temp}\n\
         **Feels like**: {feels_like}{temp}\n\
         **Humidity**: {humidity}%\n\
         **Wind speed**: {wind_speed:.2} {wind}\n",
        city = current.city,
        conditions = current.condition_text,
        temperature = degrees(current.temperature),
        feels_like = degrees(current.feels_like),
        humidity = current.humidity,
        wind_speed = current.wind_speed,
    )
}

/// Render a daily forecast as a markdown block, one section per day.
pub fn forecast(city: &str, days: &[DaySummary], units: Units) -> String {
    let temp = units.temperature_suffix();
    let wind = units.wind_suffix();

    let mut out = format!("# {}-Day Forecast for {city}\n", days.len());
    for day in days {
        let _ = write!(
            out,
            "\n## {date}\n\
             **Conditions**: {conditions}\n\
             **Temperature**: {min}{temp} to {max}{temp}\n\
             **Average wind**: {avg_wind:.2} {wind}\n",
            date = day.date.format("%A, %Y-%m-%d"),
            conditions = day.condition_text,
            min = degrees(day.temp_min),
            max = degrees(day.temp_max),
            avg_wind = day.avg_wind_speed,
        );
        // A dry day gets no precipitation line at all.
        if day.total_precipitation > 0.0 {
            let _ = writeln!(out, "**Precipitation**: {:.2} mm", day.total_precipitation);
        }
    }
    out
}
