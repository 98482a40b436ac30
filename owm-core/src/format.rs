//! Human-readable rendering of a current-weather response.

use serde_json::Value;

use crate::model::{Units, WeatherData};

/// Shown for any field the response does not carry.
pub const PLACEHOLDER: &str = "N/A";

/// Render `data` as the report printed by the CLI. Never fails: every missing
/// field is printed as [`PLACEHOLDER`] (city falls back to `Unknown`, country
/// to an empty string).
pub fn format_weather(data: &WeatherData, units: Units) -> String {
    let temp_unit = units.temperature_symbol();
    let speed_unit = units.speed_symbol();

    let city_name = text_or(data.get("name"), "Unknown");
    let country = text_or(data.nested("sys", "country"), "");

    let weather_main = text(data.condition("main"));
    let weather_desc = text(data.condition("description"));

    let temp = text(data.nested("main", "temp"));
    let feels_like = text(data.nested("main", "feels_like"));
    let temp_min = text(data.nested("main", "temp_min"));
    let temp_max = text(data.nested("main", "temp_max"));
    let humidity = text(data.nested("main", "humidity"));
    let pressure = text(data.nested("main", "pressure"));

    let wind_speed = text(data.nested("wind", "speed"));
    let wind_deg = text(data.nested("wind", "deg"));

    let clouds = text(data.nested("clouds", "all"));

    format!(
        "
╔════════════════════════════════════════════════════════════╗
║  Weather Information for {city_name}, {country}
╚════════════════════════════════════════════════════════════╝

🌤️  Condition: {weather_main} ({weather_desc})

🌡️  Temperature:
    Current:    {temp}{temp_unit}
    Feels Like: {feels_like}{temp_unit}
    Min/Max:    {temp_min}{temp_unit} / {temp_max}{temp_unit}

💧 Humidity:    {humidity}%
🔽 Pressure:    {pressure} hPa

💨 Wind:
    Speed:      {wind_speed} {speed_unit}
    Direction:  {wind_deg}°

☁️  Cloudiness: {clouds}%
"
    )
}

fn text(value: Option<&Value>) -> String {
    text_or(value, PLACEHOLDER)
}

// Strings print bare; everything else prints in its JSON form.
fn text_or(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => default.to_owned(),
    }
}
