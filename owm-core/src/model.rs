use serde::Deserialize;
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

use crate::error::WeatherError;

/// Unit system requested from the API. Controls the symbols used in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    /// Value sent as the `units` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial, Units::Standard]
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }

    pub fn speed_symbol(&self) -> &'static str {
        match self {
            Units::Imperial => "mph",
            Units::Metric | Units::Standard => "m/s",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "standard" => Ok(Units::Standard),
            _ => Err(WeatherError::UnknownUnits(value.to_owned())),
        }
    }
}

impl FromStr for Units {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Units::try_from(s)
    }
}

/// A validated request: trimmed, non-empty city plus the unit system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    city: String,
    units: Units,
}

impl WeatherQuery {
    pub fn new(city: &str, units: Units) -> Result<Self, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::EmptyCity);
        }

        Ok(Self { city: city.to_owned(), units })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn units(&self) -> Units {
        self.units
    }
}

/// Decoded body of a current-weather response.
///
/// Only "is a JSON object" is enforced. Every accessor returns `None` when a
/// key, index or container is missing, or when the value is `null`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct WeatherData(Map<String, Value>);

impl WeatherData {
    /// Top-level field, e.g. `name`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        non_null(self.0.get(key))
    }

    /// Field of a nested object, e.g. `main.temp`.
    pub fn nested(&self, section: &str, key: &str) -> Option<&Value> {
        non_null(self.0.get(section).and_then(|s| s.get(key)))
    }

    /// Field of the first entry of the `weather` list, e.g. `weather[0].main`.
    pub fn condition(&self, key: &str) -> Option<&Value> {
        non_null(
            self.0
                .get("weather")
                .and_then(|w| w.get(0))
                .and_then(|first| first.get(key)),
        )
    }
}

impl TryFrom<Value> for WeatherData {
    type Error = WeatherError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(WeatherError::InvalidBody(format!("expected an object, got {other}"))),
        }
    }
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}
