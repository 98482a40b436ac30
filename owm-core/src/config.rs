use std::fmt;

use crate::error::WeatherError;

/// Environment variable consulted when no key is passed explicitly.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// OpenWeatherMap API key. Always non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Resolve the key from an explicit value or the process environment.
    pub fn resolve(explicit: Option<String>) -> Result<Self, WeatherError> {
        Self::resolve_with(explicit, |name| std::env::var(name).ok())
    }

    /// Same as [`ApiKey::resolve`], with the environment lookup supplied by the caller.
    ///
    /// An explicit value wins over the environment. Empty strings count as absent
    /// on both sides.
    pub fn resolve_with<F>(explicit: Option<String>, lookup: F) -> Result<Self, WeatherError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        explicit
            .filter(|key| !key.is_empty())
            .or_else(|| lookup(API_KEY_ENV).filter(|key| !key.is_empty()))
            .map(ApiKey)
            .ok_or(WeatherError::MissingApiKey)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keeps the key out of logs and panic messages.
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
