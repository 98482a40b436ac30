use reqwest::StatusCode;
use thiserror::Error;

/// Every failure the core can report. `Display` is the message shown to the user.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(
        "No API key provided. Set OPENWEATHER_API_KEY environment variable or pass it as an argument."
    )]
    MissingApiKey,

    #[error("City name cannot be empty.")]
    EmptyCity,

    #[error("Unknown unit system '{0}'. Supported unit systems: metric, imperial, standard.")]
    UnknownUnits(String),

    #[error("Invalid API key. Please check your OPENWEATHER_API_KEY.")]
    InvalidApiKey,

    #[error("City '{0}' not found. Please check the city name.")]
    CityNotFound(String),

    #[error("Request timed out. Please check your internet connection.")]
    Timeout,

    #[error("Connection error. Please check your internet connection.")]
    Connection,

    #[error("HTTP error occurred: {0}")]
    Http(StatusCode),

    #[error("An error occurred while fetching weather data: {0}")]
    Request(String),

    #[error("Weather API returned a body that is not a JSON object: {0}")]
    InvalidBody(String),
}

impl WeatherError {
    /// Map a non-success status to its error. Returns `None` for 2xx.
    pub fn from_status(status: StatusCode, city: &str) -> Option<Self> {
        if status.is_success() {
            return None;
        }

        let err = match status {
            StatusCode::UNAUTHORIZED => WeatherError::InvalidApiKey,
            StatusCode::NOT_FOUND => WeatherError::CityNotFound(city.to_owned()),
            other => WeatherError::Http(other),
        };

        Some(err)
    }

    /// Map a transport failure from reqwest. Timeouts are checked first since
    /// a connect timeout reports both flags.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            WeatherError::Timeout
        } else if err.is_connect() {
            WeatherError::Connection
        } else {
            WeatherError::Request(err.to_string())
        }
    }

    /// True for failures that are not part of the expected domain, i.e. the
    /// API answered 2xx with something we could not read.
    pub fn is_unexpected(&self) -> bool {
        matches!(self, WeatherError::InvalidBody(_))
    }
}
