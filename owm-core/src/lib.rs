//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - API key resolution (explicit value or `OPENWEATHER_API_KEY`)
//! - The OpenWeatherMap client behind the `WeatherProvider` abstraction
//! - The domain error type and HTTP status classification
//! - Rendering of a response into the human-readable report
//!
//! It is used by `owm-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod provider;

pub use config::{API_KEY_ENV, ApiKey};
pub use error::WeatherError;
pub use format::format_weather;
pub use model::{Units, WeatherData, WeatherQuery};
pub use provider::{OpenWeatherClient, WeatherProvider};
