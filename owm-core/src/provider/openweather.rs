use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    config::ApiKey,
    error::WeatherError,
    model::{Units, WeatherData, WeatherQuery},
};

use super::WeatherProvider;

/// OpenWeatherMap current weather endpoint.
pub const BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Applied to every request, connect plus body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: ApiKey,
    base_url: String,
    timeout: Duration,
    http: Client,
}

impl OpenWeatherClient {
    /// Resolve the API key (explicit value, then `OPENWEATHER_API_KEY`) and
    /// build a client. Fails before any network activity if no key is found.
    pub fn new(api_key: Option<String>) -> Result<Self, WeatherError> {
        Ok(Self::with_key(ApiKey::resolve(api_key)?))
    }

    pub fn with_key(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: BASE_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
            http: Client::new(),
        }
    }

    /// Point the client at a different endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch current weather for `city`. The city is trimmed and must not be blank.
    pub async fn fetch(&self, city: &str, units: Units) -> Result<WeatherData, WeatherError> {
        let query = WeatherQuery::new(city, units)?;
        self.current_weather(&query).await
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_weather(&self, query: &WeatherQuery) -> Result<WeatherData, WeatherError> {
        debug!(city = query.city(), units = %query.units(), "requesting current weather");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", query.city()),
                ("appid", self.api_key.as_str()),
                ("units", query.units().as_str()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| transport_failure(&err))?;

        let status = res.status();
        debug!(%status, "weather API responded");

        if let Some(err) = WeatherError::from_status(status, query.city()) {
            warn!(%status, city = query.city(), "weather API rejected the request");
            return Err(err);
        }

        let body = res.text().await.map_err(|err| transport_failure(&err))?;

        serde_json::from_str(&body).map_err(|err| WeatherError::InvalidBody(err.to_string()))
    }
}

fn transport_failure(err: &reqwest::Error) -> WeatherError {
    let mapped = WeatherError::from_transport(err);
    warn!(error = %err, "weather request failed");
    mapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
        task::JoinHandle,
    };

    fn client(base_url: &str) -> OpenWeatherClient {
        let key = ApiKey::resolve_with(Some("TEST_KEY".into()), |_| None).expect("explicit key");
        OpenWeatherClient::with_key(key).with_base_url(base_url)
    }

    async fn read_head(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let n = socket.read(&mut chunk).await.expect("read request");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }

        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Serve exactly one canned response. The handle yields the request head.
    async fn respond_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let url = format!("http://{}/data/2.5/weather", listener.local_addr().expect("addr"));

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let head = read_head(&mut socket).await;

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.expect("write response");
            let _ = socket.shutdown().await;

            head
        });

        (url, handle)
    }

    const LONDON: &str = r#"{"weather":[{"main":"Clear","description":"clear sky"}],"main":{"temp":18.5,"humidity":72},"sys":{"country":"GB"},"name":"London","cod":200}"#;

    #[test]
    fn default_client_uses_ten_second_timeout_and_public_endpoint() {
        let key = ApiKey::resolve_with(Some("TEST_KEY".into()), |_| None).expect("explicit key");
        let client = OpenWeatherClient::with_key(key);

        assert_eq!(REQUEST_TIMEOUT, Duration::from_secs(10));
        assert_eq!(client.timeout, Duration::from_secs(10));
        assert_eq!(client.base_url, "https://api.openweathermap.org/data/2.5/weather");
    }

    #[tokio::test]
    async fn sends_trimmed_city_key_and_units() {
        let (url, server) = respond_once("200 OK", LONDON).await;

        let data = client(&url).fetch("  London  ", Units::Imperial).await.expect("fetch");
        let head = server.await.expect("server task");

        let request_line = head.lines().next().unwrap_or_default();
        assert!(request_line.starts_with("GET /data/2.5/weather?"));
        assert!(request_line.contains("q=London&"), "{request_line}");
        assert!(request_line.contains("appid=TEST_KEY"));
        assert!(request_line.contains("units=imperial"));

        assert_eq!(data.get("name"), Some(&serde_json::json!("London")));
        assert_eq!(data.nested("sys", "country"), Some(&serde_json::json!("GB")));
    }

    #[tokio::test]
    async fn multi_word_and_non_ascii_cities_are_encoded_by_the_transport() {
        let (url, server) = respond_once("200 OK", "{}").await;

        client(&url).fetch("São Paulo", Units::Metric).await.expect("fetch");
        let head = server.await.expect("server task");

        assert!(head.contains("q=S%C3%A3o+Paulo&"), "{head}");
    }

    #[tokio::test]
    async fn blank_city_fails_before_any_request() {
        // Nothing listens on the discard port; reaching the network would yield Connection.
        let err = client("http://127.0.0.1:9/weather")
            .fetch("   ", Units::Metric)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::EmptyCity));
        assert_eq!(err.to_string(), "City name cannot be empty.");
    }

    #[tokio::test]
    async fn unauthorized_is_invalid_api_key() {
        let (url, _server) =
            respond_once("401 Unauthorized", r#"{"cod":401,"message":"Invalid API key"}"#).await;

        let err = client(&url).fetch("London", Units::Metric).await.unwrap_err();
        assert!(matches!(err, WeatherError::InvalidApiKey));
    }

    #[tokio::test]
    async fn not_found_names_requested_city() {
        let (url, _server) =
            respond_once("404 Not Found", r#"{"cod":"404","message":"city not found"}"#).await;

        let err = client(&url).fetch(" Atlantis ", Units::Metric).await.unwrap_err();
        assert!(err.to_string().contains("City 'Atlantis' not found"));
    }

    #[tokio::test]
    async fn server_error_is_generic_http_error() {
        let (url, _server) = respond_once("503 Service Unavailable", "{}").await;

        let err = client(&url).fetch("London", Units::Metric).await.unwrap_err();
        assert!(matches!(err, WeatherError::Http(status) if status.as_u16() == 503));
        assert!(err.to_string().starts_with("HTTP error occurred"));
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let url = format!("http://{}/weather", listener.local_addr().expect("addr"));

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let _ = read_head(&mut socket).await;
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let err = client(&url)
            .with_timeout(Duration::from_millis(200))
            .fetch("London", Units::Metric)
            .await
            .unwrap_err();
        server.abort();

        assert!(matches!(err, WeatherError::Timeout));
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn refused_connection_is_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let err = client(&format!("http://{addr}/weather"))
            .fetch("London", Units::Metric)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Connection));
        assert!(err.to_string().starts_with("Connection error"));
    }

    #[tokio::test]
    async fn non_object_body_is_unexpected() {
        let (url, _server) = respond_once("200 OK", "not json").await;

        let err = client(&url).fetch("London", Units::Metric).await.unwrap_err();
        assert!(err.is_unexpected());
    }
}
