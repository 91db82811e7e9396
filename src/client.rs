//! HTTP client for fetching flight lists from the flight-information service.

use crate::types::Direction;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client, StatusCode, Url,
};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Server returned error status: {status}")]
    ServerError { status: StatusCode },
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Time window ends ({end}) before it starts ({start})")]
    InvalidWindow {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
}

/// Scheduled-time window for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeWindow {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { start, end }
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    fn start_param(&self) -> String {
        utc_param(&self.start)
    }

    fn end_param(&self) -> String {
        utc_param(&self.end)
    }
}

/// The provider expects UTC, second precision, `Z` suffix.
fn utc_param(t: &DateTime<FixedOffset>) -> String {
    t.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Anything that can hand back the raw flight list for an airport.
pub trait FlightSource {
    fn fetch(
        &self,
        airport: &str,
        direction: Direction,
        window: TimeWindow,
    ) -> impl Future<Output = Result<Vec<u8>, ClientError>> + Send;
}

pub const DEFAULT_BASE_URL: &str = "https://avinor.no";

/// Configuration for the flight client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and host of the service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Language for airport and carrier names
    pub language: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            language: "en".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_language(mut self, language: String) -> Self {
        self.language = language;
        self
    }
}

/// Client for the flight-information service.
pub struct FlightClient {
    client: Client,
    config: ClientConfig,
}

impl FlightClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        Ok(Self { client, config })
    }

    /// Build the query URL for one airport, direction and window.
    pub fn query_url(
        &self,
        airport: &str,
        direction: Direction,
        window: &TimeWindow,
    ) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", self.config.base_url)))?;

        // Pushed as a segment so the airport can't spill into the query.
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.config.base_url.clone()))?
            .pop_if_empty()
            .extend(["Api", "Flights", "Airport", airport]);

        url.query_pairs_mut()
            .append_pair("direction", direction.query_value())
            .append_pair("start", &window.start_param())
            .append_pair("end", &window.end_param())
            .append_pair("language", &self.config.language);

        Ok(url)
    }

    /// Fetch the raw flight list.
    pub async fn fetch(
        &self,
        airport: &str,
        direction: Direction,
        window: TimeWindow,
    ) -> Result<Vec<u8>, ClientError> {
        if !window.is_valid() {
            return Err(ClientError::InvalidWindow {
                start: window.start,
                end: window.end,
            });
        }

        let url = self.query_url(airport, direction, &window)?;

        tracing::debug!("Fetching: {}", url);

        let response = self.client.get(url).send().await?;

        match response.status() {
            status if status.is_success() => {
                let bytes = response.bytes().await?;
                Ok(bytes.to_vec())
            }
            status => Err(ClientError::ServerError { status }),
        }
    }
}

impl FlightSource for FlightClient {
    fn fetch(
        &self,
        airport: &str,
        direction: Direction,
        window: TimeWindow,
    ) -> impl Future<Output = Result<Vec<u8>, ClientError>> + Send {
        FlightClient::fetch(self, airport, direction, window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: &str, end: &str) -> TimeWindow {
        TimeWindow::new(
            DateTime::parse_from_rfc3339(start).unwrap(),
            DateTime::parse_from_rfc3339(end).unwrap(),
        )
    }

    #[test]
    fn test_window_params_are_utc() {
        let w = window("2019-10-04T05:00:00+01:00", "2019-10-04T10:00:00+01:00");
        assert_eq!(w.start_param(), "2019-10-04T04:00:00Z");
        assert_eq!(w.end_param(), "2019-10-04T09:00:00Z");
    }

    #[test]
    fn test_window_validity() {
        assert!(window("2019-10-04T05:00:00+01:00", "2019-10-04T05:00:00+01:00").is_valid());
        assert!(!window("2019-10-04T05:00:00+01:00", "2019-10-04T04:00:00+01:00").is_valid());
        // Same instant, different offsets
        assert!(window("2019-10-04T05:00:00+01:00", "2019-10-04T04:00:00+00:00").is_valid());
    }

    #[test]
    fn test_query_url() {
        let client = FlightClient::new(ClientConfig::default()).unwrap();
        let w = window("2019-10-06T13:00:00+01:00", "2019-10-06T19:00:00+01:00");

        let url = client.query_url("OSL", Direction::Arrival, &w).unwrap();
        assert_eq!(url.path(), "/Api/Flights/Airport/OSL");
        assert_eq!(url.host_str(), Some("avinor.no"));

        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            params,
            vec![
                ("direction".to_string(), "a".to_string()),
                ("start".to_string(), "2019-10-06T12:00:00Z".to_string()),
                ("end".to_string(), "2019-10-06T18:00:00Z".to_string()),
                ("language".to_string(), "en".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_url_custom_base() {
        let config = ClientConfig::new()
            .with_base_url("http://localhost:8080/".to_string())
            .with_language("no".to_string());
        let client = FlightClient::new(config).unwrap();
        let w = window("2019-10-04T05:00:00+01:00", "2019-10-04T10:00:00+01:00");

        let url = client.query_url("BGO", Direction::Departure, &w).unwrap();
        assert_eq!(url.as_str().split('?').next(), Some("http://localhost:8080/Api/Flights/Airport/BGO"));
        assert!(url.query().unwrap().starts_with("direction=d&"));
        assert!(url.query().unwrap().ends_with("&language=no"));
    }

    #[tokio::test]
    async fn test_reversed_window_rejected_before_request() {
        // Unroutable base URL: reaching the network would fail differently.
        let config = ClientConfig::new().with_base_url("http://invalid.invalid".to_string());
        let client = FlightClient::new(config).unwrap();
        let w = window("2019-10-04T10:00:00+01:00", "2019-10-04T05:00:00+01:00");

        let err = client.fetch("OSL", Direction::Departure, w).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidWindow { .. }));
    }

    #[test]
    fn test_airport_stays_in_path() {
        let client = FlightClient::new(ClientConfig::default()).unwrap();
        let w = window("2019-10-04T05:00:00+01:00", "2019-10-04T10:00:00+01:00");

        let url = client
            .query_url("OSL?direction=a#", Direction::Departure, &w)
            .unwrap();
        assert_eq!(url.path(), "/Api/Flights/Airport/OSL%3Fdirection=a%23");
        assert_eq!(url.fragment(), None);

        let directions: Vec<_> = url
            .query_pairs()
            .filter(|(k, _)| k == "direction")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(directions, ["d"]);
    }

    #[test]
    fn test_query_url_keeps_base_path() {
        let config = ClientConfig::new().with_base_url("http://localhost:8080/proxy/".to_string());
        let client = FlightClient::new(config).unwrap();
        let w = window("2019-10-04T05:00:00+01:00", "2019-10-04T10:00:00+01:00");

        let url = client.query_url("TRD", Direction::Arrival, &w).unwrap();
        assert_eq!(url.path(), "/proxy/Api/Flights/Airport/TRD");
    }

    /// Answers a single request on a loopback port with `response`.
    async fn serve_once(response: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}")
    }

    /// Loopback client that ignores any proxy configured in the environment.
    fn local_client(base_url: String) -> FlightClient {
        let config = ClientConfig::new()
            .with_base_url(base_url)
            .with_timeout(Duration::from_secs(5));
        let client = Client::builder()
            .no_proxy()
            .timeout(config.timeout)
            .build()
            .unwrap();
        FlightClient { client, config }
    }

    fn departures_window() -> TimeWindow {
        window("2019-10-04T05:00:00+01:00", "2019-10-04T10:00:00+01:00")
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let base_url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 14\r\nConnection: close\r\n\r\n{\"Flights\":[]}",
        )
        .await;

        let body = local_client(base_url)
            .fetch("OSL", Direction::Departure, departures_window())
            .await
            .unwrap();
        assert_eq!(body, br#"{"Flights":[]}"#);
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let base_url = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let err = local_client(base_url)
            .fetch("OSL", Direction::Departure, departures_window())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::ServerError { status } if status == StatusCode::SERVICE_UNAVAILABLE
        ));
    }

    #[tokio::test]
    async fn test_fetch_accepts_any_success_status() {
        let base_url = serve_once(
            "HTTP/1.1 203 Non-Authoritative Information\r\nContent-Length: 14\r\nConnection: close\r\n\r\n{\"Flights\":[]}",
        )
        .await;

        let body = local_client(base_url)
            .fetch("OSL", Direction::Arrival, departures_window())
            .await
            .unwrap();
        assert_eq!(body, br#"{"Flights":[]}"#);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = local_client(format!("http://{addr}"))
            .fetch("OSL", Direction::Departure, departures_window())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Request(_)));
    }
}
