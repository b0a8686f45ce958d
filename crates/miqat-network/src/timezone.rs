//! Remote time zone lookup by coordinate.
//!
//! Speaks the Google Maps Time Zone API JSON contract: offsets come back in
//! seconds as `rawOffset` and `dstOffset`, with a `status` of `"OK"` on success.

use std::time::Duration;

use log::debug;
use miqat_types::{GeoCoordinate, MiqatError, TimeZoneResolver, ZoneOffset};
use serde::Deserialize;

/// Default Google Maps Time Zone API endpoint.
pub const GOOGLE_TIMEZONE_URL: &str = "https://maps.googleapis.com/maps/api/timezone/json";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Time Zone API response structure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeZoneResponse {
    status: String,
    raw_offset: Option<f64>,
    dst_offset: Option<f64>,
    error_message: Option<String>,
}

impl TimeZoneResponse {
    fn into_offset(self) -> Result<ZoneOffset, MiqatError> {
        if self.status != "OK" {
            let detail = self.error_message.map(|m| format!(": {}", m)).unwrap_or_default();
            return Err(MiqatError::lookup(format!("status {}{}", self.status, detail)));
        }

        let raw = self
            .raw_offset
            .ok_or_else(|| MiqatError::lookup("response missing rawOffset"))?;
        let dst = self.dst_offset.unwrap_or(0.0);

        Ok(ZoneOffset::new(raw / 3600.0, dst / 3600.0))
    }
}

/// Parses a Time Zone API JSON body.
pub fn parse_response(body: &str) -> Result<ZoneOffset, MiqatError> {
    let response: TimeZoneResponse = serde_json::from_str(body)
        .map_err(|e| MiqatError::lookup(format!("Failed to parse time zone response: {}", e)))?;
    response.into_offset()
}

/// Resolver backed by the Google Maps Time Zone API.
#[derive(Debug, Clone)]
pub struct GoogleTimeZone {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GoogleTimeZone {
    /// Creates a resolver against the public endpoint.
    pub fn new() -> Result<Self, MiqatError> {
        Self::with_endpoint(GOOGLE_TIMEZONE_URL)
    }

    /// Creates a resolver against a custom endpoint (proxies, tests).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, MiqatError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                "miqat/",
                env!("CARGO_PKG_VERSION"),
                " (Islamic prayer times library)"
            ))
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| MiqatError::lookup(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: None,
        })
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    async fn fetch(
        &self,
        coordinates: GeoCoordinate,
        timestamp: i64,
    ) -> Result<ZoneOffset, MiqatError> {
        let mut query = vec![
            ("location", format!("{},{}", coordinates.lat, coordinates.lng)),
            ("timestamp", timestamp.to_string()),
        ];
        if let Some(key) = &self.api_key {
            query.push(("key", key.clone()));
        }

        debug!("Resolving time zone for {},{} at {}", coordinates.lat, coordinates.lng, timestamp);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await
            .map_err(|e| MiqatError::lookup(format!("Time zone request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| MiqatError::lookup(format!("Time zone request failed: {}", e)))?;

        let data: TimeZoneResponse = response
            .json()
            .await
            .map_err(|e| MiqatError::lookup(format!("Failed to parse time zone response: {}", e)))?;

        data.into_offset()
    }
}

impl TimeZoneResolver for GoogleTimeZone {
    async fn resolve(
        &self,
        coordinates: GeoCoordinate,
        timestamp: i64,
    ) -> Result<ZoneOffset, MiqatError> {
        self.fetch(coordinates, timestamp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_ok_response() {
        let body = r#"{"dstOffset":3600,"rawOffset":-18000,"status":"OK","timeZoneId":"America/Toronto"}"#;
        let offset = parse_response(body).unwrap();
        assert_eq!(offset.base_hours, -5.0);
        assert_eq!(offset.dst_hours, 1.0);
        assert_eq!(offset.effective(true), -4.0);
    }

    #[test]
    fn test_parse_error_status() {
        let body = r#"{"status":"REQUEST_DENIED","errorMessage":"The provided API key is invalid."}"#;
        let err = parse_response(body).unwrap_err();
        assert!(matches!(err, MiqatError::TimeZoneLookup(_)));
        assert!(err.to_string().contains("REQUEST_DENIED"));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(parse_response("<html>"), Err(MiqatError::TimeZoneLookup(_))));
    }

    #[tokio::test]
    async fn test_resolve_against_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maps/api/timezone/json"))
            .and(query_param("location", "43.7,-79.4"))
            .and(query_param("timestamp", "1458136800"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "dstOffset": 3600,
                "rawOffset": -18000,
                "status": "OK",
                "timeZoneId": "America/Toronto",
                "timeZoneName": "Eastern Daylight Time"
            })))
            .mount(&server)
            .await;

        let endpoint = format!("{}/maps/api/timezone/json", server.uri());
        let resolver = GoogleTimeZone::with_endpoint(endpoint).unwrap();
        let coords = GeoCoordinate::new_unchecked(43.7, -79.4);
        let offset = resolver.resolve(coords, 1458136800).await.unwrap();

        assert_eq!(offset, ZoneOffset::new(-5.0, 1.0));
    }

    #[tokio::test]
    async fn test_resolve_sends_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "dstOffset": 0,
                "rawOffset": 10800,
                "status": "OK"
            })))
            .mount(&server)
            .await;

        let resolver = GoogleTimeZone::with_endpoint(server.uri()).unwrap().api_key("secret");
        let offset = resolver
            .resolve(GeoCoordinate::new_unchecked(21.4225, 39.8262), 0)
            .await
            .unwrap();

        assert_eq!(offset.base_hours, 3.0);
    }

    #[tokio::test]
    async fn test_resolve_http_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let resolver = GoogleTimeZone::with_endpoint(server.uri()).unwrap();
        let result = resolver.resolve(GeoCoordinate::new_unchecked(0.0, 0.0), 0).await;

        assert!(matches!(result, Err(MiqatError::TimeZoneLookup(_))));
    }
}
