//! Geocoding provider abstraction.
//!
//! A provider resolves a free-text place name to coordinates plus the raw
//! classification payload of the service. Uses blocking HTTP via `ureq`;
//! the pipeline is strictly sequential and has no async runtime.

use geo_core::config::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};
use serde_json::Value;
use std::time::Duration;

/// Errors from a single geocoding call.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoding request timed out")]
    Timeout,
    #[error("geocoding service error ({status}): {message}")]
    Service { status: u16, message: String },
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("response parse error: {0}")]
    Parse(String),
    #[error("geocoding response has no '{0}' field")]
    MissingField(&'static str),
}

/// A successful geocoding match.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoMatch {
    pub latitude: f64,
    pub longitude: f64,
    /// The service's raw result object, including its classification fields.
    pub raw: Value,
}

impl GeoMatch {
    /// The place classification (`raw["type"]`).
    pub fn place_type(&self) -> Result<&str, GeocodeError> {
        self.raw
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or(GeocodeError::MissingField("type"))
    }
}

/// Abstraction over geocoding services.
pub trait Geocoder: Send {
    /// Resolve `query`. `Ok(None)` means the service found no match.
    fn geocode(&self, query: &str, timeout: Duration) -> Result<Option<GeoMatch>, GeocodeError>;

    /// Provider name (for display/logging).
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Nominatim search API
// ---------------------------------------------------------------------------

/// Nominatim (OpenStreetMap) provider using the `/search` endpoint.
pub struct NominatimGeocoder {
    endpoint: String,
    user_agent: String,
    agent: ureq::Agent,
}

impl NominatimGeocoder {
    pub fn new(user_agent: Option<String>, endpoint: Option<String>) -> Self {
        Self {
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            user_agent: user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            agent: ureq::Agent::new_with_defaults(),
        }
    }

    /// Build a provider from the `[geocoder]` config section.
    pub fn from_config(config: &geo_core::config::GeocoderConfig) -> Self {
        Self::new(
            Some(config.user_agent.clone()),
            Some(config.endpoint.clone()),
        )
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.endpoint.trim_end_matches('/'))
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, query: &str, timeout: Duration) -> Result<Option<GeoMatch>, GeocodeError> {
        let mut response = self
            .agent
            .get(&self.search_url())
            .query("q", query)
            .query("format", "json")
            .query("limit", "1")
            .header("User-Agent", &self.user_agent)
            .config()
            .timeout_global(Some(timeout))
            .build()
            .call()
            .map_err(|e| match e {
                ureq::Error::Timeout(_) => GeocodeError::Timeout,
                ureq::Error::StatusCode(status) => GeocodeError::Service {
                    status,
                    message: format!("{} returned HTTP {}", self.endpoint, status),
                },
                other => GeocodeError::Http(other.to_string()),
            })?;

        let json: Value = response.body_mut().read_json().map_err(|e| match e {
            ureq::Error::Timeout(_) => GeocodeError::Timeout,
            other => GeocodeError::Parse(other.to_string()),
        })?;

        parse_search_response(json)
    }

    fn name(&self) -> &str {
        "nominatim"
    }
}

/// Extract the first match from a Nominatim `/search?format=json` body.
pub fn parse_search_response(json: Value) -> Result<Option<GeoMatch>, GeocodeError> {
    let Value::Array(results) = json else {
        return Err(GeocodeError::Parse(
            "expected a JSON array of results".to_string(),
        ));
    };

    let Some(first) = results.into_iter().next() else {
        return Ok(None);
    };

    let latitude = coordinate_field(&first, "lat")?;
    let longitude = coordinate_field(&first, "lon")?;
    Ok(Some(GeoMatch {
        latitude,
        longitude,
        raw: first,
    }))
}

/// Nominatim encodes coordinates as JSON strings; accept numbers as well.
fn coordinate_field(result: &Value, key: &str) -> Result<f64, GeocodeError> {
    let value = result
        .get(key)
        .ok_or_else(|| GeocodeError::Parse(format!("result has no '{}' field", key)))?;
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.ok_or_else(|| GeocodeError::Parse(format!("'{}' is not a number: {}", key, value)))
}
