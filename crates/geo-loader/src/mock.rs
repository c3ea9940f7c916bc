//! Scripted geocoder for offline runs and tests.

use crate::provider::{GeoMatch, GeocodeError, Geocoder};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Canned outcome for one query.
#[derive(Debug, Clone)]
enum Scripted {
    Match(GeoMatch),
    Timeout,
    ServiceError(u16),
}

/// Mock geocoder answering from a fixed table.
///
/// Unknown queries resolve to "no match". Every call is recorded together
/// with the timeout it was given.
#[derive(Debug, Default)]
pub struct MockGeocoder {
    answers: HashMap<String, Scripted>,
    calls: Mutex<Vec<(String, Duration)>>,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with a match carrying `place_type` in its raw payload.
    pub fn with_place(mut self, query: &str, latitude: f64, longitude: f64, place_type: &str) -> Self {
        let raw = json!({
            "lat": latitude.to_string(),
            "lon": longitude.to_string(),
            "type": place_type,
            "display_name": query,
        });
        self.answers.insert(
            query.to_string(),
            Scripted::Match(GeoMatch {
                latitude,
                longitude,
                raw,
            }),
        );
        self
    }

    /// Answer `query` with a match whose raw payload is exactly `raw`.
    pub fn with_raw(mut self, query: &str, latitude: f64, longitude: f64, raw: Value) -> Self {
        self.answers.insert(
            query.to_string(),
            Scripted::Match(GeoMatch {
                latitude,
                longitude,
                raw,
            }),
        );
        self
    }

    /// Make `query` time out.
    pub fn with_timeout(mut self, query: &str) -> Self {
        self.answers.insert(query.to_string(), Scripted::Timeout);
        self
    }

    /// Make `query` fail with an HTTP status error.
    pub fn with_service_error(mut self, query: &str, status: u16) -> Self {
        self.answers
            .insert(query.to_string(), Scripted::ServiceError(status));
        self
    }

    /// Queries received so far, in call order.
    pub fn calls(&self) -> Vec<(String, Duration)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl Geocoder for MockGeocoder {
    fn geocode(&self, query: &str, timeout: Duration) -> Result<Option<GeoMatch>, GeocodeError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((query.to_string(), timeout));
        }
        match self.answers.get(query) {
            None => Ok(None),
            Some(Scripted::Match(m)) => Ok(Some(m.clone())),
            Some(Scripted::Timeout) => Err(GeocodeError::Timeout),
            Some(Scripted::ServiceError(status)) => Err(GeocodeError::Service {
                status: *status,
                message: "scripted failure".to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
