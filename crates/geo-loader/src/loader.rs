//! Geocode a list of place names into a [`GeoTable`] and persist it.
//!
//! Lookups run one at a time in input order. Lookup failures (no match,
//! timeout, service or transport errors) degrade that single record to
//! fully-missing and are reported with `tracing::warn!`; they never abort the
//! batch. A match without a `type` classification is handled according to
//! [`MissingTypePolicy`].

use crate::progress::LoadProgress;
use crate::provider::{GeocodeError, Geocoder};
use geo_core::config::{GeoConfig, MissingTypePolicy};
use geo_core::record::{GeoTable, LocationRecord};
use geo_core::table::{self, TableError};
use std::path::Path;
use std::time::Duration;

/// Place names queried when no list is supplied.
pub const DEFAULT_LOCATIONS: [&str; 6] = [
    "Museum of Modern Art",
    "iuyt8765(*&)",
    "Alaska",
    "Franklin's Barbecue",
    "Burj Khalifa",
    "asdfqwer1234",
];

/// Errors that abort a loader run.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("geocoding match for '{location}' has no '{field}' field")]
    MissingField {
        location: String,
        field: &'static str,
    },
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Per-run loader settings.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Timeout handed to the geocoder for every lookup.
    pub timeout: Duration,
    pub missing_type: MissingTypePolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            missing_type: MissingTypePolicy::Fail,
        }
    }
}

impl LoadOptions {
    pub fn from_config(config: &GeoConfig) -> Self {
        Self {
            timeout: config.timeout(),
            missing_type: config.geocoder.missing_type,
        }
    }
}

/// Geocode one location into a record.
pub fn fetch_location_data(
    geocoder: &dyn Geocoder,
    location: &str,
    options: &LoadOptions,
) -> Result<LocationRecord, LoadError> {
    let found = match geocoder.geocode(location, options.timeout) {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!("Geocoding failed for {}: {}", location, e);
            None
        }
    };

    let Some(m) = found else {
        tracing::debug!("no geocoding match for {}", location);
        return Ok(LocationRecord::missing(location));
    };

    match m.place_type() {
        Ok(kind) => Ok(LocationRecord::resolved(
            location,
            m.latitude,
            m.longitude,
            kind,
        )),
        Err(GeocodeError::MissingField(field)) => match options.missing_type {
            MissingTypePolicy::Fail => Err(LoadError::MissingField {
                location: location.to_string(),
                field,
            }),
            MissingTypePolicy::Degrade => {
                tracing::warn!(
                    "Geocoding match for {} has no '{}' field; recording as missing",
                    location,
                    field
                );
                Ok(LocationRecord::missing(location))
            }
        },
        Err(e) => {
            tracing::warn!("Geocoding failed for {}: {}", location, e);
            Ok(LocationRecord::missing(location))
        }
    }
}

/// Geocode every location, in order, into a table with one row per input.
pub fn build_geo_table<S: AsRef<str>>(
    locations: &[S],
    geocoder: &dyn Geocoder,
    options: &LoadOptions,
    progress: Option<&LoadProgress>,
) -> Result<GeoTable, LoadError> {
    tracing::debug!(
        "geocoding {} location(s) with {}",
        locations.len(),
        geocoder.name()
    );

    let mut records = Vec::with_capacity(locations.len());
    for location in locations {
        let location = location.as_ref();
        if let Some(p) = progress {
            p.set_current(location);
        }
        records.push(fetch_location_data(geocoder, location, options)?);
        if let Some(p) = progress {
            p.tick();
        }
    }
    if let Some(p) = progress {
        p.finish();
    }

    let mut table = GeoTable::new(records);
    table.coerce_coordinates();
    Ok(table)
}

/// Build the table, write it to `csv_path`, and return it.
pub fn load_and_save<S: AsRef<str>>(
    locations: &[S],
    geocoder: &dyn Geocoder,
    options: &LoadOptions,
    csv_path: &Path,
    progress: Option<&LoadProgress>,
) -> Result<GeoTable, LoadError> {
    let table = build_geo_table(locations, geocoder, options, progress)?;
    table::save(csv_path, &table)?;
    tracing::info!(
        "Saved {} location(s) ({} resolved) to {}",
        table.len(),
        table.resolved_count(),
        csv_path.display()
    );
    Ok(table)
}
