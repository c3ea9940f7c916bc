//! Geocoding stage of the location graph pipeline.
//!
//! Resolves an ordered list of place names to coordinates and a place type,
//! one blocking lookup at a time, and persists the result as CSV.
//!
//! # Architecture
//!
//! - **provider**: `Geocoder` trait with a Nominatim implementation
//! - **mock**: scripted in-memory geocoder for offline runs and tests
//! - **loader**: per-location lookup, table assembly, CSV persistence
//! - **progress**: terminal progress bar via `indicatif`

pub mod loader;
pub mod mock;
pub mod progress;
pub mod provider;

pub use loader::{
    DEFAULT_LOCATIONS, LoadError, LoadOptions, build_geo_table, fetch_location_data,
    load_and_save,
};
pub use mock::MockGeocoder;
pub use progress::LoadProgress;
pub use provider::{GeoMatch, GeocodeError, Geocoder, NominatimGeocoder};
