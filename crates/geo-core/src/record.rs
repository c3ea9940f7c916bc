//! Location record model shared by the loader and the graph builder.

use serde::{Deserialize, Serialize};

/// One geocoded location: a row of the `geo_data.csv` table.
///
/// `None` is the missing marker for coordinates and type. It is written to
/// CSV as an empty field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// The caller-supplied place name, verbatim.
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Place classification reported by the geocoder (e.g. "museum").
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl LocationRecord {
    /// A resolved record with coordinates and a classification.
    pub fn resolved(
        location: impl Into<String>,
        latitude: f64,
        longitude: f64,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            kind: Some(kind.into()),
        }
    }

    /// A record whose lookup failed: every field except the name is missing.
    pub fn missing(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            latitude: None,
            longitude: None,
            kind: None,
        }
    }

    /// Both coordinates are present.
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    /// Latitude and longitude, if both are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    /// Drop non-finite coordinates so NaN never leaks out as a "value".
    pub fn coerce_coordinates(&mut self) {
        self.latitude = self.latitude.filter(|v| v.is_finite());
        self.longitude = self.longitude.filter(|v| v.is_finite());
    }
}

/// Ordered sequence of location records, one per queried name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoTable {
    pub records: Vec<LocationRecord>,
}

impl GeoTable {
    pub fn new(records: Vec<LocationRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LocationRecord> {
        self.records.iter()
    }

    /// First record with the given location name.
    pub fn find(&self, location: &str) -> Option<&LocationRecord> {
        self.records.iter().find(|r| r.location == location)
    }

    /// Apply [`LocationRecord::coerce_coordinates`] to every row.
    pub fn coerce_coordinates(&mut self) {
        for record in &mut self.records {
            record.coerce_coordinates();
        }
    }

    /// Number of rows with both coordinates present.
    pub fn resolved_count(&self) -> usize {
        self.records.iter().filter(|r| r.has_coordinates()).count()
    }
}

impl<'a> IntoIterator for &'a GeoTable {
    type Item = &'a LocationRecord;
    type IntoIter = std::slice::Iter<'a, LocationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<LocationRecord> for GeoTable {
    fn from_iter<I: IntoIterator<Item = LocationRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Parse a coordinate cell, treating blanks, garbage and NaN as missing.
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_record_has_no_fields() {
        let r = LocationRecord::missing("asdfqwer1234");
        assert_eq!(r.location, "asdfqwer1234");
        assert!(r.latitude.is_none());
        assert!(r.longitude.is_none());
        assert!(r.kind.is_none());
        assert!(!r.has_coordinates());
    }

    #[test]
    fn test_coerce_drops_nan() {
        let mut r = LocationRecord::resolved("x", f64::NAN, 2.0, "park");
        r.coerce_coordinates();
        assert!(r.latitude.is_none());
        assert_eq!(r.longitude, Some(2.0));
        assert_eq!(r.coordinates(), None);
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("40.76"), Some(40.76));
        assert_eq!(parse_coordinate(" -73.9 "), Some(-73.9));
        assert_eq!(parse_coordinate(""), None);
        assert_eq!(parse_coordinate("NA"), None);
        assert_eq!(parse_coordinate("NaN"), None);
        assert_eq!(parse_coordinate("north"), None);
    }

    #[test]
    fn test_table_find_returns_first_match() {
        let table: GeoTable = vec![
            LocationRecord::resolved("A", 1.0, 2.0, "museum"),
            LocationRecord::missing("A"),
        ]
        .into_iter()
        .collect();
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolved_count(), 1);
        assert!(table.find("A").unwrap().has_coordinates());
        assert!(table.find("B").is_none());
    }
}
