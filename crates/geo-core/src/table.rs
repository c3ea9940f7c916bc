//! Read/write the geocoded location table as CSV.

use crate::record::{GeoTable, LocationRecord, parse_coordinate};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default file name of the geocoded table.
pub const DEFAULT_CSV_FILE: &str = "geo_data.csv";

/// Column order of the persisted table.
pub const COLUMNS: [&str; 4] = ["location", "latitude", "longitude", "type"];

/// Errors from reading or writing the location table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },
}

/// A CSV row before numeric coercion.
#[derive(Debug, Deserialize)]
struct RawRow {
    location: String,
    latitude: Option<String>,
    longitude: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl From<RawRow> for LocationRecord {
    fn from(row: RawRow) -> Self {
        Self {
            location: row.location,
            latitude: row.latitude.as_deref().and_then(parse_coordinate),
            longitude: row.longitude.as_deref().and_then(parse_coordinate),
            kind: row.kind.filter(|k| !k.trim().is_empty()),
        }
    }
}

/// Write the table to `path`, creating parent directories if needed.
///
/// The header is always written, so an empty table still yields a valid file.
pub fn save(path: &Path, table: &GeoTable) -> Result<(), TableError> {
    let io_err = |source| TableError::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err)?;
    writer.write_record(COLUMNS).map_err(csv_err)?;
    for record in table {
        writer.serialize(record).map_err(csv_err)?;
    }
    writer.flush().map_err(io_err)?;

    Ok(())
}

/// Load the table from `path`, coercing coordinates to numbers.
///
/// Unparseable or NaN coordinates become missing. Blank types become missing.
/// A file lacking any of the expected columns is rejected. Header names
/// must match exactly; a padded name such as `" latitude"` counts as missing.
pub fn load(path: &Path) -> Result<GeoTable, TableError> {
    let csv_err = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = fs::File::open(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers().map_err(csv_err)?.clone();
    for column in COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(TableError::MissingColumn {
                path: path.to_path_buf(),
                column,
            });
        }
    }

    let mut records = Vec::new();
    for row in reader.deserialize::<RawRow>() {
        records.push(LocationRecord::from(row.map_err(csv_err)?));
    }
    Ok(GeoTable::new(records))
}
