//! Station → coordinate lookup.
//!
//! The table maps an exact station key to `[longitude, latitude]`. Which key a
//! source uses (station name, city + station, or station code) is decided by
//! its profile; the table itself holds all conventions side by side.

use crate::error::{Result, ScraperError};
use crate::types::Coordinate;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use tracing::{error, info};

const BUILTIN_TABLE: &str = include_str!("../data/china-locations.json");

static BUILTIN: Lazy<CoordinateTable> = Lazy::new(|| {
    CoordinateTable::from_json(BUILTIN_TABLE).unwrap_or_else(|e| {
        error!("Built-in coordinate table is unreadable: {}", e);
        CoordinateTable::default()
    })
});

/// Resolves a station key to a coordinate. A miss is `None`, never an error.
pub trait CoordinateResolver: Send + Sync {
    fn resolve(&self, key: &str) -> Option<Coordinate>;
}

#[derive(Debug, Clone, Default)]
pub struct CoordinateTable {
    entries: HashMap<String, Coordinate>,
}

impl CoordinateTable {
    /// The table compiled into the binary, decoded on first use.
    pub fn builtin() -> &'static CoordinateTable {
        &BUILTIN
    }

    /// Decode a JSON object of `key: [longitude, latitude]` pairs.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, [f64; 2]> = serde_json::from_str(json)?;
        Ok(Self::from_entries(raw.into_iter().map(|(key, [lon, lat])| {
            (
                key,
                Coordinate {
                    latitude: lat,
                    longitude: lon,
                },
            )
        })))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read coordinate table '{}': {}",
                path.display(),
                e
            ))
        })?;
        let table = Self::from_json(&content)?;
        info!(entries = table.len(), path = %path.display(), "Loaded coordinate table");
        Ok(table)
    }

    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Coordinate)>,
        K: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, c)| (k.into(), c)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CoordinateResolver for CoordinateTable {
    fn resolve(&self, key: &str) -> Option<Coordinate> {
        self.entries.get(key).copied()
    }
}
