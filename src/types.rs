use crate::constants::{AVERAGING_PERIOD_HOURS, MICROGRAMS_PER_CUBIC_METER, SOURCE_TYPE_GOVERNMENT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pollutants reported by the supported portals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    Pm25,
    Pm10,
    So2,
    No2,
    O3,
    Co,
}

impl Parameter {
    pub const ALL: [Parameter; 6] = [
        Parameter::Pm25,
        Parameter::Pm10,
        Parameter::So2,
        Parameter::No2,
        Parameter::O3,
        Parameter::Co,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Parameter::Pm25 => "pm25",
            Parameter::Pm10 => "pm10",
            Parameter::So2 => "so2",
            Parameter::No2 => "no2",
            Parameter::O3 => "o3",
            Parameter::Co => "co",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Parameter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parameter::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown parameter: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    pub name: String,
    pub url: String,
}

impl Attribution {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AveragingPeriod {
    pub value: u32,
    pub unit: &'static str,
}

impl AveragingPeriod {
    pub fn hourly() -> Self {
        Self {
            value: AVERAGING_PERIOD_HOURS,
            unit: "hours",
        }
    }
}

/// A measurement cycle's time, as an instant and as Shanghai wall-clock text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeasurementTime {
    pub utc: DateTime<Utc>,
    /// RFC 3339 with the `+08:00` offset.
    pub local: String,
}

/// One upstream feed, as listed under `[[sources]]` in the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub name: String,
    /// Name of the registered profile that understands this feed.
    pub adapter: String,
    pub url: String,
    #[serde(rename = "sourceURL")]
    pub source_url: String,
    pub country: String,
    /// City label used when the document itself names none.
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub attribution: Vec<Attribution>,
}

fn default_active() -> bool {
    true
}

/// The normalized output record shared across all sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub location: String,
    pub city: String,
    pub parameter: Parameter,
    pub value: f64,
    pub unit: &'static str,
    pub averaging_period: AveragingPeriod,
    pub date: MeasurementTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinate>,
    pub attribution: Vec<Attribution>,
    pub source_name: String,
    pub source_type: &'static str,
    pub country: String,
}

/// Station-level fields shared by every measurement of one record.
#[derive(Debug, Clone)]
pub struct StationContext {
    pub location: String,
    pub city: String,
    pub coordinates: Option<Coordinate>,
    pub date: MeasurementTime,
    pub attribution: Vec<Attribution>,
    pub source_name: String,
    pub country: String,
}

impl Measurement {
    pub fn new(station: &StationContext, parameter: Parameter, value: f64) -> Self {
        Self {
            location: station.location.clone(),
            city: station.city.clone(),
            parameter,
            value,
            unit: MICROGRAMS_PER_CUBIC_METER,
            averaging_period: AveragingPeriod::hourly(),
            date: station.date.clone(),
            coordinates: station.coordinates,
            attribution: station.attribution.clone(),
            source_name: station.source_name.clone(),
            source_type: SOURCE_TYPE_GOVERNMENT,
            country: station.country.clone(),
        }
    }
}
