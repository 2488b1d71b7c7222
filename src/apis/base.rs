use crate::normalize::{DateAssembly, NumberPattern};
use crate::parser::DocumentLayout;
use crate::types::Attribution;
use serde::{Deserialize, Serialize};

/// Which identifier a source's stations are looked up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationKey {
    /// Station name alone (names already begin with the city).
    #[default]
    Station,
    /// City and station names concatenated with no separator.
    CityStation,
    /// The feed's station code.
    Code,
}

impl StationKey {
    /// Build the lookup key from cleaned names; `None` when the needed part is missing.
    pub fn key(&self, city: Option<&str>, station: &str, code: Option<&str>) -> Option<String> {
        match self {
            StationKey::Station => Some(station.to_string()),
            StationKey::CityStation => city.map(|city| format!("{city}{station}")),
            StationKey::Code => code.map(str::to_string),
        }
    }
}

/// Everything that differs between two portals: where the data sits, how
/// its time is written, and how its stations are keyed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceProfile {
    pub name: String,
    pub attribution: Attribution,
    pub layout: DocumentLayout,
    pub date: DateAssembly,
    #[serde(default)]
    pub station_key: StationKey,
    #[serde(default)]
    pub number_pattern: NumberPattern,
    /// Prefix the displayed location with the city name.
    #[serde(default)]
    pub location_includes_city: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_key_conventions() {
        assert_eq!(
            StationKey::Station.key(Some("北京"), "北京东四", None).as_deref(),
            Some("北京东四")
        );
        assert_eq!(
            StationKey::CityStation.key(Some("北京"), "东四", None).as_deref(),
            Some("北京东四")
        );
        assert_eq!(StationKey::CityStation.key(None, "东四", None), None);
        assert_eq!(
            StationKey::Code.key(Some("北京"), "东四", Some("1003A")).as_deref(),
            Some("1003A")
        );
        assert_eq!(StationKey::Code.key(Some("北京"), "东四", None), None);
    }
}
