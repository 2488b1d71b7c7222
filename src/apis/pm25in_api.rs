use super::base::{SourceProfile, StationKey};
use crate::constants::PM25IN_API_ADAPTER;
use crate::normalize::{DateAssembly, NumberPattern};
use crate::parser::{DocumentLayout, FieldMapping, JsonLayout};
use crate::types::{Attribution, Parameter};

fn field(parameter: Parameter, name: &str) -> FieldMapping {
    FieldMapping {
        parameter,
        field: name.to_string(),
    }
}

/// pm25.in JSON API (`/api/querys/all_cities.json` and per-city queries).
/// `time_point` is written with a `Z` but is Beijing time.
pub fn profile() -> SourceProfile {
    SourceProfile {
        name: PM25IN_API_ADAPTER.to_string(),
        attribution: Attribution::new("PM25.in from BestApp", "http://pm25.in"),
        layout: DocumentLayout::Json(JsonLayout {
            records_pointer: String::new(),
            station_field: "position_name".to_string(),
            city_field: Some("area".to_string()),
            code_field: Some("station_code".to_string()),
            time_field: "time_point".to_string(),
            fields: vec![
                field(Parameter::Pm25, "pm2_5"),
                field(Parameter::Pm10, "pm10"),
                field(Parameter::Co, "co"),
                field(Parameter::No2, "no2"),
                field(Parameter::O3, "o3"),
                field(Parameter::So2, "so2"),
            ],
        }),
        date: DateAssembly::Timestamp,
        station_key: StationKey::Code,
        number_pattern: NumberPattern::Decimal,
        location_includes_city: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Extractor;

    const PAYLOAD: &str = include_str!("../../tests/fixtures/pm25in_api.json");

    #[test]
    fn test_skips_city_average_entries() {
        let page = profile().layout.extract(PAYLOAD).unwrap();

        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0].code.as_deref(), Some("1001A"));
        assert_eq!(page.records[1].station, "定陵");
    }
}
