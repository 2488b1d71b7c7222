use super::base::{SourceProfile, StationKey};
use crate::constants::PM25IN_ADAPTER;
use crate::normalize::{DateAssembly, NumberPattern};
use crate::parser::{CitySelector, ColumnMapping, DocumentLayout, TableLayout};
use crate::types::{Attribution, Parameter};

fn column(parameter: Parameter, column: usize) -> ColumnMapping {
    ColumnMapping { parameter, column }
}

/// pm25.in city pages, one `#detail-data` table per city.
pub fn profile() -> SourceProfile {
    SourceProfile {
        name: PM25IN_ADAPTER.to_string(),
        attribution: Attribution::new("PM25.in from BestApp", "http://pm25.in"),
        layout: DocumentLayout::Table(TableLayout {
            time_selector: ".live_data_time".to_string(),
            city: Some(CitySelector {
                selector: ".city_name".to_string(),
                last: false,
                strip_chars: String::new(),
            }),
            container_selector: "#detail-data".to_string(),
            first_container_only: false,
            row_selector: "tr".to_string(),
            header_rows: 1,
            station_column: 0,
            // Column 9 is the 8-hour O3 average, which is not hourly.
            columns: vec![
                column(Parameter::Pm25, 4),
                column(Parameter::Pm10, 5),
                column(Parameter::Co, 6),
                column(Parameter::No2, 7),
                column(Parameter::O3, 8),
                column(Parameter::So2, 10),
            ],
        }),
        date: DateAssembly::Timestamp,
        station_key: StationKey::CityStation,
        number_pattern: NumberPattern::Decimal,
        location_includes_city: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::clean_name;
    use crate::parser::{Extractor, RawValue};

    const PAGE: &str = include_str!("../../tests/fixtures/pm25in.html");

    #[test]
    fn test_extracts_city_and_rows() {
        let page = profile().layout.extract(PAGE).unwrap();

        assert_eq!(page.city.as_deref().map(clean_name).as_deref(), Some("北京"));
        assert_eq!(page.records.len(), 2);

        let wanshou = &page.records[0];
        assert_eq!(wanshou.station, "万寿西宫");
        assert_eq!(wanshou.fields[2], (Parameter::Co, RawValue::Text("0.8".into())));
        assert_eq!(wanshou.fields[5], (Parameter::So2, RawValue::Text("9".into())));
    }
}
