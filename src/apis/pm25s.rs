use super::base::{SourceProfile, StationKey};
use crate::constants::PM25S_ADAPTER;
use crate::normalize::{DateAssembly, FragmentOrder, NumberPattern};
use crate::parser::{CitySelector, ColumnMapping, DocumentLayout, TableLayout};
use crate::types::{Attribution, Parameter};

fn column(parameter: Parameter, column: usize) -> ColumnMapping {
    ColumnMapping { parameter, column }
}

/// pm25s.com city pages. The first `.pm25` block lists government stations;
/// later blocks are private sensors and are ignored.
pub fn profile() -> SourceProfile {
    SourceProfile {
        name: PM25S_ADAPTER.to_string(),
        attribution: Attribution::new("PM25s.com", "http://pm25s.com"),
        layout: DocumentLayout::Table(TableLayout {
            // "2016年03月24日14时"
            time_selector: ".date".to_string(),
            city: Some(CitySelector {
                selector: "#title".to_string(),
                last: true,
                strip_chars: "PM2.5".to_string(),
            }),
            container_selector: ".pm25".to_string(),
            first_container_only: true,
            row_selector: "div".to_string(),
            header_rows: 1,
            station_column: 0,
            columns: vec![
                column(Parameter::Pm25, 2),
                column(Parameter::Pm10, 3),
                column(Parameter::Co, 4),
                column(Parameter::No2, 5),
                column(Parameter::So2, 6),
                column(Parameter::O3, 7),
            ],
        }),
        date: DateAssembly::Fragments(FragmentOrder {
            fragments: 4,
            year: 0,
            month: 1,
            day: 2,
            hour: 3,
            minute: None,
        }),
        station_key: StationKey::CityStation,
        number_pattern: NumberPattern::Decimal,
        location_includes_city: true,
    }
}
