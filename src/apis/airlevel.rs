use super::base::{SourceProfile, StationKey};
use crate::constants::AIRLEVEL_ADAPTER;
use crate::normalize::{DateAssembly, FragmentOrder, NumberPattern};
use crate::parser::{ColumnMapping, DocumentLayout, TableLayout};
use crate::types::{Attribution, Parameter};

/// air-level.com city pages. Station names already start with the city, and
/// cells carry the unit inline ("49μg/m³").
pub fn profile() -> SourceProfile {
    SourceProfile {
        name: AIRLEVEL_ADAPTER.to_string(),
        attribution: Attribution::new("Air Level", "air-level.com"),
        layout: DocumentLayout::Table(TableLayout {
            // "2016年03月24日14时00分"
            time_selector: ".label-info".to_string(),
            city: None,
            container_selector: ".text-center".to_string(),
            first_container_only: false,
            row_selector: "tr".to_string(),
            header_rows: 1,
            station_column: 0,
            columns: vec![
                ColumnMapping {
                    parameter: Parameter::Pm25,
                    column: 3,
                },
                ColumnMapping {
                    parameter: Parameter::Pm10,
                    column: 4,
                },
            ],
        }),
        date: DateAssembly::Fragments(FragmentOrder {
            fragments: 5,
            year: 0,
            month: 1,
            day: 2,
            hour: 3,
            minute: Some(4),
        }),
        station_key: StationKey::Station,
        number_pattern: NumberPattern::Integer,
        location_includes_city: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Extractor, RawValue};

    const PAGE: &str = include_str!("../../tests/fixtures/airlevel.html");

    #[test]
    fn test_extracts_station_rows() {
        let page = profile().layout.extract(PAGE).unwrap();

        assert_eq!(page.records.len(), 3);
        assert!(page.records[0].station.contains("合肥琥珀山庄"));
        assert_eq!(
            page.records[0].fields,
            vec![
                (Parameter::Pm25, RawValue::Text("49μg/m³".into())),
                (Parameter::Pm10, RawValue::Text("78μg/m³".into())),
            ]
        );
        assert_eq!(page.time_label.as_deref(), Some("2016年03月24日14时00分"));
    }
}
