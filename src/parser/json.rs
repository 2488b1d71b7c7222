use super::{ExtractedPage, Extractor, RawRecord, RawValue};
use crate::error::{Result, ScraperError};
use crate::types::Parameter;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Which named field of a record holds a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub parameter: Parameter,
    pub field: String,
}

/// JSON array feed, one element per station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonLayout {
    /// JSON pointer to the records array; the document root when empty.
    #[serde(default)]
    pub records_pointer: String,
    pub station_field: String,
    #[serde(default)]
    pub city_field: Option<String>,
    #[serde(default)]
    pub code_field: Option<String>,
    pub time_field: String,
    pub fields: Vec<FieldMapping>,
}

fn text_field(record: &serde_json::Map<String, Value>, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn raw_value(value: Option<&Value>) -> RawValue {
    match value {
        Some(Value::Number(n)) => n.as_f64().map(RawValue::Number).unwrap_or(RawValue::Missing),
        Some(Value::String(s)) => RawValue::Text(s.clone()),
        _ => RawValue::Missing,
    }
}

impl Extractor for JsonLayout {
    fn extract(&self, body: &str) -> Result<ExtractedPage> {
        let document: Value = serde_json::from_str(body)?;

        let target = if self.records_pointer.is_empty() {
            &document
        } else {
            document.pointer(&self.records_pointer).ok_or_else(|| {
                ScraperError::MissingField(format!("records at '{}'", self.records_pointer))
            })?
        };

        let items = target
            .as_array()
            .ok_or_else(|| ScraperError::MissingField("records array".to_string()))?;

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let record = item.as_object().ok_or_else(|| {
                ScraperError::MissingField(format!("object at record {index}"))
            })?;

            // City-wide averages come without a station.
            let Some(station) = text_field(record, &self.station_field) else {
                debug!(index, "Skipping record without a station");
                continue;
            };

            let fields = self
                .fields
                .iter()
                .map(|mapping| (mapping.parameter, raw_value(record.get(&mapping.field))))
                .collect();

            records.push(RawRecord {
                station,
                city: self.city_field.as_deref().and_then(|f| text_field(record, f)),
                code: self.code_field.as_deref().and_then(|f| text_field(record, f)),
                time_label: text_field(record, &self.time_field),
                fields,
            });
        }

        debug!(records = records.len(), "Extracted JSON records");

        Ok(ExtractedPage {
            time_label: None,
            city: None,
            records,
        })
    }
}
