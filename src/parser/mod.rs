//! Field extraction: locate the per-station records of one measurement cycle
//! in a fetched document and hand back their raw, untouched fields.

pub mod json;
pub mod table;

use crate::error::Result;
use crate::types::Parameter;
use serde::{Deserialize, Serialize};

pub use json::{FieldMapping, JsonLayout};
pub use table::{CitySelector, ColumnMapping, TableLayout};

/// A parameter field as it appeared in the document.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Missing,
}

/// One station's chunk of the document. Names are not yet cleaned.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub station: String,
    pub city: Option<String>,
    pub code: Option<String>,
    /// Per-record time, for feeds that stamp each element.
    pub time_label: Option<String>,
    pub fields: Vec<(Parameter, RawValue)>,
}

/// Everything pulled out of one document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedPage {
    pub time_label: Option<String>,
    pub city: Option<String>,
    pub records: Vec<RawRecord>,
}

pub trait Extractor {
    fn extract(&self, body: &str) -> Result<ExtractedPage>;
}

/// Shape of a source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentLayout {
    Table(TableLayout),
    Json(JsonLayout),
}

impl Extractor for DocumentLayout {
    fn extract(&self, body: &str) -> Result<ExtractedPage> {
        match self {
            DocumentLayout::Table(layout) => layout.extract(body),
            DocumentLayout::Json(layout) => layout.extract(body),
        }
    }
}
