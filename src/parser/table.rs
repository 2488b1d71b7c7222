use super::{ExtractedPage, Extractor, RawRecord, RawValue};
use crate::error::{Result, ScraperError};
use crate::types::Parameter;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Which cell of a row holds a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub parameter: Parameter,
    pub column: usize,
}

/// Where the page names its city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySelector {
    pub selector: String,
    /// Read the last match instead of the first.
    #[serde(default)]
    pub last: bool,
    /// Characters removed from the text, e.g. a "PM2.5" suffix.
    #[serde(default)]
    pub strip_chars: String,
}

/// HTML table layout of a portal page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableLayout {
    pub time_selector: String,
    #[serde(default)]
    pub city: Option<CitySelector>,
    pub container_selector: String,
    #[serde(default)]
    pub first_container_only: bool,
    pub row_selector: String,
    /// Rows skipped at the start of the combined row set.
    #[serde(default = "default_header_rows")]
    pub header_rows: usize,
    #[serde(default)]
    pub station_column: usize,
    pub columns: Vec<ColumnMapping>,
}

fn default_header_rows() -> usize {
    1
}

fn selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| ScraperError::Selector {
        selector: s.to_string(),
        message: format!("{e:?}"),
    })
}

fn text_of(element: &ElementRef) -> String {
    element.text().collect::<String>()
}

impl CitySelector {
    fn read(&self, document: &Html) -> Result<Option<String>> {
        let sel = selector(&self.selector)?;
        let mut matches = document.select(&sel);
        let element = if self.last { matches.last() } else { matches.next() };

        Ok(element.map(|el| {
            text_of(&el)
                .chars()
                .filter(|c| !self.strip_chars.contains(*c))
                .collect()
        }))
    }
}

impl Extractor for TableLayout {
    fn extract(&self, body: &str) -> Result<ExtractedPage> {
        let document = Html::parse_document(body);

        let time_sel = selector(&self.time_selector)?;
        let time_label: String = document
            .select(&time_sel)
            .map(|el| text_of(&el))
            .collect();

        let city = match &self.city {
            Some(city) => city.read(&document)?,
            None => None,
        };

        let container_sel = selector(&self.container_selector)?;
        let row_sel = selector(&self.row_selector)?;

        // A container nested inside another match would repeat its rows.
        let matched: Vec<ElementRef> = document.select(&container_sel).collect();
        let matched_ids: HashSet<_> = matched.iter().map(|c| c.id()).collect();
        let outermost = matched
            .into_iter()
            .filter(|c| !c.ancestors().any(|a| matched_ids.contains(&a.id())));
        let containers: Vec<ElementRef> = if self.first_container_only {
            outermost.take(1).collect()
        } else {
            outermost.collect()
        };

        let mut records = Vec::new();
        for container in containers {
            // Each container carries its own header rows.
            for (index, row) in container.select(&row_sel).enumerate().skip(self.header_rows) {
                if let Some(record) = self.read_row(row, index)? {
                    records.push(record);
                }
            }
        }

        debug!(rows = records.len(), "Extracted table rows");

        Ok(ExtractedPage {
            time_label: Some(time_label),
            city,
            records,
        })
    }
}

impl TableLayout {
    /// `None` for rows without any cells.
    fn read_row(&self, row: ElementRef, index: usize) -> Result<Option<RawRecord>> {
        let cells: Vec<ElementRef> = row.children().filter_map(ElementRef::wrap).collect();
        if cells.is_empty() {
            return Ok(None);
        }

        let station = cells.get(self.station_column).map(text_of).ok_or_else(|| {
            ScraperError::MissingField(format!(
                "station cell (column {}) in row {}",
                self.station_column, index
            ))
        })?;

        let fields = self
            .columns
            .iter()
            .map(|mapping| {
                let value = cells
                    .get(mapping.column)
                    .map(|cell| RawValue::Text(text_of(cell)))
                    .unwrap_or(RawValue::Missing);
                (mapping.parameter, value)
            })
            .collect();

        Ok(Some(RawRecord {
            station,
            city: None,
            code: None,
            time_label: None,
            fields,
        }))
    }
}
