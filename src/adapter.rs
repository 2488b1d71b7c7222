//! The generic source adapter: one fetch → extract → normalize run for one
//! configured feed, driven entirely by that feed's `SourceProfile`.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::apis::SourceProfile;
use crate::error::{AdapterError, Result, ScraperError};
use crate::gateway::Fetcher;
use crate::metrics;
use crate::normalize::{clean_name, normalize_time, normalize_value, NameResolver};
use crate::parser::Extractor;
use crate::stations::CoordinateResolver;
use crate::types::{Attribution, Measurement, MeasurementTime, SourceDescriptor, StationContext};

/// Where an adapter run stands. `Done`, `FetchFailed` and `ParseFailed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    Idle,
    Fetching,
    FetchFailed,
    Fetched,
    Extracting,
    ParseFailed,
    Normalized,
    Done,
}

impl AdapterState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AdapterState::Done | AdapterState::FetchFailed | AdapterState::ParseFailed
        )
    }

    pub fn can_advance_to(&self, next: AdapterState) -> bool {
        use AdapterState::*;
        matches!(
            (self, next),
            (Idle, Fetching)
                | (Fetching, FetchFailed)
                | (Fetching, Fetched)
                | (Fetched, Extracting)
                | (Extracting, ParseFailed)
                | (Extracting, Normalized)
                | (Normalized, Done)
        )
    }
}

struct AdapterRun {
    state: AdapterState,
}

impl AdapterRun {
    fn new() -> Self {
        Self {
            state: AdapterState::Idle,
        }
    }

    fn advance(&mut self, next: AdapterState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal adapter transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!(from = ?self.state, to = ?next, "Adapter state");
        self.state = next;
    }
}

#[derive(Clone)]
pub struct SourceAdapter {
    profile: Arc<SourceProfile>,
    fetcher: Arc<dyn Fetcher>,
    resolver: Arc<dyn CoordinateResolver>,
    names: Arc<NameResolver>,
}

impl SourceAdapter {
    pub fn new(
        profile: Arc<SourceProfile>,
        fetcher: Arc<dyn Fetcher>,
        resolver: Arc<dyn CoordinateResolver>,
        names: Arc<NameResolver>,
    ) -> Self {
        Self {
            profile,
            fetcher,
            resolver,
            names,
        }
    }

    /// Fetch one feed and normalize it. Every failure comes back as a single
    /// `AdapterError`; an empty list is a valid result.
    #[instrument(skip_all, fields(source = %source.name, adapter = %self.profile.name))]
    pub async fn fetch(&self, source: &SourceDescriptor) -> std::result::Result<Vec<Measurement>, AdapterError> {
        let mut run = AdapterRun::new();
        run.advance(AdapterState::Fetching);

        let started = Instant::now();
        let response = match self.fetcher.fetch(&source.url).await {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                run.advance(AdapterState::FetchFailed);
                metrics::request_error(&source.name);
                warn!(status = response.status, "Source returned a non-success status");
                return Err(ScraperError::HttpStatus(response.status).into());
            }
            Err(e) => {
                run.advance(AdapterState::FetchFailed);
                metrics::request_error(&source.name);
                warn!(error = %e, "Source fetch failed");
                return Err(AdapterError::fetch(format!("Failure to load data url: {e}")));
            }
        };
        metrics::request_success(
            &source.name,
            started.elapsed().as_secs_f64(),
            response.body.len(),
        );
        run.advance(AdapterState::Fetched);

        run.advance(AdapterState::Extracting);
        let adapter = self.clone();
        let descriptor = source.clone();
        let body = response.body;
        let outcome =
            tokio::task::spawn_blocking(move || adapter.normalize_document(&body, &descriptor))
                .await;

        match outcome {
            Ok(Ok(measurements)) => {
                run.advance(AdapterState::Normalized);
                metrics::measurements_emitted(&source.name, measurements.len());
                run.advance(AdapterState::Done);
                info!(measurements = measurements.len(), "Source normalized");
                Ok(measurements)
            }
            Ok(Err(e)) => {
                run.advance(AdapterState::ParseFailed);
                metrics::parse_error(&source.name);
                warn!(error = %e, "Source document could not be parsed");
                Err(e)
            }
            Err(join_error) => {
                run.advance(AdapterState::ParseFailed);
                metrics::parse_error(&source.name);
                warn!(error = %join_error, "Parse worker did not complete");
                Err(ScraperError::Worker(join_error.to_string()).into())
            }
        }
    }

    /// Extract and normalize an already fetched document. Deterministic: the
    /// same body and descriptor always produce the same list.
    pub fn normalize_document(
        &self,
        body: &str,
        source: &SourceDescriptor,
    ) -> std::result::Result<Vec<Measurement>, AdapterError> {
        self.assemble(body, source)
            .map_err(|e| AdapterError::parse(format!("Failure to parse data: {e}")))
    }

    fn assemble(&self, body: &str, source: &SourceDescriptor) -> Result<Vec<Measurement>> {
        let profile = &self.profile;
        let page = profile.layout.extract(body)?;
        if page.records.is_empty() {
            debug!("Document holds no station records");
            return Ok(Vec::new());
        }

        let page_city = non_empty(page.city.as_deref().map(clean_name));
        let page_time = match &page.time_label {
            Some(label) => Some(normalize_time(label, &profile.date)?),
            None => None,
        };

        let fallback_city = clean_name(source.city.as_deref().unwrap_or(&source.name));
        let attribution = self.attribution(source);

        let mut measurements = Vec::new();
        let mut dropped = 0usize;

        for record in &page.records {
            let station = clean_name(&record.station);
            if station.is_empty() {
                debug!("Skipping record without a station name");
                continue;
            }
            let city = non_empty(record.city.as_deref().map(clean_name)).or_else(|| page_city.clone());
            let code = non_empty(record.code.as_deref().map(clean_name));

            let date: MeasurementTime = match (&record.time_label, &page_time) {
                (Some(label), _) => normalize_time(label, &profile.date)?,
                (None, Some(time)) => time.clone(),
                (None, None) => {
                    return Err(ScraperError::MissingField(format!(
                        "measurement time for station '{station}'"
                    )))
                }
            };

            let coordinates = profile
                .station_key
                .key(city.as_deref(), &station, code.as_deref())
                .and_then(|key| self.resolver.resolve(&key));

            let location_city = if profile.location_includes_city {
                city.as_deref()
            } else {
                None
            };

            let context = StationContext {
                location: self.names.location(location_city, &station),
                city: self.names.display(city.as_deref().unwrap_or(&fallback_city)),
                coordinates,
                date,
                attribution: attribution.clone(),
                source_name: source.name.clone(),
                country: source.country.clone(),
            };

            for (parameter, raw) in &record.fields {
                match normalize_value(raw, *parameter, profile.number_pattern) {
                    Some(value) => measurements.push(Measurement::new(&context, *parameter, value)),
                    None => dropped += 1,
                }
            }
        }

        if dropped > 0 {
            debug!(dropped, "Dropped values without a usable reading");
            metrics::values_dropped(&source.name, dropped);
        }

        Ok(measurements)
    }

    /// The profile's own attribution first, then any extra entries from configuration.
    fn attribution(&self, source: &SourceDescriptor) -> Vec<Attribution> {
        let own = &self.profile.attribution;
        std::iter::once(own.clone())
            .chain(source.attribution.iter().filter(|a| *a != own).cloned())
            .collect()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::FetchResponse;
    use crate::normalize::{DateAssembly, FragmentOrder, NumberPattern, Transliterator};
    use crate::parser::{ColumnMapping, DocumentLayout, TableLayout};
    use crate::stations::CoordinateTable;
    use crate::types::{Coordinate, Parameter};

    struct Echo;

    impl Transliterator for Echo {
        fn transliterate(&self, text: &str) -> String {
            text.to_string()
        }
    }

    struct Canned(u16, &'static str);

    #[async_trait::async_trait]
    impl Fetcher for Canned {
        async fn fetch(&self, _url: &str) -> Result<FetchResponse> {
            Ok(FetchResponse {
                status: self.0,
                body: self.1.to_string(),
            })
        }
    }

    fn profile() -> SourceProfile {
        SourceProfile {
            name: "test_table".to_string(),
            attribution: Attribution::new("Test Portal", "http://portal.example"),
            layout: DocumentLayout::Table(TableLayout {
                time_selector: ".time".to_string(),
                city: None,
                container_selector: "table".to_string(),
                first_container_only: false,
                row_selector: "tr".to_string(),
                header_rows: 1,
                station_column: 0,
                columns: vec![
                    ColumnMapping {
                        parameter: Parameter::Pm25,
                        column: 1,
                    },
                    ColumnMapping {
                        parameter: Parameter::Co,
                        column: 2,
                    },
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
            station_key: crate::apis::StationKey::Station,
            number_pattern: NumberPattern::Decimal,
            location_includes_city: false,
        }
    }

    fn source() -> SourceDescriptor {
        SourceDescriptor {
            name: "Hefei".to_string(),
            adapter: "test_table".to_string(),
            url: "http://portal.example/hefei".to_string(),
            source_url: "http://portal.example".to_string(),
            country: "CN".to_string(),
            city: None,
            active: true,
            attribution: vec![],
        }
    }

    fn adapter(fetcher: Canned) -> SourceAdapter {
        let table = CoordinateTable::from_entries([(
            "合肥琥珀山庄",
            Coordinate {
                latitude: 31.8664,
                longitude: 117.2544,
            },
        )]);
        SourceAdapter::new(
            Arc::new(profile()),
            Arc::new(fetcher),
            Arc::new(table),
            Arc::new(NameResolver::new(Box::new(Echo))),
        )
    }

    const PAGE: &str = r#"
        <p class="time">2016年3月24日14时</p>
        <table>
          <tr><th>站点</th><th>PM2.5</th><th>CO</th></tr>
          <tr><td> 合肥琥珀山庄 </td><td>35</td><td>2.5</td></tr>
          <tr><td>合肥董铺水库</td><td></td><td>n/a</td></tr>
        </table>
    "#;

    #[test]
    fn test_state_transitions() {
        use AdapterState::*;
        assert!(Idle.can_advance_to(Fetching));
        assert!(Fetching.can_advance_to(FetchFailed));
        assert!(Extracting.can_advance_to(ParseFailed));
        assert!(Normalized.can_advance_to(Done));
        assert!(!Idle.can_advance_to(Done));
        assert!(!Done.can_advance_to(Fetching));
        assert!(Done.is_terminal() && FetchFailed.is_terminal() && ParseFailed.is_terminal());
        assert!(!Fetched.is_terminal());
    }

    #[test]
    fn test_normalize_document_builds_measurements() {
        let adapter = adapter(Canned(200, ""));
        let measurements = adapter.normalize_document(PAGE, &source()).unwrap();

        assert_eq!(measurements.len(), 2);
        let pm25 = &measurements[0];
        assert_eq!(pm25.parameter, Parameter::Pm25);
        assert_eq!(pm25.value, 35.0);
        assert_eq!(pm25.location, "合肥琥珀山庄");
        assert_eq!(pm25.city, "Hefei");
        assert_eq!(pm25.date.local, "2016-03-24T14:00:00+08:00");
        assert_eq!(pm25.coordinates.unwrap().latitude, 31.8664);
        assert_eq!(pm25.attribution, vec![Attribution::new("Test Portal", "http://portal.example")]);

        assert_eq!(measurements[1].parameter, Parameter::Co);
        assert_eq!(measurements[1].value, 2500.0);
    }

    #[test]
    fn test_descriptor_attribution_follows_profile() {
        let adapter = adapter(Canned(200, ""));
        let mut source = source();
        source.attribution = vec![
            Attribution::new("Test Portal", "http://portal.example"),
            Attribution::new("Hefei EPB", "http://hfepb.example"),
        ];

        let measurements = adapter.normalize_document(PAGE, &source).unwrap();
        let names: Vec<&str> = measurements[0].attribution.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Test Portal", "Hefei EPB"]);
    }

    #[test]
    fn test_bad_time_label_fails_the_run() {
        let adapter = adapter(Canned(200, ""));
        let page = PAGE.replace("2016年3月24日14时", "2016年3月");
        let err = adapter.normalize_document(&page, &source()).unwrap_err();
        assert_eq!(err.kind, crate::error::AdapterErrorKind::ParseFailure);
    }

    #[tokio::test]
    async fn test_fetch_reports_status_failures() {
        let adapter = adapter(Canned(503, "busy"));
        let err = adapter.fetch(&source()).await.unwrap_err();
        assert_eq!(err.kind, crate::error::AdapterErrorKind::FetchFailure);
    }

    #[tokio::test]
    async fn test_fetch_normalizes_body() {
        let adapter = adapter(Canned(200, PAGE));
        let measurements = adapter.fetch(&source()).await.unwrap();
        assert_eq!(measurements.len(), 2);
    }
}
