use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, info_span, warn, Instrument};

use crate::adapter::SourceAdapter;
use crate::config::Config;
use crate::error::{AdapterError, Result, ScraperError};
use crate::gateway::{Fetcher, HttpFetcher};
use crate::normalize::NameResolver;
use crate::registry::ProfileRegistry;
use crate::stations::{CoordinateResolver, CoordinateTable};
use crate::types::{Measurement, SourceDescriptor};

/// Result of one source within a batch.
#[derive(Debug, Clone, Serialize)]
pub struct SourceOutcome {
    pub source: String,
    pub adapter: String,
    pub measurements: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<AdapterError>,
}

/// Result of running a batch of sources.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub total_sources: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub outcomes: Vec<SourceOutcome>,
    pub measurements: Vec<Measurement>,
}

/// Runs many sources concurrently over shared, read-only lookup state.
pub struct Pipeline {
    registry: Arc<ProfileRegistry>,
    fetcher: Arc<dyn Fetcher>,
    resolver: Arc<dyn CoordinateResolver>,
    names: Arc<NameResolver>,
}

impl Pipeline {
    pub fn new(
        registry: Arc<ProfileRegistry>,
        fetcher: Arc<dyn Fetcher>,
        resolver: Arc<dyn CoordinateResolver>,
        names: Arc<NameResolver>,
    ) -> Self {
        Self {
            registry,
            fetcher,
            resolver,
            names,
        }
    }

    /// Wire up the HTTP fetcher, coordinate table, name overrides and
    /// configured profiles described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(
            Duration::from_secs(config.fetch.timeout_seconds),
            config.fetch.user_agent.as_deref(),
        )?;

        let resolver: Arc<dyn CoordinateResolver> = match &config.coordinates_path {
            Some(path) => Arc::new(CoordinateTable::from_path(path)?),
            None => Arc::new(CoordinateTable::builtin().clone()),
        };

        let names = NameResolver::default().with_overrides(
            config
                .name_overrides
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        Ok(Self::new(
            Arc::new(config.registry()),
            Arc::new(fetcher),
            resolver,
            Arc::new(names),
        ))
    }

    /// Adapter for `source`, or `None` when its profile is not registered.
    pub fn adapter_for(&self, source: &SourceDescriptor) -> Option<SourceAdapter> {
        self.registry.get(&source.adapter).map(|profile| {
            SourceAdapter::new(
                profile,
                self.fetcher.clone(),
                self.resolver.clone(),
                self.names.clone(),
            )
        })
    }

    /// Run every active source. A failing source yields one error outcome and
    /// no measurements; it never stops the others.
    pub async fn run(&self, sources: &[SourceDescriptor]) -> PipelineResult {
        let mut skipped = 0;
        let mut handles = Vec::new();

        for source in sources {
            if !source.active {
                info!(source = %source.name, "Skipping inactive source");
                skipped += 1;
                continue;
            }
            let Some(adapter) = self.adapter_for(source) else {
                warn!(source = %source.name, adapter = %source.adapter, "Unknown adapter, skipping source");
                skipped += 1;
                continue;
            };

            let descriptor = source.clone();
            let span = info_span!("source", source = %source.name);
            let handle = tokio::spawn(
                async move { adapter.fetch(&descriptor).await }.instrument(span),
            );
            handles.push((source, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        let mut measurements = Vec::new();
        let (mut succeeded, mut failed) = (0, 0);

        // Awaiting in push order keeps the report in input order.
        for (source, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(ScraperError::Worker(e.to_string()).into()),
            };
            match result {
                Ok(batch) => {
                    succeeded += 1;
                    outcomes.push(SourceOutcome {
                        source: source.name.clone(),
                        adapter: source.adapter.clone(),
                        measurements: batch.len(),
                        error: None,
                    });
                    measurements.extend(batch);
                }
                Err(error) => {
                    failed += 1;
                    warn!(source = %source.name, error = %error, "Source failed");
                    outcomes.push(SourceOutcome {
                        source: source.name.clone(),
                        adapter: source.adapter.clone(),
                        measurements: 0,
                        error: Some(error),
                    });
                }
            }
        }

        info!(
            succeeded,
            failed,
            skipped,
            measurements = measurements.len(),
            "Pipeline finished"
        );

        PipelineResult {
            total_sources: sources.len(),
            succeeded,
            failed,
            skipped,
            outcomes,
            measurements,
        }
    }
}
