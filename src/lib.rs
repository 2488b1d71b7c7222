pub mod adapter;
pub mod apis;
pub mod config;
pub mod constants;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod metrics;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod registry;
pub mod stations;
pub mod types;

pub use adapter::{AdapterState, SourceAdapter};
pub use error::{AdapterError, AdapterErrorKind, Result, ScraperError};
pub use pipeline::{Pipeline, PipelineResult};
pub use types::{Measurement, SourceDescriptor};
