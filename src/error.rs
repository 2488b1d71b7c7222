use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Unreadable timestamp: {0}")]
    Timestamp(String),

    #[error("Parse worker failed: {0}")]
    Worker(String),
}

impl ScraperError {
    /// Errors raised before a document was received.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, ScraperError::Http(_) | ScraperError::HttpStatus(_))
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;

/// Which stage of an adapter run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdapterErrorKind {
    FetchFailure,
    ParseFailure,
}

/// The only error an adapter hands back to its caller.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{kind:?}: {message}")]
pub struct AdapterError {
    pub kind: AdapterErrorKind,
    pub message: String,
}

impl AdapterError {
    pub fn fetch(message: impl Into<String>) -> Self {
        Self {
            kind: AdapterErrorKind::FetchFailure,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: AdapterErrorKind::ParseFailure,
            message: message.into(),
        }
    }
}

impl From<ScraperError> for AdapterError {
    fn from(err: ScraperError) -> Self {
        if err.is_fetch_failure() {
            AdapterError::fetch(format!("Failure to load data url: {err}"))
        } else {
            AdapterError::parse(format!("Failure to parse data: {err}"))
        }
    }
}
