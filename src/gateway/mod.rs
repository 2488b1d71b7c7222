//! Network access for adapters. The adapter only needs `Fetcher`; tests and
//! hosts with their own transport provide another implementation.

use crate::error::Result;
use std::time::Duration;
use tracing::{debug, instrument};

/// Status and decoded body of one GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url`. Non-2xx statuses are returned, not raised.
    async fn fetch(&self, url: &str) -> Result<FetchResponse>;
}

/// `reqwest` client with a whole-request timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: Option<&str>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(timeout);
        if let Some(agent) = user_agent {
            builder = builder.user_agent(agent.to_string());
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        // Decodes using the charset from Content-Type; several portals serve GBK.
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "Fetched document");
        Ok(FetchResponse { status, body })
    }
}
