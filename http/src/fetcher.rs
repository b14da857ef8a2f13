use async_trait::async_trait;
use beacon_core::{FetchError, StatusFetcher};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("build-beacon/", env!("CARGO_PKG_VERSION"));

/// Plain GET against the dashboard URL.
///
/// Any non-2xx status counts as a failed fetch. Without a timeout a hung
/// server stalls the tick that issued the request.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    url: String,
    timeout: Option<Duration>,
}

impl HttpFetcher {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    fn map_error(&self, err: reqwest::Error) -> FetchError {
        match self.timeout {
            Some(limit) if err.is_timeout() => FetchError::Timeout(limit),
            _ => FetchError::Request(err.to_string()),
        }
    }
}

#[async_trait]
impl StatusFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<String, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| self.map_error(e))?;
        debug!(bytes = body.len(), %status, "Fetched dashboard");
        Ok(body)
    }

    fn target(&self) -> &str {
        &self.url
    }
}
