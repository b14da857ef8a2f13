//! Collaborators feeding the controller: fetching and classifying the dashboard.

use crate::counts::BuildCounts;
use crate::error::{ClassifyError, FetchError};
use async_trait::async_trait;

/// Performs one network round trip against the dashboard.
#[async_trait]
pub trait StatusFetcher: Send + Sync {
    /// Raw page body.
    async fn fetch(&self) -> Result<String, FetchError>;

    /// Where the fetcher points, for the startup banner.
    fn target(&self) -> &str;
}

/// Turns a raw page into build counts.
pub trait StatusClassifier: Send + Sync {
    fn classify(&self, body: &str) -> Result<BuildCounts, ClassifyError>;
}
