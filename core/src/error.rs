use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failures talking to the light.
///
/// Only [`DeviceError::Unavailable`] at startup is fatal; everything else is
/// logged by the controller and the next tick carries on.
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("No light device found: {0}")]
    Unavailable(String),
    #[error("Light device lost: {0}")]
    Lost(String),
    #[error("Light device did not finish fading within {0:?}")]
    Timeout(Duration),
    #[error("Light device I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One network round trip went wrong.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// The fetched page could not be turned into build counts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("Error Parsing HTML")]
    Unparseable,
    #[error("Could not find {0}")]
    MissingStructure(String),
    #[error("Invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Why a tick produced no build counts.
///
/// The display text is what the console shows and what the transient-error
/// state carries.
#[derive(Error, Debug)]
pub enum PollError {
    #[error("Error Fetching Page")]
    Fetch(#[source] FetchError),
    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

impl From<FetchError> for PollError {
    fn from(err: FetchError) -> Self {
        PollError::Fetch(err)
    }
}
